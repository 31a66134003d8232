use rusqlite::Connection;

use crate::error::Result;

/// Initialise the roster and team tables in `conn`.
///
/// Safe to call on every startup; uses `IF NOT EXISTS` throughout.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS roster (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            date    TEXT    NOT NULL,   -- YYYY-MM-DD
            name    TEXT    NOT NULL,
            status  TEXT    NOT NULL,
            team    TEXT    NOT NULL,
            month   INTEGER NOT NULL,
            year    INTEGER NOT NULL,
            UNIQUE(date, name, team)
        );

        -- Month views filter on team + date range.
        CREATE INDEX IF NOT EXISTS idx_roster_team_date ON roster (team, date);

        CREATE TABLE IF NOT EXISTS teams (
            id            TEXT PRIMARY KEY NOT NULL,
            name          TEXT NOT NULL UNIQUE,
            members       TEXT NOT NULL DEFAULT '[]',  -- JSON array, ordered
            custom_prompt TEXT,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}
