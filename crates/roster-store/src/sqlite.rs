use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension};
use roster_core::{DateRange, MonthRef, NewTeam, RosterEntry, Team, TeamUpdate};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::db::init_db;
use crate::error::{Result, StoreError};
use crate::store::RosterStore;

const DATE_FMT: &str = "%Y-%m-%d";

/// SQLite-backed store.
///
/// Wraps a single connection in a `Mutex`; every call is a short query so
/// contention is not a concern at dashboard scale.
pub struct SqliteStore {
    db: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an open connection, creating the schema if needed.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::new(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-query leaves the connection usable; recover the guard.
        self.db.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[instrument(skip(self, month), fields(month = %month))]
    pub fn month_entries(&self, month: MonthRef, team: Option<&str>) -> Result<Vec<RosterEntry>> {
        let start = month.first_day().format(DATE_FMT).to_string();
        let end = month.last_day().format(DATE_FMT).to_string();
        let db = self.conn();

        let rows = match team {
            Some(team) => {
                let mut stmt = db.prepare_cached(
                    "SELECT date, name, status, team FROM roster
                     WHERE team = ?1 AND date >= ?2 AND date <= ?3
                     ORDER BY date, name",
                )?;
                let rows = stmt
                    .query_map(params![team, start, end], row_to_raw)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
            None => {
                let mut stmt = db.prepare_cached(
                    "SELECT date, name, status, team FROM roster
                     WHERE date >= ?1 AND date <= ?2
                     ORDER BY team, date, name",
                )?;
                let rows = stmt
                    .query_map(params![start, end], row_to_raw)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
        };

        let entries = rows
            .into_iter()
            .map(raw_to_entry)
            .collect::<Result<Vec<_>>>()?;
        debug!(count = entries.len(), "roster rows loaded");
        Ok(entries)
    }

    #[instrument(skip(self, month), fields(month = %month))]
    pub fn exists(&self, month: MonthRef, team: &str) -> Result<bool> {
        let db = self.conn();
        let found: Option<i64> = db
            .query_row(
                "SELECT id FROM roster
                 WHERE team = ?1 AND date >= ?2 AND date <= ?3
                 LIMIT 1",
                params![
                    team,
                    month.first_day().format(DATE_FMT).to_string(),
                    month.last_day().format(DATE_FMT).to_string()
                ],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    #[instrument(skip(self, month), fields(month = %month))]
    pub fn delete_month(&self, month: MonthRef, team: &str) -> Result<usize> {
        let db = self.conn();
        let n = db.execute(
            "DELETE FROM roster WHERE team = ?1 AND date >= ?2 AND date <= ?3",
            params![
                team,
                month.first_day().format(DATE_FMT).to_string(),
                month.last_day().format(DATE_FMT).to_string()
            ],
        )?;
        info!(removed = n, "roster month deleted");
        Ok(n)
    }

    #[instrument(skip(self, entry), fields(date = %entry.date, name = %entry.name, team = %entry.team))]
    pub fn upsert(&self, entry: &RosterEntry) -> Result<()> {
        let db = self.conn();
        db.execute(
            "INSERT INTO roster (date, name, status, team, month, year)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(date, name, team) DO UPDATE SET
                 status = excluded.status,
                 month  = excluded.month,
                 year   = excluded.year",
            params![
                entry.date.format(DATE_FMT).to_string(),
                entry.name,
                entry.status,
                entry.team,
                entry.date.month(),
                entry.date.year()
            ],
        )?;
        debug!(status = %entry.status, "roster entry upserted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn teams(&self) -> Result<Vec<Team>> {
        let db = self.conn();
        let mut stmt = db.prepare_cached(
            "SELECT id, name, members, custom_prompt FROM teams ORDER BY name",
        )?;
        let teams = stmt
            .query_map([], row_to_team)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(teams)
    }

    fn team_where(&self, column: &str, value: &str) -> Result<Option<Team>> {
        let db = self.conn();
        let sql = format!(
            "SELECT id, name, members, custom_prompt FROM teams WHERE {column} = ?1"
        );
        let team = db.query_row(&sql, [value], row_to_team).optional()?;
        Ok(team)
    }

    #[instrument(skip(self, team), fields(name = %team.name))]
    pub fn insert_team(&self, team: &NewTeam) -> Result<Team> {
        team.validate()?;
        let id = Uuid::now_v7().to_string();
        let now = chrono::Utc::now().to_rfc3339();
        let members = roster_core::types::clean_members(&team.members);
        let members_json =
            serde_json::to_string(&members).map_err(|e| StoreError::Parse(e.to_string()))?;
        let prompt = roster_core::types::normalize_prompt(team.custom_prompt.as_deref());

        let db = self.conn();
        db.execute(
            "INSERT INTO teams (id, name, members, custom_prompt, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![id, team.name.trim(), members_json, prompt, now],
        )
        .map_err(map_unique_violation)?;

        info!(team_id = %id, "team created");
        Ok(Team {
            id,
            name: team.name.trim().to_string(),
            members,
            custom_prompt: prompt,
        })
    }

    #[instrument(skip(self, update))]
    pub fn modify_team(&self, id: &str, update: &TeamUpdate) -> Result<Team> {
        update.validate()?;
        let mut team = self
            .team_where("id", id)?
            .ok_or_else(|| StoreError::TeamNotFound { id: id.to_string() })?;
        update.apply(&mut team);

        let members_json =
            serde_json::to_string(&team.members).map_err(|e| StoreError::Parse(e.to_string()))?;
        let now = chrono::Utc::now().to_rfc3339();
        let db = self.conn();
        db.execute(
            "UPDATE teams SET name = ?1, members = ?2, custom_prompt = ?3, updated_at = ?4
             WHERE id = ?5",
            params![team.name, members_json, team.custom_prompt, now, id],
        )
        .map_err(map_unique_violation)?;

        info!(team_id = %id, "team updated");
        Ok(team)
    }

    #[instrument(skip(self))]
    pub fn remove_team(&self, id: &str) -> Result<()> {
        let db = self.conn();
        let n = db.execute("DELETE FROM teams WHERE id = ?1", [id])?;
        if n == 0 {
            return Err(StoreError::TeamNotFound { id: id.to_string() });
        }
        info!(team_id = %id, "team deleted");
        Ok(())
    }
}

#[async_trait]
impl RosterStore for SqliteStore {
    fn backend(&self) -> &str {
        "sqlite"
    }

    async fn fetch_roster(&self, month: MonthRef, team: &str) -> Result<Vec<RosterEntry>> {
        self.month_entries(month, Some(team))
    }

    async fn fetch_all_teams_roster(
        &self,
        month: MonthRef,
    ) -> Result<BTreeMap<String, Vec<RosterEntry>>> {
        let mut grouped: BTreeMap<String, Vec<RosterEntry>> = BTreeMap::new();
        for entry in self.month_entries(month, None)? {
            grouped.entry(entry.team.clone()).or_default().push(entry);
        }
        Ok(grouped)
    }

    async fn roster_exists(&self, month: MonthRef, team: &str) -> Result<bool> {
        self.exists(month, team)
    }

    async fn delete_roster(&self, month: MonthRef, team: &str) -> Result<usize> {
        self.delete_month(month, team)
    }

    async fn upsert_entry(&self, entry: &RosterEntry) -> Result<()> {
        self.upsert(entry)
    }

    async fn list_teams(&self) -> Result<Vec<Team>> {
        self.teams()
    }

    async fn get_team(&self, id: &str) -> Result<Option<Team>> {
        self.team_where("id", id)
    }

    async fn get_team_by_name(&self, name: &str) -> Result<Option<Team>> {
        self.team_where("name", name)
    }

    async fn create_team(&self, team: &NewTeam) -> Result<Team> {
        self.insert_team(team)
    }

    async fn update_team(&self, id: &str, update: &TeamUpdate) -> Result<Team> {
        self.modify_team(id, update)
    }

    async fn delete_team(&self, id: &str) -> Result<()> {
        self.remove_team(id)
    }

    async fn fetch_range(&self, range: &DateRange, team: Option<&str>) -> Result<Vec<RosterEntry>> {
        // One query per month keeps the ordering identical to the REST backend.
        let mut out = Vec::new();
        for month in range.months() {
            out.extend(self.month_entries(month, team)?);
        }
        out.retain(|e| range.contains(e.date));
        Ok(out)
    }
}

type RawEntry = (String, String, String, String);

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEntry> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn raw_to_entry((date, name, status, team): RawEntry) -> Result<RosterEntry> {
    let date = NaiveDate::parse_from_str(&date, DATE_FMT)
        .map_err(|e| StoreError::Parse(format!("bad date {date:?}: {e}")))?;
    Ok(RosterEntry {
        date,
        name,
        status,
        team,
    })
}

/// Map a `teams` row. Column order: id, name, members, custom_prompt.
fn row_to_team(row: &rusqlite::Row<'_>) -> rusqlite::Result<Team> {
    let members: Vec<String> = serde_json::from_str(&row.get::<_, String>(2)?).unwrap_or_default();
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        members,
        custom_prompt: row.get(3)?,
    })
}

fn map_unique_violation(err: rusqlite::Error) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StoreError::Conflict("a team with that name already exists".into())
        }
        _ => StoreError::Database(err),
    }
}
