use std::collections::BTreeMap;

use async_trait::async_trait;
use roster_core::{DateRange, MonthRef, NewTeam, RosterEntry, Team, TeamUpdate};

use crate::error::Result;

/// Common interface for the roster data store (SQLite or hosted REST).
#[async_trait]
pub trait RosterStore: Send + Sync {
    /// Backend name for logging.
    fn backend(&self) -> &str;

    /// All entries of `team` in `month`, ordered by date then name.
    async fn fetch_roster(&self, month: MonthRef, team: &str) -> Result<Vec<RosterEntry>>;

    /// Entries of every team in `month`, grouped by team name.
    async fn fetch_all_teams_roster(
        &self,
        month: MonthRef,
    ) -> Result<BTreeMap<String, Vec<RosterEntry>>>;

    /// Whether `team` has at least one entry in `month`.
    async fn roster_exists(&self, month: MonthRef, team: &str) -> Result<bool>;

    /// Remove every entry of `team` in `month`. Returns the number removed.
    async fn delete_roster(&self, month: MonthRef, team: &str) -> Result<usize>;

    /// Insert or replace the entry keyed by `(date, name, team)`.
    async fn upsert_entry(&self, entry: &RosterEntry) -> Result<()>;

    /// All teams ordered by name.
    async fn list_teams(&self) -> Result<Vec<Team>>;

    async fn get_team(&self, id: &str) -> Result<Option<Team>>;

    async fn get_team_by_name(&self, name: &str) -> Result<Option<Team>>;

    async fn create_team(&self, team: &NewTeam) -> Result<Team>;

    /// Apply `update` and return the stored team. `TeamNotFound` if absent.
    async fn update_team(&self, id: &str, update: &TeamUpdate) -> Result<Team>;

    /// Delete a team. Its roster entries are left in place.
    async fn delete_team(&self, id: &str) -> Result<()>;

    /// Entries inside `range`, for one team or (with `None`) all teams.
    ///
    /// Fetches month by month and then filters strictly to the range, so a
    /// range that starts or ends mid-month drops the outlying days.
    async fn fetch_range(&self, range: &DateRange, team: Option<&str>) -> Result<Vec<RosterEntry>> {
        let mut out = Vec::new();
        for month in range.months() {
            match team {
                Some(team) => out.extend(self.fetch_roster(month, team).await?),
                None => {
                    for (_, entries) in self.fetch_all_teams_roster(month).await? {
                        out.extend(entries);
                    }
                }
            }
        }
        out.retain(|e| range.contains(e.date));
        Ok(out)
    }
}
