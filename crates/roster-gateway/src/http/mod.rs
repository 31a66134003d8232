pub mod admin;
pub mod dashboard;
pub mod generate;
pub mod grid;
pub mod health;
pub mod options;
pub mod roster;
pub mod summary;
pub mod teams;

use chrono::{Datelike, Local, NaiveDate};
use roster_core::{DateRange, MonthRef, RosterEntry, RosterError};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiResult;

/// `?year=&month=&team=`; missing parts fall back to the current month and
/// the default team.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub team: Option<String>,
}

impl MonthQuery {
    pub fn month_ref(&self) -> ApiResult<MonthRef> {
        let today = today();
        let month = MonthRef::new(
            self.year.unwrap_or(today.year()),
            self.month.unwrap_or(today.month()),
        )?;
        Ok(month)
    }
}

/// Which rows a view looks at: one team or every team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Team(String),
    All,
    /// No team was named and none exist yet.
    Nothing,
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Team to show when the request names none: the configured default,
/// otherwise the first team by name.
pub async fn resolve_team(state: &AppState, requested: Option<&str>) -> ApiResult<Option<String>> {
    if let Some(team) = requested.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(Some(team.to_string()));
    }
    if let Some(team) = &state.config.defaults.team {
        return Ok(Some(team.clone()));
    }
    let teams = state.store.list_teams().await?;
    Ok(teams.into_iter().next().map(|t| t.name))
}

/// Team name that stands for every team, as sent by the page forms.
pub const ALL_TEAMS: &str = "*";

pub async fn resolve_scope(state: &AppState, team: Option<&str>, all: bool) -> ApiResult<Scope> {
    if all || team == Some(ALL_TEAMS) {
        return Ok(Scope::All);
    }
    Ok(match resolve_team(state, team).await? {
        Some(team) => Scope::Team(team),
        None => Scope::Nothing,
    })
}

/// Rows of one month for the given scope, flattened.
pub async fn month_entries(state: &AppState, month: MonthRef, scope: &Scope) -> ApiResult<Vec<RosterEntry>> {
    let entries = match scope {
        Scope::Team(team) => state.store.fetch_roster(month, team).await?,
        Scope::All => state
            .store
            .fetch_all_teams_roster(month)
            .await?
            .into_values()
            .flatten()
            .collect(),
        Scope::Nothing => Vec::new(),
    };
    Ok(entries)
}

/// Rows inside a date range for the given scope.
pub async fn range_entries(state: &AppState, range: &DateRange, scope: &Scope) -> ApiResult<Vec<RosterEntry>> {
    let entries = match scope {
        Scope::Team(team) => state.store.fetch_range(range, Some(team)).await?,
        Scope::All => state.store.fetch_range(range, None).await?,
        Scope::Nothing => Vec::new(),
    };
    Ok(entries)
}

/// `?start=&end=` or `?preset=month|week&date=`; defaults to the current
/// month.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub preset: Option<String>,
    pub date: Option<NaiveDate>,
    pub team: Option<String>,
    #[serde(default)]
    pub all: bool,
}

impl RangeQuery {
    pub fn range(&self) -> ApiResult<DateRange> {
        let anchor = self.date.unwrap_or_else(today);
        let range = match (self.preset.as_deref(), self.start, self.end) {
            (Some("week"), _, _) => DateRange::week_of(anchor),
            (Some("month"), _, _) => DateRange::month_of(anchor),
            (Some(other), _, _) => {
                return Err(RosterError::InvalidInput(format!("unknown range preset {other:?}")).into())
            }
            (None, Some(start), Some(end)) => DateRange::new(start, end)?,
            (None, Some(start), None) => DateRange::new(start, DateRange::month_of(start).end)?,
            (None, None, Some(end)) => DateRange::new(DateRange::month_of(end).start, end)?,
            (None, None, None) => DateRange::month_of(anchor),
        };
        Ok(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn explicit_range_is_used() {
        let q = RangeQuery {
            start: Some(d(2026, 1, 20)),
            end: Some(d(2026, 2, 10)),
            ..Default::default()
        };
        let r = q.range().unwrap();
        assert_eq!((r.start, r.end), (d(2026, 1, 20), d(2026, 2, 10)));
    }

    #[test]
    fn presets_anchor_on_date() {
        let week = RangeQuery {
            preset: Some("week".into()),
            date: Some(d(2026, 10, 18)),
            ..Default::default()
        };
        let r = week.range().unwrap();
        assert_eq!((r.start, r.end), (d(2026, 10, 12), d(2026, 10, 18)));

        let month = RangeQuery {
            preset: Some("month".into()),
            date: Some(d(2026, 2, 14)),
            ..Default::default()
        };
        let r = month.range().unwrap();
        assert_eq!((r.start, r.end), (d(2026, 2, 1), d(2026, 2, 28)));
    }

    #[test]
    fn presets_hold_at_the_last_calendar_day() {
        for preset in ["week", "month"] {
            let q = RangeQuery {
                preset: Some(preset.into()),
                date: Some(NaiveDate::MAX),
                ..Default::default()
            };
            let r = q.range().unwrap();
            assert_eq!(r.end, NaiveDate::MAX, "{preset}");
        }
    }

    #[test]
    fn inverted_range_is_rejected() {
        let q = RangeQuery {
            start: Some(d(2026, 3, 1)),
            end: Some(d(2026, 2, 1)),
            ..Default::default()
        };
        assert!(q.range().is_err());
        let bad = RangeQuery {
            preset: Some("year".into()),
            ..Default::default()
        };
        assert!(bad.range().is_err());
    }

    #[test]
    fn month_query_validates_month() {
        let q = MonthQuery {
            year: Some(2026),
            month: Some(13),
            team: None,
        };
        assert!(q.month_ref().is_err());
    }
}
