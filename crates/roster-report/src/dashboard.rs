//! Single-day overview shown on the landing page.

use chrono::NaiveDate;
use roster_core::status::{
    self, AFTERNOON_SHIFTS, MORNING_SHIFT, NIGHT_SHIFT, PLANNED_LEAVE, SICK_LEAVE, WEEK_OFF,
    WORK_FROM_HOME,
};
use roster_core::RosterEntry;
use serde::Serialize;

/// Head counts for one day. A row may land in several buckets, e.g. a
/// morning shift is both `working` and `morning`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DayStats {
    pub total: usize,
    pub working: usize,
    pub morning: usize,
    pub afternoon: usize,
    pub night: usize,
    /// `PL`, `SL` and `WFH`.
    pub leave: usize,
    pub week_off: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentStatus {
    pub name: String,
    pub team: String,
    pub status: String,
}

impl From<&RosterEntry> for AgentStatus {
    fn from(e: &RosterEntry) -> Self {
        Self {
            name: e.name.clone(),
            team: e.team.clone(),
            status: e.status.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DayOverview {
    pub date: NaiveDate,
    pub stats: DayStats,
    /// Agents on a time-range shift.
    pub working: Vec<AgentStatus>,
    /// Agents on leave, week off or working from home.
    pub unavailable: Vec<AgentStatus>,
}

impl DayOverview {
    /// Overview of `date`. Rows for other days are ignored so a whole
    /// month may be passed in.
    pub fn for_date(date: NaiveDate, entries: &[RosterEntry]) -> Self {
        let day: Vec<&RosterEntry> = entries.iter().filter(|e| e.date == date).collect();
        let mut stats = DayStats {
            total: day.len(),
            ..Default::default()
        };
        let mut working = Vec::new();
        let mut unavailable = Vec::new();

        for entry in day {
            let s = entry.status.as_str();
            if status::is_time_range(s) && s != WEEK_OFF {
                stats.working += 1;
            }
            if s == MORNING_SHIFT {
                stats.morning += 1;
            }
            if AFTERNOON_SHIFTS.contains(&s) {
                stats.afternoon += 1;
            }
            if s == NIGHT_SHIFT {
                stats.night += 1;
            }
            if matches!(s, PLANNED_LEAVE | SICK_LEAVE | WORK_FROM_HOME) {
                stats.leave += 1;
            }
            if s == WEEK_OFF {
                stats.week_off += 1;
            }

            if status::is_time_range(s) {
                working.push(AgentStatus::from(entry));
            }
            if matches!(s, PLANNED_LEAVE | SICK_LEAVE | WEEK_OFF | WORK_FROM_HOME) {
                unavailable.push(AgentStatus::from(entry));
            }
        }

        Self {
            date,
            stats,
            working,
            unavailable,
        }
    }
}
