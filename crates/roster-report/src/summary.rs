use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Weekday};
use roster_core::status::{self, PRESENT};
use roster_core::RosterEntry;
use serde::Serialize;
use tracing::debug;

/// Counters for one agent over the summarised period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentStats {
    pub total: u32,
    /// Weekend entries that are not a week off.
    pub on_call: u32,
    /// Entries whose status starts with `18:00`.
    pub night_shift: u32,
    /// One bucket per summary category; time ranges share `Present`.
    pub by_status: BTreeMap<String, u32>,
}

impl AgentStats {
    pub fn count(&self, category: &str) -> u32 {
        self.by_status.get(category).copied().unwrap_or(0)
    }
}

/// Per-agent aggregate over a flat list of entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    /// Dynamic columns: `Present` first (when any), the rest sorted.
    pub status_columns: Vec<String>,
    /// Keyed by agent name; iteration order is the display order.
    pub agents: BTreeMap<String, AgentStats>,
}

impl Summary {
    /// Single pass over `entries`. Placeholder statuses (`-`, `x`, empty)
    /// are skipped entirely.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a RosterEntry>,
    {
        let mut agents: BTreeMap<String, AgentStats> = BTreeMap::new();
        let mut categories: BTreeSet<String> = BTreeSet::new();

        for entry in entries {
            let raw = entry.status.as_str();
            if status::is_placeholder(raw) {
                continue;
            }

            let category = status::summary_category(raw);
            categories.insert(category.to_string());

            let stats = agents.entry(entry.name.clone()).or_default();
            *stats.by_status.entry(category.to_string()).or_insert(0) += 1;
            stats.total += 1;

            if is_weekend(entry) && !status::is_week_off(raw) {
                stats.on_call += 1;
            }
            if status::is_night_shift(raw) {
                stats.night_shift += 1;
            }
        }

        debug!(agents = agents.len(), columns = categories.len(), "summary built");
        Self {
            status_columns: order_columns(categories),
            agents,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

fn is_weekend(entry: &RosterEntry) -> bool {
    matches!(entry.date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn order_columns(categories: BTreeSet<String>) -> Vec<String> {
    let has_present = categories.contains(PRESENT);
    let mut columns = Vec::with_capacity(categories.len());
    if has_present {
        columns.push(PRESENT.to_string());
    }
    columns.extend(categories.into_iter().filter(|c| c != PRESENT));
    columns
}
