//! Agent × day table for one month.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use roster_core::status::CellClass;
use roster_core::{MonthRef, RosterEntry};
use serde::Serialize;

use crate::selection::{self, Selection};

/// Shown for days without an entry.
pub const EMPTY_CELL: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub day: u32,
    /// Short weekday name, `Mon` … `Sun`.
    pub weekday: String,
    pub weekend: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub date: NaiveDate,
    pub status: String,
    pub class: CellClass,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub agent: String,
    pub selected: bool,
    pub cells: Vec<GridCell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RosterGrid {
    pub month: MonthRef,
    pub columns: Vec<DayColumn>,
    pub rows: Vec<GridRow>,
}

impl RosterGrid {
    /// Build the grid. Rows follow the order in which agents first appear
    /// in `entries`; when two entries share an agent and date the later one
    /// wins. Entries outside `month` never show up as cells.
    pub fn build(month: MonthRef, entries: &[RosterEntry], sel: Option<&Selection>) -> Self {
        let mut agents: Vec<&str> = Vec::new();
        let mut lookup: HashMap<(&str, NaiveDate), &str> = HashMap::with_capacity(entries.len());
        for entry in entries {
            if !agents.contains(&entry.name.as_str()) {
                agents.push(&entry.name);
            }
            lookup.insert((entry.name.as_str(), entry.date), entry.status.as_str());
        }

        let columns: Vec<DayColumn> = month
            .days()
            .map(|date| DayColumn {
                date,
                day: date.day(),
                weekday: date.format("%a").to_string(),
                weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
                selected: selection::is_column_selected(sel, date),
            })
            .collect();

        let rows = agents
            .into_iter()
            .map(|agent| GridRow {
                agent: agent.to_string(),
                selected: selection::is_row_selected(sel, agent),
                cells: columns
                    .iter()
                    .map(|col| {
                        let status = lookup.get(&(agent, col.date)).copied().unwrap_or(EMPTY_CELL);
                        GridCell {
                            date: col.date,
                            status: status.to_string(),
                            class: CellClass::classify(status),
                            selected: selection::is_cell_selected(sel, agent, col.date),
                        }
                    })
                    .collect(),
            })
            .collect();

        Self {
            month,
            columns,
            rows,
        }
    }

    pub fn status_of(&self, agent: &str, date: NaiveDate) -> Option<&str> {
        let row = self.rows.iter().find(|r| r.agent == agent)?;
        row.cells
            .iter()
            .find(|c| c.date == date)
            .map(|c| c.status.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
