use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What the user has highlighted in the roster grid.
///
/// Held as `Option<Selection>`; `None` means nothing is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Selection {
    Cell { agent: String, date: NaiveDate },
    Row { agent: String },
    Column { date: NaiveDate },
}

impl Selection {
    /// A cell is highlighted by its own selection, its row or its column.
    pub fn covers_cell(&self, agent: &str, date: NaiveDate) -> bool {
        match self {
            Selection::Cell { agent: a, date: d } => a == agent && *d == date,
            Selection::Row { agent: a } => a == agent,
            Selection::Column { date: d } => *d == date,
        }
    }

    pub fn is_row(&self, agent: &str) -> bool {
        matches!(self, Selection::Row { agent: a } if a == agent)
    }

    pub fn is_column(&self, date: NaiveDate) -> bool {
        matches!(self, Selection::Column { date: d } if *d == date)
    }

    /// Build from optional query parameters. A date with an agent is a cell,
    /// either alone selects its row or column.
    pub fn from_parts(agent: Option<&str>, date: Option<NaiveDate>) -> Option<Self> {
        match (agent.filter(|a| !a.is_empty()), date) {
            (Some(agent), Some(date)) => Some(Selection::Cell {
                agent: agent.to_string(),
                date,
            }),
            (Some(agent), None) => Some(Selection::Row {
                agent: agent.to_string(),
            }),
            (None, Some(date)) => Some(Selection::Column { date }),
            (None, None) => None,
        }
    }
}

pub fn is_cell_selected(sel: Option<&Selection>, agent: &str, date: NaiveDate) -> bool {
    sel.is_some_and(|s| s.covers_cell(agent, date))
}

pub fn is_row_selected(sel: Option<&Selection>, agent: &str) -> bool {
    sel.is_some_and(|s| s.is_row(agent))
}

pub fn is_column_selected(sel: Option<&Selection>, date: NaiveDate) -> bool {
    sel.is_some_and(|s| s.is_column(date))
}
