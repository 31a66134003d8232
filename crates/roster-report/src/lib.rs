//! `roster-report`: shapes flat roster rows into what the views display.
//!
//! | Module      | Produces                                              |
//! |-------------|-------------------------------------------------------|
//! | `grid`      | agent × day table for one month                       |
//! | `dashboard` | head counts and availability lists for a single day   |
//! | `summary`   | per-agent totals over a date range                    |
//! | `export`    | CSV text of a summary                                 |
//! | `selection` | which grid cells are highlighted                      |
//! | `range`     | date-window filtering of flat rows                    |
//!
//! Everything here is a pure function of its input rows.

pub mod dashboard;
pub mod export;
pub mod grid;
pub mod range;
pub mod selection;
pub mod summary;

pub use dashboard::DayOverview;
pub use grid::RosterGrid;
pub use selection::Selection;
pub use summary::{AgentStats, Summary};
