//! `roster-core`: shared configuration, error type and domain model.
//!
//! Every other crate in the workspace depends on this one. It has no I/O of
//! its own apart from reading the config file.

pub mod config;
pub mod error;
pub mod month;
pub mod range;
pub mod status;
pub mod types;

pub use error::{Result, RosterError};
pub use month::MonthRef;
pub use range::DateRange;
pub use types::{NewTeam, RosterEntry, Team, TeamUpdate};
