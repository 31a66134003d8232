use roster_core::RosterError;
use thiserror::Error;

/// Errors raised by either store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite / rusqlite error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Transport failure talking to the hosted store.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The hosted store answered with a non-success status.
    #[error("store API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A row could not be decoded into a domain type.
    #[error("parse error: {0}")]
    Parse(String),

    /// No team with the given identifier exists.
    #[error("team not found: {id}")]
    TeamNotFound { id: String },

    /// A unique constraint rejected the write (e.g. duplicate team name).
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for RosterError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TeamNotFound { id } => RosterError::TeamNotFound { id },
            StoreError::InvalidInput(msg) | StoreError::Conflict(msg) => {
                RosterError::InvalidInput(msg)
            }
            other => RosterError::Database(other.to_string()),
        }
    }
}

impl From<RosterError> for StoreError {
    fn from(err: RosterError) -> Self {
        StoreError::InvalidInput(err.to_string())
    }
}
