use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Admin access required")]
    AdminRequired,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Team not found: {id}")]
    TeamNotFound { id: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Webhook error: {0}")]
    Webhook(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RosterError {
    /// Short error code string sent to clients alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            RosterError::Config(_) => "CONFIG_ERROR",
            RosterError::AuthFailed(_) => "AUTH_FAILED",
            RosterError::AdminRequired => "ADMIN_REQUIRED",
            RosterError::InvalidInput(_) => "INVALID_INPUT",
            RosterError::TeamNotFound { .. } => "TEAM_NOT_FOUND",
            RosterError::Database(_) => "DATABASE_ERROR",
            RosterError::Webhook(_) => "WEBHOOK_ERROR",
            RosterError::Serialization(_) => "SERIALIZATION_ERROR",
            RosterError::Io(_) => "IO_ERROR",
            RosterError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
