use roster_core::RosterError;

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("webhook not configured: {0}")]
    NotConfigured(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unreadable webhook response: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, WebhookError>;

impl From<WebhookError> for RosterError {
    fn from(e: WebhookError) -> Self {
        match e {
            WebhookError::NotConfigured(which) => {
                RosterError::Config(format!("{which} webhook URL is not set"))
            }
            other => RosterError::Webhook(other.to_string()),
        }
    }
}
