use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::RosterError;
use roster_store::StoreError;
use roster_webhooks::WebhookError;
use serde_json::json;
use tracing::warn;

/// Handler error: a domain error plus the message shown to the user.
///
/// Client mistakes (bad input, unknown team, missing admin session) echo the
/// underlying message. Server-side failures are logged in full and the
/// client only gets a generic line.
#[derive(Debug)]
pub struct ApiError {
    err: RosterError,
    public: Option<&'static str>,
}

impl ApiError {
    /// Replace the generic message for server-side failures.
    pub fn public(mut self, message: &'static str) -> Self {
        self.public = Some(message);
        self
    }

    fn status(&self) -> StatusCode {
        match &self.err {
            RosterError::InvalidInput(_) | RosterError::Serialization(_) => StatusCode::BAD_REQUEST,
            RosterError::AdminRequired => StatusCode::UNAUTHORIZED,
            RosterError::AuthFailed(_) => StatusCode::FORBIDDEN,
            RosterError::TeamNotFound { .. } => StatusCode::NOT_FOUND,
            RosterError::Webhook(_) => StatusCode::BAD_GATEWAY,
            RosterError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
            RosterError::Database(_) | RosterError::Io(_) | RosterError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

impl From<RosterError> for ApiError {
    fn from(err: RosterError) -> Self {
        Self { err, public: None }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        RosterError::from(err).into()
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        RosterError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if self.is_client_error() {
            self.err.to_string()
        } else {
            warn!(code = self.err.code(), error = %self.err, "request failed");
            self.public.unwrap_or("Something went wrong").to_string()
        };
        let body = json!({ "error": message, "code": self.err.code() });
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
