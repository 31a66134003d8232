//! Admin unlock: POST /api/admin/login, POST /api/admin/logout
//!
//! Request:  `{"password": "..."}`
//! Response: `{"success": true, "token": "...", "expires_in": 28800, "message": "Admin mode enabled"}`
//! Rejected: `{"success": false, "message": "Invalid password"}` with 403.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::app::AppState;
use crate::auth::extract_bearer;
use crate::error::{ApiError, ApiResult};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginReply {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(StatusCode, Json<LoginReply>)> {
    let outcome = state
        .webhooks
        .verify_admin(&req.password)
        .await
        .map_err(|e| ApiError::from(e).public("Authentication failed"))?;

    if !outcome.success {
        warn!("admin unlock rejected");
        return Ok((
            StatusCode::FORBIDDEN,
            Json(LoginReply {
                success: false,
                message: outcome.rejection_message().to_string(),
                token: None,
                expires_in: None,
            }),
        ));
    }

    let token = state.admin.issue();
    info!("admin mode enabled");
    Ok((
        StatusCode::OK,
        Json(LoginReply {
            success: true,
            message: "Admin mode enabled".to_string(),
            token: Some(token),
            expires_in: Some(state.admin.ttl().as_secs()),
        }),
    ))
}

/// Drops the caller's session. Always 204, known token or not.
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = extract_bearer(&headers) {
        if state.admin.revoke(token) {
            info!("admin session closed");
        }
    }
    StatusCode::NO_CONTENT
}
