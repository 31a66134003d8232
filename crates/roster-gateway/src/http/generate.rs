//! POST /api/generate: forward a generation request to the webhook.
//!
//! The webhook writes the generated rows straight into the store, so the
//! reply only says whether it accepted the job. Clients re-fetch the month
//! afterwards.

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};
use roster_core::{MonthRef, RosterError};
use roster_webhooks::GenerationRequest;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::auth::require_admin;
use crate::error::{ApiError, ApiResult};

/// Years offered by the generator form.
pub const GENERATOR_YEARS: [i32; 4] = [2025, 2026, 2027, 2028];

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    pub team_id: String,
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub slack_thread: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateReply {
    pub success: bool,
    pub message: String,
}

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(form): Json<GenerateForm>,
) -> ApiResult<Json<GenerateReply>> {
    require_admin(&state.admin, &headers)?;
    let month = MonthRef::new(form.year, form.month)?;
    let team = state
        .store
        .get_team(&form.team_id)
        .await?
        .ok_or_else(|| RosterError::TeamNotFound {
            id: form.team_id.clone(),
        })?;

    let request = GenerationRequest {
        slack_thread: form.slack_thread,
        notes: form.notes,
        month: month.month,
        year: month.year,
        team_name: team.name,
        team_members: team.members,
        custom_prompt: team.custom_prompt,
    };
    state
        .webhooks
        .trigger_generation(&request)
        .await
        .map_err(|e| ApiError::from(e).public("Failed to generate roster. Check the generation webhook."))?;

    Ok(Json(GenerateReply {
        success: true,
        message: "Roster generated successfully!".to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct GenerateOptions {
    pub enabled: bool,
    pub years: [i32; 4],
}

/// GET /api/generate: what the generator form may offer.
pub async fn generate_options(State(state): State<Arc<AppState>>) -> Json<GenerateOptions> {
    Json(GenerateOptions {
        enabled: state.webhooks.generation_enabled(),
        years: GENERATOR_YEARS,
    })
}
