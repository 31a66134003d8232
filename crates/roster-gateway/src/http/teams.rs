//! Team CRUD: /api/teams
//!
//! Reads are public. Create, update and delete need an admin session.
//! Create accepts either a `members` array or `members_text` with one name
//! per line, as typed into the team editor.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use roster_core::{MonthRef, NewTeam, RosterError, Team, TeamUpdate};
use roster_webhooks::{PromptContext, PromptTemplate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::app::AppState;
use crate::auth::require_admin;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct TeamForm {
    pub name: String,
    #[serde(default)]
    pub members: Option<Vec<String>>,
    #[serde(default)]
    pub members_text: Option<String>,
    #[serde(default)]
    pub custom_prompt: Option<String>,
}

impl TeamForm {
    fn into_new_team(self) -> Result<NewTeam, RosterError> {
        match (self.members, self.members_text) {
            (Some(members), _) => {
                let team = NewTeam {
                    name: self.name,
                    members,
                    custom_prompt: self.custom_prompt,
                };
                team.validate()?;
                Ok(team)
            }
            (None, text) => NewTeam::from_form(
                &self.name,
                text.as_deref().unwrap_or_default(),
                self.custom_prompt.as_deref(),
            ),
        }
    }
}

/// GET /api/teams
pub async fn list_teams(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Team>>> {
    let teams = state
        .store
        .list_teams()
        .await
        .map_err(|e| ApiError::from(e).public("Failed to load teams"))?;
    Ok(Json(teams))
}

/// GET /api/teams/{id}
pub async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Team>> {
    Ok(Json(find_team(&state, &id).await?))
}

/// POST /api/teams
pub async fn create_team(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(form): Json<TeamForm>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    require_admin(&state.admin, &headers)?;
    let new_team = form.into_new_team()?;
    let team = state.store.create_team(&new_team).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// PUT /api/teams/{id}
pub async fn update_team(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<TeamUpdate>,
) -> ApiResult<Json<Team>> {
    require_admin(&state.admin, &headers)?;
    let team = state.store.update_team(&id, &update).await?;
    Ok(Json(team))
}

/// DELETE /api/teams/{id}: roster rows of the team stay in place.
pub async fn delete_team(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    require_admin(&state.admin, &headers)?;
    state.store.delete_team(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct PromptView {
    /// True when the team has no prompt of its own.
    pub is_default: bool,
    pub prompt: String,
}

/// With `year` and `month` the prompt is rendered for that month.
#[derive(Debug, Default, Deserialize)]
pub struct PromptQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    #[serde(default)]
    pub slack_thread: String,
}

/// GET /api/teams/{id}/prompt: effective generation prompt.
pub async fn team_prompt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<PromptQuery>,
) -> ApiResult<Json<PromptView>> {
    let team = find_team(&state, &id).await?;
    let template = PromptTemplate::for_team(team.custom_prompt.as_deref());
    let prompt = match (query.year, query.month) {
        (Some(year), Some(month)) => template.render(&PromptContext {
            team_name: &team.name,
            members: &team.members,
            month: MonthRef::new(year, month)?,
            slack_requests: &query.slack_thread,
        }),
        _ => template.as_str().to_string(),
    };
    Ok(Json(PromptView {
        is_default: team.custom_prompt.is_none(),
        prompt,
    }))
}

async fn find_team(state: &AppState, id: &str) -> ApiResult<Team> {
    state
        .store
        .get_team(id)
        .await?
        .ok_or_else(|| RosterError::TeamNotFound { id: id.to_string() }.into())
}
