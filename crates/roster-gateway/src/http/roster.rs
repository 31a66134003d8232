//! Roster month reads and admin edits: /api/roster
//!
//! Every read goes to the store; nothing is cached between requests.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use chrono::NaiveDate;
use roster_core::{MonthRef, RosterEntry, RosterError};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{resolve_team, MonthQuery};
use crate::app::AppState;
use crate::auth::require_admin;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Serialize)]
pub struct MonthRoster {
    pub team: Option<String>,
    pub year: i32,
    pub month: u32,
    pub exists: bool,
    pub entries: Vec<RosterEntry>,
}

/// GET /api/roster?year=&month=&team=
pub async fn month_roster(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<MonthRoster>> {
    let month = query.month_ref()?;
    let team = resolve_team(&state, query.team.as_deref()).await?;
    let entries = match &team {
        Some(team) => state
            .store
            .fetch_roster(month, team)
            .await
            .map_err(|e| ApiError::from(e).public("Failed to load roster"))?,
        None => Vec::new(),
    };
    Ok(Json(MonthRoster {
        team,
        year: month.year,
        month: month.month,
        exists: !entries.is_empty(),
        entries,
    }))
}

/// GET /api/roster/all?year=&month=: every team, keyed by team name.
pub async fn all_teams_roster(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<BTreeMap<String, Vec<RosterEntry>>>> {
    let month = query.month_ref()?;
    let grouped = state
        .store
        .fetch_all_teams_roster(month)
        .await
        .map_err(|e| ApiError::from(e).public("Failed to load roster"))?;
    Ok(Json(grouped))
}

#[derive(Debug, Serialize)]
pub struct Exists {
    pub exists: bool,
}

/// GET /api/roster/exists?year=&month=&team=
pub async fn roster_exists(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<Exists>> {
    let month = query.month_ref()?;
    let exists = match resolve_team(&state, query.team.as_deref()).await? {
        Some(team) => state.store.roster_exists(month, &team).await?,
        None => false,
    };
    Ok(Json(Exists { exists }))
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub removed: usize,
    pub message: String,
}

/// DELETE /api/roster?year=&month=&team=
pub async fn delete_roster(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<Deleted>> {
    require_admin(&state.admin, &headers)?;
    let month = query.month_ref()?;
    let team = resolve_team(&state, query.team.as_deref())
        .await?
        .ok_or_else(|| RosterError::InvalidInput("team is required".into()))?;

    let removed = state
        .store
        .delete_roster(month, &team)
        .await
        .map_err(|e| ApiError::from(e).public("Failed to delete roster"))?;
    info!(%month, team = %team, removed, "roster deleted by admin");
    Ok(Json(Deleted {
        removed,
        message: format!("Roster for {team} deleted successfully"),
    }))
}

#[derive(Debug, Deserialize)]
pub struct EntryEdit {
    pub date: NaiveDate,
    pub name: String,
    pub status: String,
    /// Defaults like the other roster routes when omitted.
    #[serde(default)]
    pub team: Option<String>,
}

/// PUT /api/roster/entry: set one cell.
pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(edit): Json<EntryEdit>,
) -> ApiResult<Json<RosterEntry>> {
    require_admin(&state.admin, &headers)?;

    let name = edit.name.trim();
    let status = edit.status.trim();
    if name.is_empty() {
        return Err(RosterError::InvalidInput("agent name is required".into()).into());
    }
    if status.is_empty() {
        return Err(RosterError::InvalidInput("status is required".into()).into());
    }
    let team = resolve_team(&state, edit.team.as_deref())
        .await?
        .ok_or_else(|| RosterError::InvalidInput("team is required".into()))?;

    let entry = RosterEntry::new(edit.date, name, status, team);
    state
        .store
        .upsert_entry(&entry)
        .await
        .map_err(|e| ApiError::from(e).public("Failed to update entry"))?;
    info!(month = %MonthRef::of(entry.date), date = %entry.date, name = %entry.name, "roster cell updated");
    Ok(Json(entry))
}
