use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use roster_core::MonthRef;
use roster_report::DayOverview;
use serde::Deserialize;

use super::{month_entries, resolve_scope, today};
use crate::app::AppState;
use crate::error::ApiResult;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub date: Option<NaiveDate>,
    pub team: Option<String>,
    /// Count every team instead of one.
    #[serde(default)]
    pub all: bool,
}

pub async fn load_overview(state: &AppState, query: &DashboardQuery) -> ApiResult<DayOverview> {
    let date = query.date.unwrap_or_else(today);
    let scope = resolve_scope(state, query.team.as_deref(), query.all).await?;
    let entries = month_entries(state, MonthRef::of(date), &scope)
        .await
        .map_err(|e| e.public("Failed to load roster"))?;
    Ok(DayOverview::for_date(date, &entries))
}

/// GET /api/dashboard?date=&team=&all=
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<DayOverview>> {
    Ok(Json(load_overview(&state, &query).await?))
}
