use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use roster_report::{RosterGrid, Selection};
use serde::Deserialize;

use super::{month_entries, MonthQuery, Scope};
use crate::app::AppState;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Default, Deserialize)]
pub struct GridQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub team: Option<String>,
    /// With `sel_date` selects a cell, alone selects a row.
    pub sel_agent: Option<String>,
    /// Alone selects a column.
    pub sel_date: Option<NaiveDate>,
}

impl GridQuery {
    pub fn selection(&self) -> Option<Selection> {
        Selection::from_parts(self.sel_agent.as_deref(), self.sel_date)
    }
}

/// Load and shape the grid for one team's month.
pub async fn load_grid(state: &AppState, query: &GridQuery) -> ApiResult<(Option<String>, RosterGrid)> {
    let month = MonthQuery {
        year: query.year,
        month: query.month,
        team: None,
    }
    .month_ref()?;
    let team = super::resolve_team(state, query.team.as_deref()).await?;
    let scope = match &team {
        Some(t) => Scope::Team(t.clone()),
        None => Scope::Nothing,
    };
    let entries = month_entries(state, month, &scope)
        .await
        .map_err(|e| e.public("Failed to load roster"))?;
    let selection = query.selection();
    Ok((team, RosterGrid::build(month, &entries, selection.as_ref())))
}

/// GET /api/grid?year=&month=&team=&sel_agent=&sel_date=
pub async fn grid_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GridQuery>,
) -> Result<Json<RosterGrid>, ApiError> {
    let (_, grid) = load_grid(&state, &query).await?;
    Ok(Json(grid))
}
