//! Range summary: /api/summary and its CSV download.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use roster_core::DateRange;
use roster_report::{export, Summary};
use serde::Serialize;

use super::{range_entries, resolve_scope, RangeQuery};
use crate::app::AppState;
use crate::error::ApiResult;

#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub range: DateRange,
    #[serde(flatten)]
    pub summary: Summary,
}

pub async fn load_summary(state: &AppState, query: &RangeQuery) -> ApiResult<SummaryView> {
    let range = query.range()?;
    let scope = resolve_scope(state, query.team.as_deref(), query.all).await?;
    let entries = range_entries(state, &range, &scope)
        .await
        .map_err(|e| e.public("Failed to load summary"))?;
    Ok(SummaryView {
        range,
        summary: Summary::from_entries(&entries),
    })
}

/// GET /api/summary?start=&end=&team=&all=
pub async fn summary_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<SummaryView>> {
    Ok(Json(load_summary(&state, &query).await?))
}

/// GET /api/summary.csv: same parameters, served as an attachment.
pub async fn summary_csv_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<impl IntoResponse> {
    let view = load_summary(&state, &query).await?;
    let body = export::summary_csv(&view.summary);
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::csv_file_name(&view.range)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv;charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
