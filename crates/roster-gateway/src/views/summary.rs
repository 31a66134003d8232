use std::fmt::Write;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
};

use super::{escape, href, layout, team_select, Page};
use crate::app::AppState;
use crate::error::ApiResult;
use crate::http::summary::load_summary;
use crate::http::{resolve_team, RangeQuery, ALL_TEAMS};

/// GET /summary: per-agent totals over a date range, with CSV download.
pub async fn page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Html<String>> {
    let view = load_summary(&state, &query).await?;
    let teams = state.store.list_teams().await?;
    let all = query.all || query.team.as_deref() == Some(ALL_TEAMS);
    let team = if all {
        None
    } else {
        resolve_team(&state, query.team.as_deref()).await?
    };
    let team_param = if all {
        ALL_TEAMS.to_string()
    } else {
        team.clone().unwrap_or_default()
    };
    let range = view.range;

    let mut body = String::new();
    let _ = write!(
        body,
        "<h1>Summary</h1><p class=\"subtitle\">{} · {} to {}</p>",
        escape(team.as_deref().unwrap_or("All teams")),
        range.start,
        range.end
    );

    let preset = |name: &str| {
        href(
            "/summary",
            &[
                ("preset", name.to_string()),
                ("date", range.start.to_string()),
                ("team", team_param.clone()),
            ],
        )
    };
    let csv_link = href(
        "/api/summary.csv",
        &[
            ("start", range.start.to_string()),
            ("end", range.end.to_string()),
            ("team", team_param.clone()),
        ],
    );
    let _ = write!(
        body,
        "<div class=\"toolbar\"><form method=\"get\" action=\"/summary\">\
         <input type=\"date\" name=\"start\" value=\"{}\"> \
         <input type=\"date\" name=\"end\" value=\"{}\"> {} \
         <button type=\"submit\">Apply</button></form>\
         <a href=\"{}\">Month</a><a href=\"{}\">Week</a>\
         <a href=\"{csv_link}\" download>Download CSV</a></div>",
        range.start,
        range.end,
        team_select(&teams, team.as_deref(), true, all),
        preset("month"),
        preset("week"),
    );

    let summary = &view.summary;
    if summary.is_empty() {
        body.push_str("<p class=\"empty\">No data for the selected range.</p>");
        return Ok(layout(Page::Summary, "Summary", &body));
    }

    body.push_str("<div class=\"grid-wrap\"><table><tr><th class=\"agent\">Agent</th><th>On Call</th><th>Night Shift</th>");
    for column in &summary.status_columns {
        let _ = write!(body, "<th>{}</th>", escape(column));
    }
    body.push_str("<th>Total</th></tr>");
    for (agent, stats) in &summary.agents {
        let _ = write!(
            body,
            "<tr><td class=\"agent\">{}</td><td>{}</td><td>{}</td>",
            escape(agent),
            count_cell(stats.on_call),
            count_cell(stats.night_shift)
        );
        for column in &summary.status_columns {
            let _ = write!(body, "<td>{}</td>", count_cell(stats.count(column)));
        }
        let _ = write!(body, "<td><strong>{}</strong></td></tr>", stats.total);
    }
    body.push_str("</table></div>");

    Ok(layout(Page::Summary, "Summary", &body))
}

/// Zero counts read as `-` in the table; the CSV keeps the number.
fn count_cell(n: u32) -> String {
    if n == 0 {
        "-".to_string()
    } else {
        n.to_string()
    }
}
