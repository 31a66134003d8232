use std::fmt::Write;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
};
use chrono::NaiveDate;
use roster_core::status::ShiftBand;
use roster_report::dashboard::AgentStatus;

use super::{escape, href, layout, team_select, Page};
use crate::app::AppState;
use crate::error::ApiResult;
use crate::http::dashboard::{load_overview, DashboardQuery};
use crate::http::{resolve_team, today, ALL_TEAMS};

/// GET /: one day at a glance.
pub async fn page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Html<String>> {
    let date = query.date.unwrap_or_else(today);
    let query = DashboardQuery {
        date: Some(date),
        ..query
    };
    let overview = load_overview(&state, &query).await?;
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

    let mut body = String::new();
    let scope_label = team.as_deref().unwrap_or("All teams");
    let _ = write!(
        body,
        "<h1>Dashboard</h1><p class=\"subtitle\">{} overview for {}</p>",
        escape(scope_label),
        date.format("%A, %-d %B %Y")
    );

    let day_link = |forward: bool| {
        href(
            "/",
            &[
                ("date", step_day(date, forward).to_string()),
                ("team", team_param.clone()),
            ],
        )
    };
    let _ = write!(
        body,
        "<div class=\"toolbar\"><a href=\"{}\">&larr; Previous day</a>\
         <form method=\"get\" action=\"/\"><input type=\"date\" name=\"date\" value=\"{date}\"> {} \
         <button type=\"submit\">Show</button></form><a href=\"{}\">Next day &rarr;</a></div>",
        day_link(false),
        team_select(&teams, team.as_deref(), true, all),
        day_link(true),
    );

    let s = &overview.stats;
    body.push_str("<div class=\"cards\">");
    for (label, value) in [
        ("Total", s.total),
        ("Working", s.working),
        ("Morning", s.morning),
        ("Afternoon", s.afternoon),
        ("Night", s.night),
        ("Leave", s.leave),
        ("Week off", s.week_off),
    ] {
        let _ = write!(
            body,
            "<div class=\"card\"><div class=\"value\">{value}</div><div class=\"label\">{label}</div></div>"
        );
    }
    body.push_str("</div>");

    if s.total == 0 {
        body.push_str("<p class=\"empty\">No roster data for this date.</p>");
    } else {
        body.push_str("<div class=\"lists\">");
        agent_table(&mut body, "Working today", &overview.working);
        agent_table(&mut body, "On leave / off", &overview.unavailable);
        body.push_str("</div>");
    }

    Ok(layout(Page::Dashboard, "Dashboard", &body))
}

fn agent_table(out: &mut String, title: &str, agents: &[AgentStatus]) {
    let _ = write!(out, "<section><h2>{title} ({})</h2>", agents.len());
    if agents.is_empty() {
        out.push_str("<p class=\"empty\">Nobody.</p></section>");
        return;
    }
    out.push_str("<table><tr><th class=\"agent\">Agent</th><th>Team</th><th>Status</th></tr>");
    for a in agents {
        let class = ShiftBand::classify(&a.status)
            .map(|b| b.css_class())
            .unwrap_or("");
        let _ = write!(
            out,
            "<tr><td class=\"agent\">{}</td><td>{}</td><td class=\"{class}\">{}</td></tr>",
            escape(&a.name),
            escape(&a.team),
            escape(&a.status)
        );
    }
    out.push_str("</table></section>");
}

/// Neighbouring day for the previous/next links; stays on `date` at the
/// calendar edges.
fn step_day(date: NaiveDate, forward: bool) -> NaiveDate {
    let step = if forward { date.succ_opt() } else { date.pred_opt() };
    step.unwrap_or(date)
}
