use std::fmt::Write;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
};
use roster_core::MonthRef;
use roster_report::RosterGrid;

use super::{escape, href, layout, team_select, Page};
use crate::app::AppState;
use crate::error::ApiResult;
use crate::http::grid::{load_grid, GridQuery};

/// GET /roster: the month grid of one team. Clicking a header, agent or
/// cell selects that column, row or cell.
pub async fn page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GridQuery>,
) -> ApiResult<Html<String>> {
    let (team, grid) = load_grid(&state, &query).await?;
    let teams = state.store.list_teams().await?;
    let month = grid.month;
    let team_param = team.clone().unwrap_or_default();

    let month_link = |m: MonthRef| {
        href(
            "/roster",
            &[
                ("year", m.year.to_string()),
                ("month", m.month.to_string()),
                ("team", team_param.clone()),
            ],
        )
    };

    let mut body = String::new();
    let _ = write!(
        body,
        "<h1>Roster</h1><p class=\"subtitle\">{} · {month}</p>",
        escape(team.as_deref().unwrap_or("No team"))
    );
    let _ = write!(
        body,
        "<div class=\"toolbar\"><a href=\"{}\">&larr; {}</a>\
         <form method=\"get\" action=\"/roster\">\
         <input type=\"hidden\" name=\"year\" value=\"{}\">\
         <input type=\"hidden\" name=\"month\" value=\"{}\">{} \
         <button type=\"submit\">Show</button></form>\
         <a href=\"{}\">{} &rarr;</a></div>",
        month_link(month.prev()),
        month.prev().name(),
        month.year,
        month.month,
        team_select(&teams, team.as_deref(), false, false),
        month_link(month.next()),
        month.next().name(),
    );

    if grid.is_empty() {
        let _ = write!(
            body,
            "<p class=\"empty\">No roster for {} in {month}.</p>",
            escape(team.as_deref().unwrap_or("this team"))
        );
    } else {
        render_grid(&mut body, &grid, &team_param);
    }

    Ok(layout(Page::Roster, "Roster", &body))
}

fn render_grid(out: &mut String, grid: &RosterGrid, team: &str) {
    let base = [
        ("year", grid.month.year.to_string()),
        ("month", grid.month.month.to_string()),
        ("team", team.to_string()),
    ];
    let select = |agent: Option<&str>, date: Option<String>| {
        let mut params = base.to_vec();
        params.push(("sel_agent", agent.unwrap_or_default().to_string()));
        params.push(("sel_date", date.unwrap_or_default()));
        href("/roster", &params)
    };

    out.push_str("<div class=\"grid-wrap\"><table><tr><th class=\"agent\">Agent</th>");
    for col in &grid.columns {
        let mut class = String::new();
        if col.weekend {
            class.push_str("weekend");
        }
        if col.selected {
            class.push_str(" selected");
        }
        let _ = write!(
            out,
            "<th class=\"{}\"><a href=\"{}\">{}<br>{}</a></th>",
            class.trim(),
            select(None, Some(col.date.to_string())),
            col.day,
            col.weekday
        );
    }
    out.push_str("</tr>");

    for row in &grid.rows {
        let row_class = if row.selected { "agent selected" } else { "agent" };
        let _ = write!(
            out,
            "<tr><td class=\"{row_class}\"><a href=\"{}\">{}</a></td>",
            select(Some(row.agent.as_str()), None),
            escape(&row.agent)
        );
        for cell in &row.cells {
            let selected = if cell.selected { " selected" } else { "" };
            let _ = write!(
                out,
                "<td class=\"{}{selected}\"><a href=\"{}\">{}</a></td>",
                cell.class.css_class(),
                select(Some(row.agent.as_str()), Some(cell.date.to_string())),
                escape(&cell.status)
            );
        }
        out.push_str("</tr>");
    }
    out.push_str("</table></div>");
}
