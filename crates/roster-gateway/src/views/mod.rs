//! Server-rendered pages. Each page reuses the loader of its JSON route and
//! renders the result into a shared layout.

pub mod dashboard;
pub mod roster;
pub mod summary;

use std::fmt::Write;

use axum::{http::header, response::Html, response::IntoResponse};
use roster_core::Team;

use crate::http::ALL_TEAMS;

static STYLE_CSS: &str = include_str!("../../static/style.css");

/// GET /static/style.css
pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Roster,
    Summary,
}

const NAV: [(Page, &str, &str); 3] = [
    (Page::Dashboard, "/", "Dashboard"),
    (Page::Roster, "/roster", "Roster"),
    (Page::Summary, "/summary", "Summary"),
];

pub fn layout(active: Page, title: &str, body: &str) -> Html<String> {
    let mut nav = String::new();
    for (page, href, label) in NAV {
        let class = if page == active { " class=\"active\"" } else { "" };
        let _ = write!(nav, "<a href=\"{href}\"{class}>{label}</a>");
    }
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{} · Roster</title>\n<link rel=\"stylesheet\" href=\"/static/style.css\">\n\
         </head>\n<body>\n<nav>{nav}</nav>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        escape(title)
    ))
}

/// Escape text for HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `path?k=v&...` with percent-encoded values; empty values are dropped.
pub fn href(path: &str, params: &[(&str, String)]) -> String {
    let query: Vec<String> = params
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect();
    if query.is_empty() {
        path.to_string()
    } else {
        escape(&format!("{path}?{}", query.join("&")))
    }
}

/// `<select name="team">` with an optional "All teams" entry.
pub fn team_select(teams: &[Team], selected: Option<&str>, all_option: bool, all_selected: bool) -> String {
    let mut out = String::from("<select name=\"team\">");
    if all_option {
        let sel = if all_selected { " selected" } else { "" };
        let _ = write!(out, "<option value=\"{ALL_TEAMS}\"{sel}>All teams</option>");
    }
    for team in teams {
        let sel = if !all_selected && selected == Some(team.name.as_str()) {
            " selected"
        } else {
            ""
        };
        let name = escape(&team.name);
        let _ = write!(out, "<option value=\"{name}\"{sel}>{name}</option>");
    }
    out.push_str("</select>");
    out
}
