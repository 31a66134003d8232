use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post, put},
    Router,
};
use roster_core::config::RosterConfig;
use roster_store::RosterStore;
use roster_webhooks::WebhookClient;

use crate::auth::AdminSessions;
use crate::http;
use crate::views;

/// Central shared state, passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: RosterConfig,
    pub store: Arc<dyn RosterStore>,
    pub webhooks: WebhookClient,
    pub admin: AdminSessions,
}

impl AppState {
    pub fn new(config: RosterConfig, store: Arc<dyn RosterStore>, webhooks: WebhookClient) -> Self {
        let ttl = Duration::from_secs(config.admin.session_ttl_secs);
        Self {
            config,
            store,
            webhooks,
            admin: AdminSessions::new(ttl),
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // pages
        .route("/", get(views::dashboard::page))
        .route("/roster", get(views::roster::page))
        .route("/summary", get(views::summary::page))
        .route("/static/style.css", get(views::stylesheet))
        // api
        .route("/health", get(http::health::health_handler))
        .route("/api/status-options", get(http::options::status_options))
        .route(
            "/api/teams",
            get(http::teams::list_teams).post(http::teams::create_team),
        )
        .route(
            "/api/teams/{id}",
            get(http::teams::get_team)
                .put(http::teams::update_team)
                .delete(http::teams::delete_team),
        )
        .route("/api/teams/{id}/prompt", get(http::teams::team_prompt))
        .route(
            "/api/roster",
            get(http::roster::month_roster).delete(http::roster::delete_roster),
        )
        .route("/api/roster/all", get(http::roster::all_teams_roster))
        .route("/api/roster/exists", get(http::roster::roster_exists))
        .route("/api/roster/entry", put(http::roster::update_entry))
        .route("/api/grid", get(http::grid::grid_handler))
        .route("/api/dashboard", get(http::dashboard::dashboard_handler))
        .route("/api/summary", get(http::summary::summary_handler))
        .route("/api/summary.csv", get(http::summary::summary_csv_handler))
        .route("/api/admin/login", post(http::admin::login))
        .route("/api/admin/logout", post(http::admin::logout))
        .route(
            "/api/generate",
            get(http::generate::generate_options).post(http::generate::generate_handler),
        )
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Json;
    use chrono::{Datelike, NaiveDate};
    use roster_core::config::WebhooksConfig;
    use roster_core::{NewTeam, RosterEntry};
    use roster_store::SqliteStore;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn state() -> Arc<AppState> {
        state_with(WebhooksConfig::default()).await
    }

    async fn state_with(webhooks: WebhooksConfig) -> Arc<AppState> {
        let store = SqliteStore::in_memory().unwrap();
        store
            .create_team(&NewTeam {
                name: "Ops".into(),
                members: vec!["Manoj".into(), "Ayush S".into()],
                custom_prompt: None,
            })
            .await
            .unwrap();
        for (day, name, status) in [
            (1, "Manoj", "WO"),
            (1, "Ayush S", "18:00 - 03:00"),
            (2, "Manoj", "09:00 - 18:00"),
            (2, "Ayush S", "PL"),
        ] {
            store
                .upsert_entry(&RosterEntry::new(
                    NaiveDate::from_ymd_opt(2026, 2, day).unwrap(),
                    name,
                    status,
                    "Ops",
                ))
                .await
                .unwrap();
        }
        let config = RosterConfig {
            webhooks,
            ..RosterConfig::default()
        };
        let webhooks = WebhookClient::new(&config.webhooks).unwrap();
        Arc::new(AppState::new(config, Arc::new(store), webhooks))
    }

    async fn send(state: &Arc<AppState>, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let resp = build_router(state.clone()).oneshot(req).await.unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_json(state: &Arc<AppState>, uri: &str) -> (StatusCode, Value) {
        let req = Request::get(uri).body(Body::empty()).unwrap();
        let (status, body) = send(state, req).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    /// Local stand-in for both webhooks. `letmein` unlocks; `locked` is
    /// refused with a message of its own; only team Ops can be generated.
    async fn spawn_webhooks() -> WebhooksConfig {
        let app = Router::new()
            .route(
                "/generate",
                post(|Json(body): Json<Value>| async move {
                    if body["team_name"] == "Ops" && body["team_members"][0] == "Manoj" {
                        StatusCode::OK
                    } else {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                }),
            )
            .route(
                "/auth",
                post(|Json(body): Json<Value>| async move {
                    match body["password"].as_str() {
                        Some("letmein") => (StatusCode::OK, Json(json!({ "success": true }))),
                        Some("locked") => (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({ "success": false, "message": "Too many attempts" })),
                        ),
                        _ => (StatusCode::UNAUTHORIZED, Json(json!({ "success": false }))),
                    }
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        WebhooksConfig {
            generate_url: Some(format!("http://{addr}/generate")),
            auth_url: Some(format!("http://{addr}/auth")),
            timeout_secs: 5,
        }
    }

    async fn login(st: &Arc<AppState>, password: &str) -> (StatusCode, Value) {
        let req = json_req(Method::POST, "/api/admin/login", None, json!({ "password": password }));
        let (status, body) = send(st, req).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn json_req(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn health_reports_backend() {
        let (status, body) = get_json(&state().await, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["store"], "sqlite");
        assert_eq!(body["generation"], false);
    }

    #[tokio::test]
    async fn roster_defaults_to_first_team() {
        let (status, body) = get_json(&state().await, "/api/roster?year=2026&month=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["team"], "Ops");
        assert_eq!(body["exists"], true);
        assert_eq!(body["entries"].as_array().unwrap().len(), 4);
        assert_eq!(body["entries"][0]["name"], "Ayush S");
    }

    #[tokio::test]
    async fn invalid_month_is_bad_request() {
        let (status, body) = get_json(&state().await, "/api/roster?year=2026&month=13").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn month_at_calendar_edge_is_bad_request() {
        let st = state().await;
        for (year, month) in [(NaiveDate::MAX.year(), 12), (NaiveDate::MIN.year(), 1)] {
            let uri = format!("/api/roster?year={year}&month={month}");
            let (status, body) = get_json(&st, &uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["code"], "INVALID_INPUT");
        }
    }

    #[tokio::test]
    async fn writes_require_admin() {
        let st = state().await;
        let req = json_req(
            Method::POST,
            "/api/teams",
            None,
            json!({"name": "Billing", "members_text": "Kiran"}),
        );
        let (status, body) = send(&st, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["code"], "ADMIN_REQUIRED");
    }

    #[tokio::test]
    async fn admin_can_create_team_from_form_text() {
        let st = state().await;
        let token = st.admin.issue();
        let req = json_req(
            Method::POST,
            "/api/teams",
            Some(&token),
            json!({"name": " Billing ", "members_text": "Kiran\n\n  Ravi  \n", "custom_prompt": ""}),
        );
        let (status, body) = send(&st, req).await;
        assert_eq!(status, StatusCode::CREATED);
        let team: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(team["name"], "Billing");
        assert_eq!(team["members"], json!(["Kiran", "Ravi"]));
        assert!(team["custom_prompt"].is_null());

        let (_, prompt) = get_json(&st, &format!("/api/teams/{}/prompt", team["id"].as_str().unwrap())).await;
        assert_eq!(prompt["is_default"], true);
        assert!(prompt["prompt"].as_str().unwrap().contains("{{TEAM_NAME}}"));

        let uri = format!("/api/teams/{}/prompt?year=2026&month=3", team["id"].as_str().unwrap());
        let (_, rendered) = get_json(&st, &uri).await;
        let text = rendered["prompt"].as_str().unwrap();
        assert!(text.contains("'Billing' team for March 2026"));
        assert!(text.contains("Kiran, Ravi"));
    }

    #[tokio::test]
    async fn generator_options_list_years() {
        let (_, body) = get_json(&state().await, "/api/generate").await;
        assert_eq!(body["enabled"], false);
        assert_eq!(body["years"], json!([2025, 2026, 2027, 2028]));
    }

    #[tokio::test]
    async fn cell_edit_shows_up_in_grid() {
        let st = state().await;
        let token = st.admin.issue();
        let req = json_req(
            Method::PUT,
            "/api/roster/entry",
            Some(&token),
            json!({"date": "2026-02-03", "name": "Manoj", "status": "SL"}),
        );
        let (status, _) = send(&st, req).await;
        assert_eq!(status, StatusCode::OK);

        let (_, grid) = get_json(&st, "/api/grid?year=2026&month=2&sel_agent=Manoj").await;
        let rows = grid["rows"].as_array().unwrap();
        let manoj = rows.iter().find(|r| r["agent"] == "Manoj").unwrap();
        assert_eq!(manoj["selected"], true);
        assert_eq!(manoj["cells"][2]["status"], "SL");
        assert_eq!(manoj["cells"][2]["class"], "leave");
        assert_eq!(manoj["cells"][5]["status"], "-");
    }

    #[tokio::test]
    async fn dashboard_counts_one_day() {
        let (_, body) = get_json(&state().await, "/api/dashboard?date=2026-02-01&team=Ops").await;
        assert_eq!(body["stats"]["total"], 2);
        assert_eq!(body["stats"]["night"], 1);
        assert_eq!(body["stats"]["week_off"], 1);
        assert_eq!(body["unavailable"][0]["name"], "Manoj");
    }

    #[tokio::test]
    async fn summary_csv_is_an_attachment() {
        let st = state().await;
        let req = Request::get("/api/summary.csv?start=2026-02-01&end=2026-02-28&all=true")
            .body(Body::empty())
            .unwrap();
        let resp = build_router(st).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert_eq!(
            disposition,
            "attachment; filename=\"roster_summary_2026-02-01_2026-02-28.csv\""
        );
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Agent,On Call,Night Shift,Present,PL,WO,Total");
        assert_eq!(lines[1], "Ayush S,1,1,1,1,0,2");
        assert_eq!(lines[2], "Manoj,0,0,1,0,1,2");
    }

    #[tokio::test]
    async fn delete_roster_reports_team() {
        let st = state().await;
        let token = st.admin.issue();
        let req = Request::builder()
            .method(Method::DELETE)
            .uri("/api/roster?year=2026&month=2&team=Ops")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&st, req).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["removed"], 4);
        assert_eq!(body["message"], "Roster for Ops deleted successfully");

        let (_, exists) = get_json(&st, "/api/roster/exists?year=2026&month=2&team=Ops").await;
        assert_eq!(exists["exists"], false);
    }

    #[tokio::test]
    async fn unconfigured_webhooks_give_generic_errors() {
        let st = state().await;
        let (status, body) = send(
            &st,
            json_req(Method::POST, "/api/admin/login", None, json!({"password": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Authentication failed");

        let token = st.admin.issue();
        let team_id = st.store.list_teams().await.unwrap()[0].id.clone();
        let (status, body) = send(
            &st,
            json_req(
                Method::POST,
                "/api/generate",
                Some(&token),
                json!({"team_id": team_id, "year": 2026, "month": 3}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["code"], "CONFIG_ERROR");
    }

    #[tokio::test]
    async fn rejected_password_is_forbidden() {
        let st = state_with(spawn_webhooks().await).await;

        let (status, body) = login(&st, "guess").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid password");
        assert!(body.get("token").is_none());

        let (status, body) = login(&st, "locked").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Too many attempts");
    }

    #[tokio::test]
    async fn accepted_password_issues_a_working_token() {
        let st = state_with(spawn_webhooks().await).await;

        let (status, body) = login(&st, "letmein").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Admin mode enabled");
        assert_eq!(body["expires_in"], st.admin.ttl().as_secs());
        let token = body["token"].as_str().unwrap().to_string();

        let req = json_req(
            Method::POST,
            "/api/teams",
            Some(&token),
            json!({"name": "Billing", "members_text": "Kiran"}),
        );
        let (status, _) = send(&st, req).await;
        assert_eq!(status, StatusCode::CREATED);

        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/admin/logout")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&st, req).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(!st.admin.is_valid(&token));
    }

    #[tokio::test]
    async fn generation_succeeds_when_webhook_accepts() {
        let st = state_with(spawn_webhooks().await).await;
        let (_, body) = login(&st, "letmein").await;
        let token = body["token"].as_str().unwrap().to_string();

        let (_, options) = get_json(&st, "/api/generate").await;
        assert_eq!(options["enabled"], true);

        let team_id = st.store.list_teams().await.unwrap()[0].id.clone();
        let req = json_req(
            Method::POST,
            "/api/generate",
            Some(&token),
            json!({"team_id": team_id, "year": 2026, "month": 3, "slack_thread": "Manoj PL on 3rd"}),
        );
        let (status, body) = send(&st, req).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Roster generated successfully!");
    }

    #[tokio::test]
    async fn summary_page_shows_dash_for_zero() {
        let st = state().await;
        let req = Request::get("/summary?start=2026-02-01&end=2026-02-28&team=Ops")
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(&st, req).await;
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains(
            "<tr><td class=\"agent\">Manoj</td><td>-</td><td>-</td><td>1</td><td>-</td><td>1</td><td><strong>2</strong></td></tr>"
        ));
    }

    #[tokio::test]
    async fn pages_render() {
        let st = state().await;
        for uri in ["/?date=2026-02-01", "/roster?year=2026&month=2", "/summary?start=2026-02-01&end=2026-02-28"] {
            let (status, body) = send(&st, Request::get(uri).body(Body::empty()).unwrap()).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            let html = String::from_utf8(body).unwrap();
            assert!(html.starts_with("<!doctype html>"));
            assert!(html.contains("Ayush S"), "{uri}");
        }
    }
}
