// Calls against a throwaway local HTTP server standing in for the webhooks.

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use roster_core::config::WebhooksConfig;
use roster_webhooks::{GenerationRequest, WebhookClient, WebhookError};
use serde_json::{json, Value};

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base: &str) -> WebhookClient {
    WebhookClient::new(&WebhooksConfig {
        generate_url: Some(format!("{base}/generate")),
        auth_url: Some(format!("{base}/auth")),
        timeout_secs: 5,
    })
    .unwrap()
}

fn request(team: &str) -> GenerationRequest {
    GenerationRequest {
        slack_thread: "Kiran WO on 14th".into(),
        notes: "keep nights fair".into(),
        month: 2,
        year: 2026,
        team_name: team.into(),
        team_members: vec!["Kiran".into()],
        custom_prompt: Some("Roster for {{TEAM_NAME}}".into()),
    }
}

fn app() -> Router {
    Router::new()
        .route(
            "/generate",
            post(|Json(body): Json<Value>| async move {
                if body["team_name"] == "Ops" && body["month"] == 2 {
                    StatusCode::OK
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }),
        )
        .route(
            "/auth",
            post(|Json(body): Json<Value>| async move {
                if body["password"] == "letmein" {
                    (StatusCode::OK, Json(json!({ "success": true })))
                } else {
                    (StatusCode::UNAUTHORIZED, Json(json!({ "success": false })))
                }
            }),
        )
}

#[tokio::test]
async fn generation_succeeds_on_2xx() {
    let base = spawn(app()).await;
    client(&base).trigger_generation(&request("Ops")).await.unwrap();
}

#[tokio::test]
async fn generation_fails_on_error_status() {
    let base = spawn(app()).await;
    let err = client(&base)
        .trigger_generation(&request("Billing"))
        .await
        .unwrap_err();
    assert!(matches!(err, WebhookError::Status { status: 500, .. }));
}

#[tokio::test]
async fn auth_outcome_is_read_from_body() {
    let base = spawn(app()).await;
    let c = client(&base);
    assert!(c.verify_admin("letmein").await.unwrap().success);

    let rejected = c.verify_admin("wrong").await.unwrap();
    assert!(!rejected.success);
    assert_eq!(rejected.rejection_message(), "Invalid password");
}
