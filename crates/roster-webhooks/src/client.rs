use std::time::Duration;

use roster_core::config::WebhooksConfig;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::error::{Result, WebhookError};

/// Body posted to the generation webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Raw Slack thread with leave and shift requests.
    pub slack_thread: String,
    pub notes: String,
    /// 1-based month.
    pub month: u32,
    pub year: i32,
    pub team_name: String,
    pub team_members: Vec<String>,
    /// Sent as `null` when the team has no prompt of its own.
    pub custom_prompt: Option<String>,
}

/// Reply of the auth webhook.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthOutcome {
    /// Message to show on a rejected unlock.
    pub fn rejection_message(&self) -> &str {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or("Invalid password")
    }
}

pub struct WebhookClient {
    client: reqwest::Client,
    generate_url: Option<String>,
    auth_url: Option<String>,
}

impl WebhookClient {
    pub fn new(config: &WebhooksConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            generate_url: config.generate_url.clone(),
            auth_url: config.auth_url.clone(),
        })
    }

    pub fn generation_enabled(&self) -> bool {
        self.generate_url.is_some()
    }

    /// Fire the generation workflow. Success means the webhook answered 2xx;
    /// the rows themselves arrive in the store out of band.
    pub async fn trigger_generation(&self, req: &GenerationRequest) -> Result<()> {
        let url = self
            .generate_url
            .as_deref()
            .ok_or(WebhookError::NotConfigured("generation"))?;

        debug!(
            team = %req.team_name,
            month = req.month,
            year = req.year,
            members = req.team_members.len(),
            "triggering roster generation"
        );
        let resp = self.client.post(url).json(req).send().await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "generation webhook error");
            return Err(WebhookError::Status {
                status,
                message: text,
            });
        }

        info!(team = %req.team_name, month = req.month, year = req.year, "roster generation accepted");
        Ok(())
    }

    /// Ask the auth webhook whether `password` unlocks admin mode.
    ///
    /// The body is decoded whatever the HTTP status, since the webhook
    /// reports rejections as `{"success": false, "message": ...}`.
    pub async fn verify_admin(&self, password: &str) -> Result<AuthOutcome> {
        let url = self
            .auth_url
            .as_deref()
            .ok_or(WebhookError::NotConfigured("auth"))?;

        let resp = self
            .client
            .post(url)
            .json(&json!({ "password": password }))
            .send()
            .await?;
        let status = resp.status().as_u16();

        let outcome: AuthOutcome = resp
            .json()
            .await
            .map_err(|e| WebhookError::Parse(e.to_string()))?;
        debug!(status, success = outcome.success, "auth webhook replied");
        Ok(outcome)
    }
}
