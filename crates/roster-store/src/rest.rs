//! PostgREST backend: the hosted store used in production (Supabase).
//!
//! Every call is a single HTTP request against `{base_url}/rest/v1/{table}`
//! with PostgREST filter syntax (`col=eq.value`, `gte.`, `lte.`, `order=`).

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Datelike;
use roster_core::{MonthRef, NewTeam, RosterEntry, Team, TeamUpdate};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::store::RosterStore;

const ROSTER_TABLE: &str = "roster";
const TEAMS_TABLE: &str = "teams";
const ROSTER_CONFLICT_KEY: &str = "date,name,team";

type Params = Vec<(&'static str, String)>;

pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: reqwest::Method, table: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Send and decode a JSON array response.
    async fn send_rows<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<Vec<T>> {
        let resp = req.send().await?;
        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "store API error");
            return Err(StoreError::Api {
                status,
                message: text,
            });
        }
        resp.json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    /// Send a request whose body is irrelevant (e.g. upsert without return).
    async fn send_empty(&self, req: reqwest::RequestBuilder) -> Result<()> {
        let resp = req.send().await?;
        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "store API error");
            return Err(StoreError::Api {
                status,
                message: text,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RosterStore for RestStore {
    fn backend(&self) -> &str {
        "rest"
    }

    async fn fetch_roster(&self, month: MonthRef, team: &str) -> Result<Vec<RosterEntry>> {
        let mut params = month_filters(month, Some(team));
        params.push(("select", "*".into()));
        params.push(("order", "date.asc,name.asc".into()));
        debug!(%month, team, "fetching roster");
        let req = self.request(reqwest::Method::GET, ROSTER_TABLE).query(&params);
        self.send_rows(req).await
    }

    async fn fetch_all_teams_roster(
        &self,
        month: MonthRef,
    ) -> Result<BTreeMap<String, Vec<RosterEntry>>> {
        let mut params = month_filters(month, None);
        params.push(("select", "*".into()));
        params.push(("order", "team.asc,date.asc,name.asc".into()));
        debug!(%month, "fetching roster for all teams");
        let req = self.request(reqwest::Method::GET, ROSTER_TABLE).query(&params);
        let rows: Vec<RosterEntry> = self.send_rows(req).await?;

        let mut grouped: BTreeMap<String, Vec<RosterEntry>> = BTreeMap::new();
        for entry in rows {
            grouped.entry(entry.team.clone()).or_default().push(entry);
        }
        Ok(grouped)
    }

    async fn roster_exists(&self, month: MonthRef, team: &str) -> Result<bool> {
        let mut params = month_filters(month, Some(team));
        params.push(("select", "id".into()));
        params.push(("limit", "1".into()));
        let req = self.request(reqwest::Method::GET, ROSTER_TABLE).query(&params);
        let rows: Vec<Value> = self.send_rows(req).await?;
        Ok(!rows.is_empty())
    }

    async fn delete_roster(&self, month: MonthRef, team: &str) -> Result<usize> {
        let params = month_filters(month, Some(team));
        let req = self
            .request(reqwest::Method::DELETE, ROSTER_TABLE)
            .query(&params)
            .header("Prefer", "return=representation");
        let removed: Vec<Value> = self.send_rows(req).await?;
        info!(%month, team, removed = removed.len(), "roster month deleted");
        Ok(removed.len())
    }

    async fn upsert_entry(&self, entry: &RosterEntry) -> Result<()> {
        let req = self
            .request(reqwest::Method::POST, ROSTER_TABLE)
            .query(&[("on_conflict", ROSTER_CONFLICT_KEY)])
            .header("Prefer", "resolution=merge-duplicates")
            .json(&upsert_body(entry));
        self.send_empty(req).await?;
        debug!(date = %entry.date, name = %entry.name, team = %entry.team, "roster entry upserted");
        Ok(())
    }

    async fn list_teams(&self) -> Result<Vec<Team>> {
        let req = self
            .request(reqwest::Method::GET, TEAMS_TABLE)
            .query(&[("select", "*"), ("order", "name.asc")]);
        self.send_rows(req).await
    }

    async fn get_team(&self, id: &str) -> Result<Option<Team>> {
        let req = self
            .request(reqwest::Method::GET, TEAMS_TABLE)
            .query(&single_filter("id", id));
        let rows: Vec<Team> = self.send_rows(req).await?;
        Ok(rows.into_iter().next())
    }

    async fn get_team_by_name(&self, name: &str) -> Result<Option<Team>> {
        let req = self
            .request(reqwest::Method::GET, TEAMS_TABLE)
            .query(&single_filter("name", name));
        let rows: Vec<Team> = self.send_rows(req).await?;
        Ok(rows.into_iter().next())
    }

    async fn create_team(&self, team: &NewTeam) -> Result<Team> {
        team.validate()?;
        let body = json!({
            "name": team.name.trim(),
            "members": roster_core::types::clean_members(&team.members),
            "custom_prompt": roster_core::types::normalize_prompt(team.custom_prompt.as_deref()),
        });
        let req = self
            .request(reqwest::Method::POST, TEAMS_TABLE)
            .header("Prefer", "return=representation")
            .json(&body);
        let rows: Vec<Team> = self.send_rows(req).await?;
        let created = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Parse("insert returned no row".into()))?;
        info!(team_id = %created.id, name = %created.name, "team created");
        Ok(created)
    }

    async fn update_team(&self, id: &str, update: &TeamUpdate) -> Result<Team> {
        update.validate()?;
        let req = self
            .request(reqwest::Method::PATCH, TEAMS_TABLE)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&patch_body(update));
        let rows: Vec<Team> = self.send_rows(req).await?;
        let updated = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::TeamNotFound { id: id.to_string() })?;
        info!(team_id = %id, "team updated");
        Ok(updated)
    }

    async fn delete_team(&self, id: &str) -> Result<()> {
        let req = self
            .request(reqwest::Method::DELETE, TEAMS_TABLE)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation");
        let removed: Vec<Value> = self.send_rows(req).await?;
        if removed.is_empty() {
            return Err(StoreError::TeamNotFound { id: id.to_string() });
        }
        info!(team_id = %id, "team deleted");
        Ok(())
    }
}

/// Team and date-window filters for one month.
fn month_filters(month: MonthRef, team: Option<&str>) -> Params {
    let mut params: Params = Vec::with_capacity(4);
    if let Some(team) = team {
        params.push(("team", format!("eq.{team}")));
    }
    params.push(("date", format!("gte.{}", month.first_day())));
    params.push(("date", format!("lte.{}", month.last_day())));
    params
}

fn single_filter(column: &'static str, value: &str) -> Params {
    vec![
        ("select", "*".into()),
        (column, format!("eq.{value}")),
        ("limit", "1".into()),
    ]
}

/// Row written on upsert. `month` and `year` are denormalised for reporting.
fn upsert_body(entry: &RosterEntry) -> Value {
    json!({
        "date": entry.date,
        "name": entry.name,
        "status": entry.status,
        "team": entry.team,
        "month": entry.date.month(),
        "year": entry.date.year(),
    })
}

/// PATCH body containing only the fields present in `update`.
fn patch_body(update: &TeamUpdate) -> Value {
    let mut body = Map::new();
    if let Some(name) = &update.name {
        body.insert("name".into(), json!(name.trim()));
    }
    if let Some(members) = &update.members {
        body.insert(
            "members".into(),
            json!(roster_core::types::clean_members(members)),
        );
    }
    if let Some(prompt) = &update.custom_prompt {
        body.insert(
            "custom_prompt".into(),
            json!(roster_core::types::normalize_prompt(prompt.as_deref())),
        );
    }
    Value::Object(body)
}
