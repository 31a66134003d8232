use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 120; // generation runs an LLM workflow
pub const DEFAULT_SESSION_TTL_SECS: u64 = 8 * 60 * 60;

/// Top-level config (roster.toml + ROSTER_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub webhooks: WebhooksConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            database: DatabaseConfig::default(),
            store: StoreConfig::default(),
            webhooks: WebhooksConfig::default(),
            admin: AdminConfig::default(),
            defaults: DefaultsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file used by the `sqlite` store backend.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Which backend serves the `roster` and `teams` tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Local SQLite file at `database.path`.
    #[default]
    Sqlite,
    /// Hosted PostgREST endpoint (e.g. a Supabase project).
    Rest,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Project base URL, e.g. `https://xyz.supabase.co`. Only used by `rest`.
    pub url: Option<String>,
    /// Anonymous or service key sent as `apikey` and bearer token.
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhooksConfig {
    /// Receives the generation payload and writes rows back to the store.
    pub generate_url: Option<String>,
    /// Receives `{"password": ...}` and answers `{"success": bool}`.
    pub auth_url: Option<String>,
    #[serde(default = "default_webhook_timeout")]
    pub timeout_secs: u64,
}

impl Default for WebhooksConfig {
    fn default() -> Self {
        Self {
            generate_url: None,
            auth_url: None,
            timeout_secs: DEFAULT_WEBHOOK_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Lifetime of an admin session token issued after a successful unlock.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Team shown when a request does not name one. Falls back to the first
    /// team by name when unset.
    pub team: Option<String>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_webhook_timeout() -> u64 {
    DEFAULT_WEBHOOK_TIMEOUT_SECS
}
fn default_session_ttl() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.roster/roster.db", home)
}

impl RosterConfig {
    /// Load config from a TOML file with ROSTER_* env var overrides.
    ///
    /// Nested keys use a double underscore, e.g.
    /// `ROSTER_WEBHOOKS__GENERATE_URL`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: RosterConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("ROSTER_").split("__"))
            .extract()
            .map_err(|e| crate::error::RosterError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.roster/roster.toml", home)
}
