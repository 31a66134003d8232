use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use roster_core::config::{RosterConfig, StoreBackend};
use roster_core::DateRange;
use roster_store::{RestStore, RosterStore, SqliteStore};
use roster_webhooks::WebhookClient;
use tracing::info;

mod app;
mod auth;
mod error;
mod http;
mod views;

#[derive(Parser, Debug)]
#[command(author, version, about = "Team roster dashboard")]
struct Cli {
    /// Path to roster.toml. Falls back to ROSTER_CONFIG, then ~/.roster/roster.toml.
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Write the summary CSV for a date range and exit.
    ExportSummary {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        /// Team name; all teams when omitted.
        #[arg(long)]
        team: Option<String>,
        /// Output file; defaults to the standard download name in the
        /// current directory. Use `-` for stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_gateway=info,tower_http=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    // explicit flag > ROSTER_CONFIG env > ~/.roster/roster.toml
    let config_path = cli.config.or_else(|| std::env::var("ROSTER_CONFIG").ok());
    let config = RosterConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        RosterConfig::default()
    });

    let store = build_store(&config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, store).await,
        Command::ExportSummary {
            start,
            end,
            team,
            out,
        } => export_summary(store.as_ref(), start, end, team.as_deref(), out).await,
    }
}

async fn serve(config: RosterConfig, store: Arc<dyn RosterStore>) -> anyhow::Result<()> {
    let webhooks = WebhookClient::new(&config.webhooks)?;
    if !webhooks.generation_enabled() {
        tracing::warn!("no generation webhook configured, roster generation is disabled");
    }

    let addr: SocketAddr = format!("{}:{}", config.gateway.bind, config.gateway.port)
        .parse()
        .context("invalid gateway bind address")?;

    let state = Arc::new(app::AppState::new(config, store, webhooks));
    let router = app::build_router(state);

    info!(%addr, "roster gateway listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

async fn export_summary(
    store: &dyn RosterStore,
    start: NaiveDate,
    end: NaiveDate,
    team: Option<&str>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let range = DateRange::new(start, end)?;
    let entries = store.fetch_range(&range, team).await?;
    let summary = roster_report::Summary::from_entries(&entries);
    let csv = roster_report::export::summary_csv(&summary);

    let out = out.unwrap_or_else(|| PathBuf::from(roster_report::export::csv_file_name(&range)));
    if out.as_os_str() == "-" {
        println!("{csv}");
    } else {
        std::fs::write(&out, csv).with_context(|| format!("writing {}", out.display()))?;
        info!(path = %out.display(), agents = summary.agents.len(), "summary exported");
    }
    Ok(())
}

fn build_store(config: &RosterConfig) -> anyhow::Result<Arc<dyn RosterStore>> {
    let store: Arc<dyn RosterStore> = match config.store.backend {
        StoreBackend::Sqlite => {
            let path = &config.database.path;
            ensure_parent_dir(path);
            info!(path = %path, "opening SQLite database");
            Arc::new(SqliteStore::open(path)?)
        }
        StoreBackend::Rest => {
            let url = config
                .store
                .url
                .as_deref()
                .context("store.url is required for the rest backend")?;
            let key = config
                .store
                .api_key
                .as_deref()
                .context("store.api_key is required for the rest backend")?;
            info!(url, "using hosted roster store");
            Arc::new(RestStore::new(url, key))
        }
    };
    Ok(store)
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
