//! amity server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the JSON API over HTTP under `/api`.
//!
//! The user directory and elevated-user set come from the config file; a host
//! platform embedding the API would supply its own implementations instead.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use amity_api::{
  ApiSettings, AppState, StatusNotifier, StatusSink, StatusUpdate,
};
use amity_core::{
  privacy::PrivacyDefaults,
  search::{ElevatedSet, InMemoryDirectory, UserRecord},
};
use amity_store_sqlite::SqliteStore;
use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,

  /// Whether users may change their own privacy settings.
  #[serde(default = "default_true")]
  pub privacy_change_enabled: bool,

  /// Defaults applied to users who never saved privacy settings.
  #[serde(default)]
  pub privacy_defaults: PrivacyDefaults,

  /// Users who bypass visibility checks.
  #[serde(default)]
  pub elevated_users: Vec<Uuid>,

  /// The user roster served to search.
  #[serde(default)]
  pub directory_users: Vec<UserRecord>,

  /// Whether opted-in status updates are broadcast (to the log, here).
  #[serde(default)]
  pub broadcast_status_updates: bool,

  #[serde(default = "default_broadcast_capacity")]
  pub broadcast_capacity: usize,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("amity.db") }
fn default_true() -> bool { true }
fn default_broadcast_capacity() -> usize { 64 }

// ─── Broadcast sink ───────────────────────────────────────────────────────────

/// Stand-in broadcast destination: writes accepted updates to the log. A real
/// deployment would bridge to an external feed here.
struct LogSink;

impl StatusSink for LogSink {
  async fn deliver(
    &self,
    update: StatusUpdate,
  ) -> Result<(), amity_api::notify::BoxError> {
    tracing::info!(
      user_id = %update.user_id,
      message = %update.message,
      "status broadcast"
    );
    Ok(())
  }
}

// ─── Main ─────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Amity profile server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("AMITY"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let notifier = if server_cfg.broadcast_status_updates {
    StatusNotifier::spawn(LogSink, server_cfg.broadcast_capacity)
  } else {
    StatusNotifier::disabled()
  };

  // Build application state.
  let state = AppState {
    store:     Arc::new(store),
    directory: Arc::new(InMemoryDirectory::new(
      server_cfg.directory_users.clone(),
    )),
    access:    Arc::new(ElevatedSet::new(
      server_cfg.elevated_users.iter().copied(),
    )),
    defaults:  server_cfg.privacy_defaults.clone(),
    settings:  ApiSettings {
      privacy_change_enabled: server_cfg.privacy_change_enabled,
    },
    notifier,
  };

  let app = Router::new()
    .nest("/api", amity_api::api_router(state))
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
