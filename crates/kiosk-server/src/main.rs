//! kiosk server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the kiosk JSON API over HTTP.
//!
//! Environment overrides use the `KIOSK` prefix with `__` as the section
//! separator, e.g. `KIOSK__PROVIDER__API_KEY=hf_...`.

mod config;

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use kiosk_api::ApiState;
use kiosk_provider::ChatCompletionClient;
use kiosk_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "kiosk product-summary server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: std::path::PathBuf,
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
  let settings = ::config::Config::builder()
    .add_source(::config::File::from(cli.config).required(false))
    .add_source(::config::Environment::with_prefix("KIOSK").separator("__"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  if server_cfg.provider.api_key.is_empty() {
    tracing::warn!(
      "provider api_key is not set; summary generation will return \
       configuration errors until it is"
    );
  }

  // Open SQLite store.
  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Build the completion client.
  let provider = ChatCompletionClient::new(server_cfg.provider.to_provider_config())
    .context("failed to build completion client")?;

  // Wire the API.
  let state = ApiState::new(Arc::new(store), Arc::new(provider));
  let app = axum::Router::new()
    .nest("/api", kiosk_api::api_router(state))
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
