//! enkaku API server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), loads the
//! CSV collections from the configured data directory, and serves the JSON
//! API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use enkaku_api::api_router;
use enkaku_engine::DataStore;
use enkaku_ingest::CsvRecordSource;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "enkaku municipal-lineage API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

/// Runtime server configuration, deserialised from `config.toml` with
/// `ENKAKU_*` environment overrides.
#[derive(Debug, Clone, Deserialize)]
struct ServerConfig {
  host:     String,
  port:     u16,
  data_dir: PathBuf,
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
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8080_i64)?
    .set_default("data_dir", "data")?
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("ENKAKU"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Build the store and load everything up front; queries are pure reads
  // afterwards.
  let source = CsvRecordSource::new(server_cfg.data_dir.clone());
  let store = Arc::new(DataStore::new(source));
  store.load().await.with_context(|| {
    format!("failed to load data from {:?}", server_cfg.data_dir)
  })?;

  let app = axum::Router::new()
    .nest("/api", api_router(store))
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
