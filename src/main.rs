//! FX quote service.
//!
//! ```text
//!   GET /cotacao
//!        │
//!        ▼
//!   ┌──────────┐  fetch (deadline)  ┌──────────────────┐   GET   ┌──────────────┐
//!   │  http    │───────────────────▶│ ResilientFetcher │────────▶│   upstream   │
//!   │ handler  │◀───────────────────│ retries+breaker  │◀────────│ quote source │
//!   └────┬─────┘   bid / fallback   └──────────────────┘         └──────────────┘
//!        │ save (deadline)
//!        ▼
//!   ┌──────────┐
//!   │  SQLite  │
//!   └──────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use fx_quote_service::config::{load_config, ServiceConfig};
use fx_quote_service::lifecycle::Shutdown;
use fx_quote_service::observability::{logging, metrics};
use fx_quote_service::resilience::{FetcherConfig, ResilientFetcher};
use fx_quote_service::storage::SqliteQuoteStore;
use fx_quote_service::HttpServer;

#[derive(Parser)]
#[command(name = "fx-quote-service")]
#[command(about = "Serve the current USD/BRL quote with retries and a circuit breaker", long_about = None)]
struct Cli {
    /// Path to a TOML config file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("fx-quote-service v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.url,
        max_retries = config.resilience.max_retries,
        failure_threshold = config.resilience.failure_threshold,
        cooldown_ms = config.resilience.cooldown_ms,
        fetch_ms = config.timeouts.fetch_ms,
        save_ms = config.timeouts.save_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let store = Arc::new(SqliteQuoteStore::connect(&config.storage.database_url).await?);
    let fetcher = Arc::new(ResilientFetcher::new(FetcherConfig::from(&config)));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config, fetcher, store.clone());
    server.run(listener, shutdown.subscribe()).await?;

    store.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
