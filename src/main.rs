//! Asset proxy binary.
//!
//! Reads `ASSETS_API_HOST` and `RESIZER_API_HOST` (optionally on top of a
//! TOML file passed with `--config`) and serves `/assets/*` until a
//! termination signal arrives.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use asset_proxy::config::{load_config, ObservabilityConfig};
use asset_proxy::lifecycle::{Shutdown, ShutdownSignals};
use asset_proxy::observability::{logging, metrics};
use asset_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "asset-proxy")]
#[command(about = "Proxy for the asset store and image resizer", long_about = None)]
struct Cli {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    logging::init(&config.observability);
    tracing::info!("asset-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        assets_api_host = %config.upstreams.assets_api_host,
        resizer_api_host = %config.upstreams.resizer_api_host,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let mut signals = ShutdownSignals::install()?;
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let name = signals.recv().await;
        tracing::info!(signal = name, "Shutdown signal received");
        shutdown.trigger();
    });

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
