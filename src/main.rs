//! upwatch: service health monitoring daemon.
//!
//! # Architecture Overview
//!
//! ```text
//! config file (TOML)
//!     → config loader (parse, validate)
//!     → Monitor (one background polling task)
//!         → probe each service per tick, sequentially
//!         → state machine: up/down with consecutive-count thresholds
//!         → metrics registry (gauges, counter, latency summary)
//!         → notifier (email, fired only on state transitions)
//!     → HTTP server: GET /metrics renders the registry snapshot
//! ```
//!
//! Startup is fail-fast: an unreadable or invalid configuration aborts the
//! process before anything begins serving.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use upwatch::config::{self, MonitorConfig};
use upwatch::http::HttpServer;
use upwatch::monitor::Monitor;
use upwatch::notify::{EmailNotifier, Notifier};
use upwatch::observability::{logging, MetricsRegistry};

#[derive(Debug, Parser)]
#[command(name = "upwatch", version, about = "Service health monitoring daemon")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "monitor.toml")]
    config: PathBuf,

    /// Address for the metrics endpoint.
    #[arg(long, default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging("upwatch=debug,tower_http=debug");

    let cli = Cli::parse();
    tracing::info!("upwatch v0.1.0 starting");

    let config: MonitorConfig = config::load_config(&cli.config)?;
    tracing::info!(
        services = config.services.len(),
        interval_secs = config.interval_seconds,
        alerting = config.email.is_some(),
        "Configuration loaded"
    );

    let registry = Arc::new(MetricsRegistry::new());
    let notifier: Option<Arc<dyn Notifier>> = config
        .email
        .clone()
        .map(|email| Arc::new(EmailNotifier::new(email)) as Arc<dyn Notifier>);

    let monitor = Arc::new(Monitor::new(
        config.services.clone(),
        config.interval(),
        registry,
        notifier,
    ));
    monitor.start();

    let listener = TcpListener::bind(&cli.listen).await?;
    let server = HttpServer::new(Arc::clone(&monitor));
    server.run(listener, shutdown_signal()).await?;

    monitor.stop();

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
