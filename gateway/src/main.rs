// gateway/src/main.rs

//! IOTA IRI exporter binary.
//!
//! This binary serves a small HTTP front door on top of the `iri-exporter`
//! crate:
//!
//! - `GET /` (landing page)
//! - `GET <telemetry path>` (Prometheus text format, default `/metrics`)
//!
//! Each metrics request scrapes the IRI node's HTTP API once and samples the
//! counters kept by the background ZeroMQ feed listener.

mod config;
mod routes;
mod state;

use std::sync::Arc;

use clap::Parser;
use tokio::signal;

use config::Cli;
use iri_exporter::{HttpNodeClient, IriExporter, MetricsRegistry, ZmqFeed};
use state::{AppState, SharedState};

#[tokio::main]
async fn main() {
    // Basic tracing setup.
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "iri_gateway=info,iri_exporter=info".to_string()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let cfg = cli.into_config()?;

    // Bind first: without a socket there is nothing to serve.
    let listener = tokio::net::TcpListener::bind(cfg.metrics.listen_addr)
        .await
        .map_err(|e| format!("failed to bind {}: {e}", cfg.metrics.listen_addr))?;

    // ---------------------------
    // Upstreams
    // ---------------------------

    // The blocking client spins up its own runtime and must not be built on
    // an async worker thread.
    let node_cfg = cfg.node.clone();
    let client = tokio::task::spawn_blocking(move || {
        HttpNodeClient::new(node_cfg.base_url, node_cfg.timeout)
    })
    .await
    .map_err(|e| format!("failed to spawn HTTP client setup: {e}"))?
    .map_err(|e| format!("failed to create HttpNodeClient: {e}"))?;

    let (feed, _feed_task) = ZmqFeed::spawn(cfg.feed.clone());
    tracing::info!(endpoint = %cfg.feed.endpoint, "zmq feed listener started");

    // ---------------------------
    // Metrics
    // ---------------------------

    let exporter = IriExporter::new(Arc::new(client), Arc::new(feed), cfg.stale_peers)
        .map_err(|e| format!("failed to initialise exporter metrics: {e}"))?;
    let metrics = Arc::new(
        MetricsRegistry::new(exporter)
            .map_err(|e| format!("failed to initialise metrics registry: {e}"))?,
    );

    let app_state: SharedState = Arc::new(AppState {
        metrics,
        landing_page: routes::landing::render(&cfg.metrics.path),
    });

    // ---------------------------
    // HTTP router
    // ---------------------------

    let app = routes::router(app_state, &cfg.metrics.path);

    tracing::info!(
        listen = %cfg.metrics.listen_addr,
        path = %cfg.metrics.path,
        node = %cfg.node.base_url,
        stale_peers = ?cfg.stale_peers,
        "starting iota-iri exporter"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("HTTP server error: {e}"))?;

    Ok(())
}

/// Waits for Ctrl-C and returns, used for graceful shutdown.
async fn shutdown_signal() {
    wait_for_shutdown(signal::ctrl_c()).await;
}

/// Resolves once `signal` fires. If the handler cannot be installed this
/// never resolves, so the server keeps running instead of exiting at once.
async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
