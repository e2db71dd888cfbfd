// =============================================================================
// Technical Indicator Gateway — Main Entry Point
// =============================================================================
//
// Thin HTTP/WebSocket surface over three technical-analysis indicators,
// with daily OHLC history fetched per request from the market data
// provider.  No state survives a request beyond the uptime counters.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod config;
mod indicators;
mod provider;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── 2. Configuration & shared state ──────────────────────────────────
    let config = ServiceConfig::from_env();
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config));

    // ── 3. Serve ─────────────────────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    info!(addr = %bind_addr, "indicator gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("indicator gateway shut down complete");
    Ok(())
}

/// Resolve when a shutdown signal arrives.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        warn!("shutdown signal received — stopping gracefully");
    }
}
