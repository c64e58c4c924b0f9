// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Membership Intake Service
//!
//! HTTP front for the application intake pipeline:
//!
//! - `POST /apply` — process a submission forwarded by the form handler
//! - `GET /health`, `GET /healthz` — liveness
//! - `GET /metrics` — Prometheus counters (when enabled)
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `MAX_PER_WINDOW`: Max submissions per identity per window (default: 3)
//! - `WINDOW_SECS`: Quota window length in seconds (default: 3600)

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use membership_intake::{
    config::Config,
    handlers::{apply, health, metrics, AppState},
    intake::{IntakeService, LogRecorder},
    limiter::FixedWindowLimiter,
    metrics::IntakeMetrics,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        max_per_window = config.rate_limit.max_per_window,
        window_secs = config.rate_limit.window_secs,
        "Starting membership intake service"
    );

    // Create application state
    let intake_metrics = Arc::new(IntakeMetrics::new()?);
    let limiter = Arc::new(FixedWindowLimiter::new(config.rate_limit.clone()));
    let intake = IntakeService::new(limiter.clone(), Box::new(LogRecorder), intake_metrics.clone());

    let state = Arc::new(AppState {
        intake,
        metrics: intake_metrics,
    });

    // Periodically evict lapsed quota windows so the ledger stays bounded
    let cleanup_window = config.rate_limit.window_duration();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_window);
        loop {
            interval.tick().await;
            limiter.cleanup().await;
        }
    });

    // Build router
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/apply", post(apply));
    if config.metrics.enabled {
        app = app.route(&config.metrics.path, get(metrics));
    }
    let app = app.layer(TraceLayer::new_for_http()).with_state(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    Config {
        bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        rate_limit: membership_intake::config::RateLimitConfig {
            max_per_window: std::env::var("MAX_PER_WINDOW")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            window_secs: std::env::var("WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
        },
        ..Default::default()
    }
}
