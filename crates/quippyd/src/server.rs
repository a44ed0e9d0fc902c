//! HTTP server for quippyd

use crate::routes;
use crate::scanner::Scanner;
use anyhow::{Context, Result};
use axum::Router;
use quippy_common::{Analyzer, ScannerMode};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub scanner: Scanner,
    pub analyzer: Analyzer,
    pub scanner_mode: ScannerMode,
    pub llm_enabled: bool,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        scanner: Scanner,
        analyzer: Analyzer,
        scanner_mode: ScannerMode,
        llm_enabled: bool,
    ) -> Self {
        Self {
            scanner,
            analyzer,
            scanner_mode,
            llm_enabled,
            start_time: Instant::now(),
        }
    }
}

/// Build the router with all routes and layers
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::system_routes())
        .merge(routes::chat_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until Ctrl-C
pub async fn run(state: AppState, addr: &str) -> Result<()> {
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("  Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Shutting down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
