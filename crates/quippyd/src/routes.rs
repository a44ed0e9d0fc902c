//! API routes for quippyd
//!
//! - GET  /api/system   scan and return the snapshot
//! - POST /api/analyze  analyze a problem against a given snapshot
//! - POST /api/chat     full chat turn (scan + analyze + reply)
//! - GET  /v1/health    daemon health

use crate::conversation::{run_turn, ChatTurn};
use crate::server::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use quippy_common::{AnalysisSource, SystemSnapshot, VERSION};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

type AppStateArc = Arc<AppState>;

/// Errors surfaced to HTTP clients as `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    ScanFailed,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::ScanFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                quippy_common::chat::SCAN_FAILED.to_string(),
            ),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

// ============================================================================
// System Routes
// ============================================================================

pub fn system_routes() -> Router<AppStateArc> {
    Router::new().route("/api/system", get(scan_system))
}

async fn scan_system(State(state): State<AppStateArc>) -> Result<Json<SystemSnapshot>, ApiError> {
    match state.scanner.scan().await {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(e) => {
            error!("  /api/system: {}", e);
            Err(ApiError::ScanFailed)
        }
    }
}

// ============================================================================
// Chat Routes
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub problem: String,
    pub system: SystemSnapshot,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
    pub source: AnalysisSource,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

pub fn chat_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/api/chat", post(chat))
}

async fn analyze(
    State(state): State<AppStateArc>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    if req.problem.trim().is_empty() {
        return Err(ApiError::BadRequest("problem must not be empty".to_string()));
    }
    info!("  Analyzing problem ({} chars)", req.problem.chars().count());

    let analysis = state.analyzer.analyze(&req.problem, &req.system).await;
    Ok(Json(AnalyzeResponse {
        analysis: analysis.text,
        source: analysis.source,
    }))
}

async fn chat(
    State(state): State<AppStateArc>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatTurn>, ApiError> {
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }
    info!("  Chat turn ({} chars)", req.message.chars().count());

    let turn = run_turn(&state.scanner, &state.analyzer, &req.message).await;
    Ok(Json(turn))
}

// ============================================================================
// Health Routes
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub llm_enabled: bool,
    pub llm_backend: String,
    pub scanner: String,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health))
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        llm_enabled: state.llm_enabled,
        llm_backend: state.analyzer.backend_name().to_string(),
        scanner: state.scanner_mode.as_str().to_string(),
    })
}
