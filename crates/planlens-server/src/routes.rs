//! HTTP routes
//!
//! - `GET /`             - plan viewer page
//! - `POST /api/analyze` - plan JSON in, advice + rendered tree out
//! - `GET /api/health`   - liveness check

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::response::{Html, Json};
use axum::routing::{get, post};
use planlens_analyzer::{PlanAnalysis, PlanLimits, analyze, parse_payload_bytes_with_limits};
use serde::{Deserialize, Serialize};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::ApiError;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Application state shared across handlers
#[derive(Debug)]
pub struct AppState {
    pub limits: PlanLimits,
}

/// Health check payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Builds the router for the given configuration
pub fn router(config: &ServerConfig) -> Router {
    let state = Arc::new(AppState {
        limits: config.limits,
    });

    Router::new()
        .route("/", get(index))
        .route("/api/analyze", post(analyze_plan))
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / - Plan viewer page
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST /api/analyze - Returns advice and the rendered plan tree
async fn analyze_plan(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PlanAnalysis>, ApiError> {
    let payload = parse_payload_bytes_with_limits(&body, state.limits)?;
    let analysis = analyze(&payload, state.limits);

    tracing::info!(
        body_bytes = body.len(),
        node_count = analysis.stats.node_count,
        advice_count = analysis.advice.len(),
        truncated = analysis.stats.truncated,
        "Analyzed plan"
    );

    Ok(Json(analysis))
}

/// GET /api/health - Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
