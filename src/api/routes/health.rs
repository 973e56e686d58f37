//! Health Routes
//!
//! Status endpoints for monitoring and Kubernetes probes.
//!
//! - GET / - Service banner with dependency flags
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (store configured)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{HealthResponse, RootResponse};
use crate::api::state::AppState;

/// GET /
///
/// Service banner.
pub async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "Welcome to Freewrite API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
        store_configured: state.has_store(),
        generator_configured: state.has_generator(),
    })
}

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Kubernetes readiness probe.
/// Journal routes cannot serve without a store.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.has_store() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let store = state
        .journals
        .backend_name()
        .unwrap_or("disconnected")
        .to_string();
    let generator = state
        .analysis
        .model()
        .map(|model| format!("configured ({})", model))
        .unwrap_or_else(|| "not configured".to_string());

    let status = if state.has_store() && state.has_generator() {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        store,
        generator,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
