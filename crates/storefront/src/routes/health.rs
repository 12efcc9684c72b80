//! Health check handlers.

use axum::{extract::State, http::StatusCode};

use crate::db;
use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the session database and the shop API are reachable.
/// Returns 503 Service Unavailable if either is down.
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if let Err(e) = db::ping(state.pool()).await {
        tracing::warn!(error = %e, "Readiness: session database unreachable");
        return (StatusCode::SERVICE_UNAVAILABLE, "database unavailable");
    }
    if let Err(e) = state.api().ping().await {
        tracing::warn!(error = %e, "Readiness: shop API unreachable");
        return (StatusCode::SERVICE_UNAVAILABLE, "api unavailable");
    }
    (StatusCode::OK, "ready")
}
