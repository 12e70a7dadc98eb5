use axum::extract::State;
use axum::{routing::get, Json, Router};
use firewatch_core::types::Timestamp;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether alert delivery has its credentials.
    pub alerts_configured: bool,
    /// When the device last reported, if it has.
    pub last_update: Option<Timestamp>,
}

/// GET /health -- returns service health and alerting readiness.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let alerts_configured = state.relay.notifier_ready();
    let status = if alerts_configured { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        alerts_configured,
        last_update: state.relay.last_updated().await,
    })
}

/// Mount health check routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
