use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use tracing::instrument;

use super::ApiState;

/// Plain-text liveness banner
#[instrument(name = "root")]
pub async fn root() -> &'static str {
    "Client Service Running"
}

/// Health check endpoint handler
#[instrument(name = "health_check", skip(state))]
pub async fn health_check(State(state): State<ApiState>) -> Json<Value> {
    let broker = if state.client_service.events_enabled() {
        "connected"
    } else if state.degraded {
        "unavailable"
    } else {
        "disabled"
    };

    let status = if state.degraded { "degraded" } else { "healthy" };

    Json(json!({
        "status": status,
        "service": "client-service",
        "version": env!("CARGO_PKG_VERSION"),
        "broker": broker,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
