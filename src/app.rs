use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::handlers::{self, ApiState};
use crate::observability::observability_middleware;

/// Build the application router
pub fn create_app(state: ApiState, max_request_size: usize) -> Router {
    let metrics_for_middleware = state.metrics.clone();

    Router::new()
        .route("/", get(handlers::root))
        .route("/clients", post(handlers::create_client))
        .route("/api-docs", get(handlers::swagger_ui))
        .route("/api-docs/openapi.json", get(handlers::openapi_json))
        .route("/health/status", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(state)
        // Layers apply outer to inner from the bottom up
        .layer(DefaultBodyLimit::max(max_request_size))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(move |req, next| {
            observability_middleware(metrics_for_middleware.clone(), req, next)
        }))
}
