use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;
use tracing::error;

use crate::observability::Metrics;

/// Prometheus text exposition of the service registry
pub async fn metrics_handler(State(metrics): State<Arc<Metrics>>) -> Response {
    let body = match metrics.encode() {
        Ok(body) => body,
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    let mut response = body.into_response();
    if let Ok(content_type) = HeaderValue::from_str(TextEncoder::new().format_type()) {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_exposes_client_series() {
        let metrics = Arc::new(Metrics::new().unwrap());
        metrics.record_client_operation("create", false);
        metrics.record_client_event("ClientCreated", "disabled");

        let response = metrics_handler(State(metrics)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            TextEncoder::new().format_type()
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("client_operations_total{operation=\"create\",status=\"error\"} 1"));
        assert!(text.contains("client_events_total{event_type=\"ClientCreated\",status=\"disabled\"} 1"));
    }
}
