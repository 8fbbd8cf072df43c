use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::instrument;

use crate::models::{Client, ClientEventType, ErrorResponse};
use crate::observability::Metrics;
use crate::services::{ClientCreated, ClientService};

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct ApiState {
    pub client_service: Arc<ClientService>,
    pub metrics: Arc<Metrics>,
    /// Set when startup could not reach the broker
    pub degraded: bool,
}

impl FromRef<ApiState> for Arc<Metrics> {
    fn from_ref(state: &ApiState) -> Self {
        state.metrics.clone()
    }
}

/// Create a client record and announce it
#[utoipa::path(
    post,
    path = "/clients",
    tag = "clients",
    request_body = Client,
    responses(
        (status = 201, description = "Client created", body = Client),
        (status = 500, description = "Error creating client", body = ErrorResponse)
    )
)]
#[instrument(name = "create_client", skip(state, client), fields(ci = %client.ci_or_placeholder()))]
pub async fn create_client(
    State(state): State<ApiState>,
    Json(client): Json<Client>,
) -> Result<(StatusCode, Json<Client>), (StatusCode, Json<ErrorResponse>)> {
    match state.client_service.create_client(client).await {
        Ok(ClientCreated {
            client,
            publish_outcome,
        }) => {
            state.metrics.record_client_operation("create", true);

            let event_type = ClientEventType::ClientCreated.to_string();
            match &publish_outcome {
                Ok(()) => state.metrics.record_client_event(&event_type, "success"),
                Err(e) => state
                    .metrics
                    .record_client_event(&event_type, e.status_label()),
            }
            // Publishing is best-effort and never changes the response
            drop(publish_outcome);

            Ok((StatusCode::CREATED, Json(client)))
        }
        Err(err) => {
            state.metrics.record_client_operation("create", false);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Error creating client", &err)),
            ))
        }
    }
}
