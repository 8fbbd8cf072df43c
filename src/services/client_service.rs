use std::sync::Arc;
use tracing::instrument;

use crate::models::{Client, ClientEvent, ServiceResult};
use crate::repositories::ClientRepository;
use crate::services::{EventPublisher, EventPublisherError};

/// Result of the best-effort publication that follows a successful store write.
///
/// Callers inspect it for logging and metrics and then drop it; it never
/// changes the response to the client.
pub type PublishOutcome = Result<(), EventPublisherError>;

/// A stored client together with what happened to its `ClientCreated` event
#[derive(Debug)]
pub struct ClientCreated {
    pub client: Client,
    pub publish_outcome: PublishOutcome,
}

/// Service for creating client records
pub struct ClientService {
    repository: Arc<dyn ClientRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl ClientService {
    pub fn new(repository: Arc<dyn ClientRepository>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// Whether events currently reach the broker
    pub fn events_enabled(&self) -> bool {
        self.publisher.is_enabled()
    }

    /// Store the client, then announce it.
    ///
    /// A store failure is returned and nothing is published. A publish failure
    /// is logged and reported through [`ClientCreated::publish_outcome`].
    #[instrument(skip(self, client), fields(ci = %client.ci_or_placeholder()))]
    pub async fn create_client(&self, client: Client) -> ServiceResult<ClientCreated> {
        crate::info_with_trace!("Received request to create client");

        if let Err(e) = self.repository.put(&client).await {
            crate::error_with_trace!(error = %e, "Error creating client");
            return Err(e.into());
        }

        let event = ClientEvent::client_created(client.clone());
        let publish_outcome = self.publisher.publish(&event).await;

        match &publish_outcome {
            Ok(()) => crate::info_with_trace!(
                event_type = %event.event_type,
                "Client created and event published"
            ),
            Err(e) => crate::error_with_trace!(
                event_type = %event.event_type,
                error = %e,
                "Client created but event was not published"
            ),
        }

        Ok(ClientCreated {
            client,
            publish_outcome,
        })
    }
}
