use serde::{Deserialize, Serialize};

use crate::models::Client;

/// Event types announced by the client service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ClientEventType {
    ClientCreated,
}

impl std::fmt::Display for ClientEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientEventType::ClientCreated => write!(f, "ClientCreated"),
        }
    }
}

/// Message body placed on the broker queue: `{"eventType": ..., "data": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientEvent {
    pub event_type: ClientEventType,
    pub data: Client,
}

impl ClientEvent {
    /// Create a new ClientCreated event
    pub fn client_created(client: Client) -> Self {
        Self {
            event_type: ClientEventType::ClientCreated,
            data: client,
        }
    }
}
