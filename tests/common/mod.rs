#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use client_service::{
    create_app,
    handlers::ApiState,
    models::{Client, ClientEvent, RepositoryError, RepositoryResult},
    repositories::ClientRepository,
    services::{AmqpEventPublisher, ClientService, EventPublisher, EventPublisherError},
    Metrics,
};
use tokio::net::TcpListener;

/// Store fake that keeps every write in order
#[derive(Default)]
pub struct InMemoryClientRepository {
    writes: Mutex<Vec<Client>>,
}

impl InMemoryClientRepository {
    pub fn writes(&self) -> Vec<Client> {
        self.writes.lock().unwrap().clone()
    }

    /// Last written record for a ci, the way a keyed table would return it
    pub fn latest(&self, ci: &str) -> Option<Client> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|client| client.ci.as_ref().and_then(|value| value.as_str()) == Some(ci))
            .cloned()
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn put(&self, client: &Client) -> RepositoryResult<()> {
        self.writes.lock().unwrap().push(client.clone());
        Ok(())
    }
}

/// Store fake that always fails like a missing table
pub struct FailingClientRepository;

#[async_trait]
impl ClientRepository for FailingClientRepository {
    async fn put(&self, _client: &Client) -> RepositoryResult<()> {
        Err(RepositoryError::TableNotFound {
            table_name: "Clients_gr8".to_string(),
        })
    }
}

/// Publisher fake that records every event it is handed
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<ClientEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<ClientEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &ClientEvent) -> Result<(), EventPublisherError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

pub struct TestEnvironment {
    pub client: reqwest::Client,
    pub base_url: String,
}

impl TestEnvironment {
    pub async fn new(
        repository: Arc<dyn ClientRepository>,
        publisher: Arc<dyn EventPublisher>,
        degraded: bool,
    ) -> Self {
        let state = ApiState {
            client_service: Arc::new(ClientService::new(repository, publisher)),
            metrics: Arc::new(Metrics::new().expect("Failed to create metrics")),
            degraded,
        };
        let app = create_app(state, 102_400);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local address");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to serve app");
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Server backed by a working store and a recording broker
    pub async fn with_fakes() -> (Self, Arc<InMemoryClientRepository>, Arc<RecordingPublisher>) {
        let repository = Arc::new(InMemoryClientRepository::default());
        let publisher = Arc::new(RecordingPublisher::default());
        let env = Self::new(repository.clone(), publisher.clone(), false).await;
        (env, repository, publisher)
    }

    /// Server whose broker was unreachable at startup
    pub async fn without_broker() -> (Self, Arc<InMemoryClientRepository>) {
        let repository = Arc::new(InMemoryClientRepository::default());
        let env = Self::new(
            repository.clone(),
            Arc::new(AmqpEventPublisher::disabled("client-events")),
            true,
        )
        .await;
        (env, repository)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub fn sample_client() -> Client {
    Client {
        ci: Some("1726647066".into()),
        first_name: Some("Christopher".into()),
        last_name: Some("Pallo".into()),
        phone: Some("0995312828".into()),
        address: Some("Condado".into()),
    }
}
