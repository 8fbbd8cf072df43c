use std::{io, net::SocketAddr, sync::Arc};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::config::{Config, ConfigError};
use crate::observability::MetricsError;
use crate::repositories::{build_dynamodb_client, DynamoDbClientRepository};
use crate::secrets::{SecretSource, SecretsError, StoreCredentials};
use crate::services::{AmqpEventPublisher, ClientService, EventPublisher};

/// Fatal startup and serving failures
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Secrets unavailable: {0}")]
    SecretsUnavailable(#[from] SecretsError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to initialize metrics: {0}")]
    Metrics(#[from] MetricsError),

    #[error("Failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },

    #[error("Server error: {0}")]
    Serve(io::Error),
}

/// Everything the router needs once startup has finished
pub struct ServiceContext {
    pub client_service: Arc<ClientService>,
    /// The broker could not be reached; events are skipped for the process lifetime
    pub degraded: bool,
}

/// Run the ordered startup pipeline.
///
/// Secrets are fetched first and any failure there is fatal. The store client
/// is built from the fetched credentials. The broker connection comes last and
/// a failure only marks the context as degraded.
#[instrument(name = "bootstrap", skip(config, secrets))]
pub async fn initialize(
    config: &Config,
    secrets: &dyn SecretSource,
) -> Result<ServiceContext, BootstrapError> {
    info!(
        function = %config.aws.secrets_function_name,
        "Fetching secrets"
    );
    let secret_map = secrets.fetch().await.map_err(|e| {
        error!(error = %e, "Failed to fetch secrets");
        e
    })?;
    let credentials = StoreCredentials::from_secrets(&secret_map).map_err(|e| {
        error!(error = %e, "Fetched secrets are incomplete");
        e
    })?;
    info!("Secrets loaded");

    let dynamodb_client = Arc::new(build_dynamodb_client(&config.aws, &credentials));
    let repository = Arc::new(DynamoDbClientRepository::new(
        dynamodb_client,
        config.database.table_name.clone(),
        config.aws.region.clone(),
    ));
    info!(table = %config.database.table_name, "Store client initialized");

    let (publisher, degraded): (Arc<dyn EventPublisher>, bool) = if config.broker.events_enabled {
        match AmqpEventPublisher::connect(&config.broker).await {
            Ok(publisher) => (Arc::new(publisher), false),
            Err(e) => {
                warn!(
                    error = %e,
                    "Failed to connect to message broker, continuing without events"
                );
                (
                    Arc::new(AmqpEventPublisher::disabled(&config.broker.queue_name)),
                    true,
                )
            }
        }
    } else {
        info!("Event publishing disabled");
        (
            Arc::new(AmqpEventPublisher::disabled(&config.broker.queue_name)),
            false,
        )
    };

    Ok(ServiceContext {
        client_service: Arc::new(ClientService::new(repository, publisher)),
        degraded,
    })
}
