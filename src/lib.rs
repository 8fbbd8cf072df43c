pub mod app;
pub mod bootstrap;
pub mod config;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod secrets;
pub mod services;

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub use app::create_app;
pub use bootstrap::{initialize, BootstrapError, ServiceContext};
pub use self::config::{Config, ConfigError};
pub use observability::{init_observability, shutdown_observability, Metrics};

/// Start the service: bootstrap, bind, then serve until the task is dropped.
///
/// The listener is only bound after secrets have been loaded.
pub async fn run(config: Config, secrets: &dyn secrets::SecretSource) -> Result<(), BootstrapError> {
    let context = initialize(&config, secrets).await?;

    let metrics = Arc::new(Metrics::new()?);
    let state = handlers::ApiState {
        client_service: context.client_service,
        metrics,
        degraded: context.degraded,
    };
    let app = create_app(state, config.server.max_request_size);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| BootstrapError::Bind { addr, source })?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(BootstrapError::Serve)
}
