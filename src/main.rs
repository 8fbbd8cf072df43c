use anyhow::Context;
use tracing::{debug, error, info};

use client_service::{
    init_observability, run,
    secrets::{build_lambda_client, LambdaSecretSource},
    shutdown_observability, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_environment().context("Failed to load configuration")?;

    // Logging starts here; config loading above cannot log
    init_observability(&config.observability)?;
    debug!(config = ?config, "Configuration loaded from environment");

    info!("Starting client service");
    info!(
        "Service: {} v{}",
        config.observability.service_name, config.observability.service_version
    );
    info!("Region: {}", config.aws.region);
    info!(
        "Table: {}, queue: {}",
        config.database.table_name, config.broker.queue_name
    );

    let lambda_client = build_lambda_client(&config.aws).await;
    let secrets =
        LambdaSecretSource::new(lambda_client, config.aws.secrets_function_name.clone());

    // No draining: in-flight requests are abandoned on Ctrl-C
    let result = tokio::select! {
        served = run(config, &secrets) => served.map_err(anyhow::Error::from),
        signal = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            signal.context("Failed to listen for shutdown signal")
        }
    };

    if let Err(e) = &result {
        error!(error = %e, "Client service stopped");
    }

    shutdown_observability().await;
    info!("Server shutdown complete");
    result
}
