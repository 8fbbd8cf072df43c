use serde::Deserialize;
use std::net::SocketAddr;
use thiserror::Error;

/// Environment variable prefix for every setting, e.g. `CLIENT_SERVICE_PORT`.
pub const ENV_PREFIX: &str = "CLIENT_SERVICE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid listen address: {address}")]
    InvalidAddress { address: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub aws: AwsConfig,
    pub database: DatabaseConfig,
    pub broker: BrokerConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_request_size")]
    pub max_request_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AwsConfig {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_secrets_function_name")]
    pub secrets_function_name: String,
    /// Overrides the Lambda and DynamoDB endpoints (LocalStack and friends).
    #[serde(default)]
    pub aws_endpoint_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_table_name")]
    pub table_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    #[serde(default = "default_broker_uri")]
    pub broker_uri: String,
    #[serde(default = "default_queue_name")]
    pub queue_name: String,
    #[serde(default = "default_events_enabled")]
    pub events_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_service_version")]
    pub service_version: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub enable_json_logging: bool,
}

impl Config {
    /// Load configuration from `CLIENT_SERVICE_*` environment variables.
    pub fn from_environment() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(|e| ConfigError::LoadError {
                message: format!("Failed to load environment settings: {}", e),
            })?;

        Self::from_settings(&settings)
    }

    /// Build the configuration from already collected settings.
    ///
    /// All sections read from the same flat key space; unknown keys are ignored.
    pub fn from_settings(settings: &config::Config) -> Result<Self, ConfigError> {
        let config = Config {
            server: section(settings, "server")?,
            aws: section(settings, "aws")?,
            database: section(settings, "database")?,
            broker: section(settings, "broker")?,
            observability: section(settings, "observability")?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError {
                message: "Server port cannot be 0".to_string(),
            });
        }

        let required = [
            ("Region", &self.aws.region),
            ("Secrets function name", &self.aws.secrets_function_name),
            ("Table name", &self.database.table_name),
            ("Queue name", &self.broker.queue_name),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    message: format!("{} cannot be empty", name),
                });
            }
        }

        Ok(())
    }
}

fn section<T>(settings: &config::Config, name: &str) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    settings
        .clone()
        .try_deserialize()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to deserialize {} config: {}", name, e),
        })
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .map_err(|_| ConfigError::InvalidAddress { address })
    }
}

// Default value functions
pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_port() -> u16 {
    8094
}

pub(crate) fn default_max_request_size() -> usize {
    100 * 1024
}

pub(crate) fn default_region() -> String {
    "us-east-2".to_string()
}

pub(crate) fn default_secrets_function_name() -> String {
    "fetchSecretsFunction_gr8".to_string()
}

pub(crate) fn default_table_name() -> String {
    "Clients_gr8".to_string()
}

pub(crate) fn default_broker_uri() -> String {
    "amqp://127.0.0.1:5672/%2f".to_string()
}

pub(crate) fn default_queue_name() -> String {
    "client-events".to_string()
}

pub(crate) fn default_events_enabled() -> bool {
    true
}

pub(crate) fn default_service_name() -> String {
    "client-service".to_string()
}

pub(crate) fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}
