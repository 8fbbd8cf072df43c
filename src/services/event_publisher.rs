use async_trait::async_trait;
use chrono::Utc;
use lapin::{
    options::{BasicPublishOptions, QueueDeclareOptions},
    publisher_confirm::Confirmation,
    types::FieldTable,
    BasicProperties, Channel, Connection, ConnectionProperties,
};
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::BrokerConfig;
use crate::models::ClientEvent;
use crate::observability::get_current_trace_id;

/// AMQP delivery mode that asks the broker to write the message to disk
const PERSISTENT_DELIVERY_MODE: u8 = 2;

/// Errors that can occur while connecting to the broker or publishing
#[derive(Error, Debug)]
pub enum EventPublisherError {
    #[error("Broker error: {0}")]
    Broker(#[from] lapin::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Event publishing disabled: broker channel is not initialized")]
    Disabled,
    #[error("Broker rejected the message")]
    Rejected,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EventPublisherError {
    /// Label used for the `client_events_total` status dimension
    pub fn status_label(&self) -> &'static str {
        match self {
            EventPublisherError::Disabled => "disabled",
            _ => "error",
        }
    }
}

/// Announces client domain events to other consumers.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Hand one event to the broker
    async fn publish(&self, event: &ClientEvent) -> Result<(), EventPublisherError>;

    /// Whether a broker channel is available
    fn is_enabled(&self) -> bool;
}

struct BrokerLink {
    // Held so the connection lives as long as the channel
    _connection: Connection,
    channel: Channel,
}

/// RabbitMQ publisher writing persistent messages to a single durable queue
pub struct AmqpEventPublisher {
    link: Option<BrokerLink>,
    queue_name: String,
}

impl AmqpEventPublisher {
    /// Connect, open a channel and declare the durable queue
    #[instrument(name = "connect_broker", skip(config), fields(queue = %config.queue_name))]
    pub async fn connect(config: &BrokerConfig) -> Result<Self, EventPublisherError> {
        if config.queue_name.is_empty() {
            return Err(EventPublisherError::InvalidConfig(
                "Queue name cannot be empty".to_string(),
            ));
        }

        let connection =
            Connection::connect(&config.broker_uri, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;

        channel
            .queue_declare(
                &config.queue_name,
                QueueDeclareOptions {
                    durable: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await?;

        info!("Connected to message broker");

        Ok(Self {
            link: Some(BrokerLink {
                _connection: connection,
                channel,
            }),
            queue_name: config.queue_name.clone(),
        })
    }

    /// A publisher with no channel; every publish is skipped
    pub fn disabled(queue_name: impl Into<String>) -> Self {
        Self {
            link: None,
            queue_name: queue_name.into(),
        }
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    fn message_properties() -> BasicProperties {
        let properties = BasicProperties::default()
            .with_content_type("application/json".into())
            .with_delivery_mode(PERSISTENT_DELIVERY_MODE)
            .with_message_id(Uuid::new_v4().to_string().into())
            .with_timestamp(Utc::now().timestamp().max(0) as u64);

        match get_current_trace_id() {
            Some(trace_id) => properties.with_correlation_id(trace_id.into()),
            None => properties,
        }
    }
}

#[async_trait]
impl EventPublisher for AmqpEventPublisher {
    #[instrument(skip(self, event), fields(event_type = %event.event_type, queue = %self.queue_name))]
    async fn publish(&self, event: &ClientEvent) -> Result<(), EventPublisherError> {
        let Some(link) = &self.link else {
            error!("Channel is not initialized, event not published");
            return Err(EventPublisherError::Disabled);
        };

        let payload = serde_json::to_vec(event)?;

        let confirmation = link
            .channel
            .basic_publish(
                "",
                &self.queue_name,
                BasicPublishOptions::default(),
                &payload,
                Self::message_properties(),
            )
            .await?
            .await?;

        if let Confirmation::Nack(_) = confirmation {
            warn!("Broker negatively acknowledged the event");
            return Err(EventPublisherError::Rejected);
        }

        info!(ci = %event.data.ci_or_placeholder(), "Event published to broker");
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.link
            .as_ref()
            .map(|link| link.channel.status().connected())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Client;

    fn broker_config(uri: &str, queue: &str) -> BrokerConfig {
        BrokerConfig {
            broker_uri: uri.to_string(),
            queue_name: queue.to_string(),
            events_enabled: true,
        }
    }

    #[tokio::test]
    async fn test_disabled_publisher_skips_event() {
        let publisher = AmqpEventPublisher::disabled("client-events");
        let event = ClientEvent::client_created(Client {
            ci: Some("1726647066".into()),
            ..Default::default()
        });

        let result = publisher.publish(&event).await;

        assert!(matches!(result, Err(EventPublisherError::Disabled)));
        assert!(!publisher.is_enabled());
        assert_eq!(publisher.queue_name(), "client-events");
    }

    #[tokio::test]
    async fn test_connect_rejects_empty_queue() {
        let result = AmqpEventPublisher::connect(&broker_config("amqp://127.0.0.1:1/%2f", "")).await;

        assert!(matches!(result, Err(EventPublisherError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_connect_failure_is_reported() {
        let result =
            AmqpEventPublisher::connect(&broker_config("amqp://127.0.0.1:1/%2f", "client-events"))
                .await;

        assert!(matches!(result, Err(EventPublisherError::Broker(_))));
    }

    #[test]
    fn test_message_properties_are_persistent_json() {
        let properties = AmqpEventPublisher::message_properties();

        assert_eq!(*properties.delivery_mode(), Some(PERSISTENT_DELIVERY_MODE));
        assert_eq!(
            properties.content_type().as_ref().map(|c| c.as_str()),
            Some("application/json")
        );
        assert!(properties.message_id().is_some());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(EventPublisherError::Disabled.status_label(), "disabled");
        assert_eq!(EventPublisherError::Rejected.status_label(), "error");
    }
}
