// Services module - business logic layer

pub mod client_service;
pub mod event_publisher;

pub use client_service::{ClientCreated, ClientService, PublishOutcome};
pub use event_publisher::{AmqpEventPublisher, EventPublisher, EventPublisherError};
