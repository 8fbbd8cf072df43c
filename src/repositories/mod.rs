// Repositories module - data access layer

pub mod client_repository;

pub use client_repository::{
    build_dynamodb_client, client_to_item, json_to_attribute_value, ClientRepository,
    DynamoDbClientRepository,
};
