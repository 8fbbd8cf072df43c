use async_trait::async_trait;
use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::{Client as DynamoDbClient, Error as DynamoDbError};
use aws_smithy_types::error::display::DisplayErrorContext;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument, Instrument};

use crate::config::AwsConfig;
use crate::models::{Client, RepositoryError, RepositoryResult};
use crate::secrets::StoreCredentials;

/// Trait defining the interface for client record persistence
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Unconditionally write a client record, replacing any item with the same key
    async fn put(&self, client: &Client) -> RepositoryResult<()>;
}

/// Build a DynamoDB client that signs with the fetched static credentials.
pub fn build_dynamodb_client(aws: &AwsConfig, credentials: &StoreCredentials) -> DynamoDbClient {
    let credentials = Credentials::new(
        credentials.access_key_id.clone(),
        credentials.secret_access_key.clone(),
        credentials.session_token.clone(),
        None,
        "secrets-function",
    );

    let mut builder = aws_sdk_dynamodb::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(aws.region.clone()))
        .credentials_provider(credentials);
    if let Some(url) = &aws.aws_endpoint_url {
        builder = builder.endpoint_url(url);
    }

    DynamoDbClient::from_conf(builder.build())
}

/// Convert a Client to DynamoDB attribute values; absent fields are omitted
pub fn client_to_item(client: &Client) -> HashMap<String, AttributeValue> {
    client
        .attributes()
        .into_iter()
        .map(|(name, value)| (name.to_string(), json_to_attribute_value(value)))
        .collect()
}

/// Map a JSON value onto the DynamoDB type of the same shape
pub fn json_to_attribute_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => {
            AttributeValue::L(items.iter().map(json_to_attribute_value).collect())
        }
        Value::Object(fields) => AttributeValue::M(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), json_to_attribute_value(value)))
                .collect(),
        ),
    }
}

/// DynamoDB implementation of the ClientRepository trait
pub struct DynamoDbClientRepository {
    client: Arc<DynamoDbClient>,
    table_name: String,
    region: String,
}

impl DynamoDbClientRepository {
    /// Create a new DynamoDB client repository
    pub fn new(client: Arc<DynamoDbClient>, table_name: String, region: String) -> Self {
        Self {
            client,
            table_name,
            region,
        }
    }

    /// Get the table name (for testing)
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Create a DynamoDB subsegment span with X-Ray attributes
    fn create_dynamodb_span(&self, operation: &str) -> tracing::Span {
        tracing::info_span!(
            "DynamoDB",
            "aws.service" = "DynamoDB",
            "aws.operation" = operation,
            "aws.region" = %self.region,
            "aws.dynamodb.table_name" = %self.table_name,
            "aws.remote.service" = "AWS::DynamoDB",
            "aws.remote.operation" = operation,
            "aws.remote.resource.type" = "AWS::DynamoDB::Table",
            "aws.remote.resource.identifier" = %self.table_name,
            "otel.kind" = "client",
            "otel.name" = format!("DynamoDB.{}", operation),
            "rpc.system" = "aws-api",
            "rpc.service" = "AmazonDynamoDBv2",
            "rpc.method" = operation,
            "db.system" = "dynamodb",
            "db.name" = %self.table_name,
            "db.operation" = operation,
        )
    }

    /// Convert DynamoDB error to RepositoryError
    fn map_dynamodb_error(&self, error: DynamoDbError) -> RepositoryError {
        error!(table = %self.table_name, "DynamoDB error: {:?}", error);

        match error {
            DynamoDbError::ResourceNotFoundException(_) => RepositoryError::TableNotFound {
                table_name: self.table_name.clone(),
            },
            DynamoDbError::ProvisionedThroughputExceededException(_)
            | DynamoDbError::RequestLimitExceeded(_) => RepositoryError::RateLimitExceeded,
            other => RepositoryError::AwsSdk {
                message: DisplayErrorContext(&other).to_string(),
            },
        }
    }
}

#[async_trait]
impl ClientRepository for DynamoDbClientRepository {
    #[instrument(skip(self, client), fields(table = %self.table_name, ci = %client.ci_or_placeholder()))]
    async fn put(&self, client: &Client) -> RepositoryResult<()> {
        info!("Saving client");

        let item = client_to_item(client);
        let put_span = self.create_dynamodb_span("PutItem");

        async {
            self.client
                .put_item()
                .table_name(&self.table_name)
                .set_item(Some(item))
                .send()
                .await
                .map_err(|e| self.map_dynamodb_error(e.into()))
        }
        .instrument(put_span)
        .await?;

        info!("Client saved successfully");
        Ok(())
    }
}
