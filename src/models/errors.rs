use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Service-level errors that can occur in business logic
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {source}")]
    Repository {
        #[from]
        source: RepositoryError,
    },
}

impl ServiceError {
    /// Short machine-readable code placed in error responses
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Repository { source } => source.code(),
        }
    }
}

/// Repository-level errors for data access operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("AWS SDK error: {message}")]
    AwsSdk { message: String },

    #[error("DynamoDB table not found: {table_name}. Ensure the table exists and IAM permissions are correct.")]
    TableNotFound { table_name: String },

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl RepositoryError {
    pub fn code(&self) -> &'static str {
        match self {
            RepositoryError::AwsSdk { .. } => "AwsSdkError",
            RepositoryError::TableNotFound { .. } => "ResourceNotFoundException",
            RepositoryError::RateLimitExceeded => "ProvisionedThroughputExceededException",
        }
    }
}

/// Body returned with a 500 from `POST /clients`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Error creating client")]
    pub message: String,
    pub error: ErrorDetail,
}

/// Raw detail of the underlying failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    #[schema(example = "ResourceNotFoundException")]
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, error: &ServiceError) -> Self {
        Self {
            message: message.into(),
            error: ErrorDetail {
                code: error.code().to_string(),
                message: error.to_string(),
            },
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;
