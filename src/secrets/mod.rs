//! Startup credential retrieval.
//!
//! [`SecretSource`] is the async trait for fetching the flat credential map.
//! [`LambdaSecretSource`] implements it by invoking an AWS Lambda function whose
//! response wraps the map in a `{"body": "{\"secret\": \"{...}\"}"}` envelope.
//! [`StoreCredentials`] picks the DynamoDB access keys out of the map.

mod lambda;

pub use lambda::{build_lambda_client, LambdaSecretSource};

use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

pub const ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// Credential names mapped to their plaintext values
pub type SecretMap = HashMap<String, String>;

#[derive(Debug, Error)]
pub enum SecretsError {
    #[error("Secrets function invocation failed: {message}")]
    Invocation { message: String },

    #[error("Secrets function returned an error: {message}")]
    FunctionError { message: String },

    #[error("Secrets function returned an empty payload")]
    EmptyPayload,

    #[error("Malformed secrets payload ({stage}): {source}")]
    MalformedPayload {
        stage: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Secrets payload is missing field: {field}")]
    MissingField { field: &'static str },

    #[error("Credential missing from secrets: {name}")]
    MissingCredential { name: &'static str },
}

/// Fetches the credential map the service needs before it can serve.
#[async_trait::async_trait]
pub trait SecretSource: Send + Sync {
    async fn fetch(&self) -> Result<SecretMap, SecretsError>;
}

/// Static credentials for the client table.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl StoreCredentials {
    pub fn from_secrets(secrets: &SecretMap) -> Result<Self, SecretsError> {
        let required = |name: &'static str| {
            secrets
                .get(name)
                .filter(|value| !value.is_empty())
                .cloned()
                .ok_or(SecretsError::MissingCredential { name })
        };

        Ok(Self {
            access_key_id: required(ACCESS_KEY_ID)?,
            secret_access_key: required(SECRET_ACCESS_KEY)?,
            session_token: secrets.get(SESSION_TOKEN).cloned(),
        })
    }
}

/// Unwrap the secrets function response into a flat [`SecretMap`].
///
/// The payload is a JSON object; `errorMessage` marks a function failure.
/// `body` is normally a JSON-encoded string (an already decoded object is
/// accepted too) and `body.secret` is itself a JSON-encoded object.
pub fn parse_invocation_payload(payload: &[u8]) -> Result<SecretMap, SecretsError> {
    if payload.is_empty() {
        return Err(SecretsError::EmptyPayload);
    }

    let envelope: Value =
        serde_json::from_slice(payload).map_err(|source| SecretsError::MalformedPayload {
            stage: "payload",
            source,
        })?;

    if let Some(message) = envelope.get("errorMessage") {
        return Err(SecretsError::FunctionError {
            message: message
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| message.to_string()),
        });
    }

    let body = match envelope.get("body") {
        Some(Value::String(encoded)) => {
            serde_json::from_str(encoded).map_err(|source| SecretsError::MalformedPayload {
                stage: "body",
                source,
            })?
        }
        Some(decoded @ Value::Object(_)) => decoded.clone(),
        _ => return Err(SecretsError::MissingField { field: "body" }),
    };

    let secret = body
        .get("secret")
        .and_then(Value::as_str)
        .ok_or(SecretsError::MissingField { field: "body.secret" })?;

    serde_json::from_str(secret).map_err(|source| SecretsError::MalformedPayload {
        stage: "body.secret",
        source,
    })
}
