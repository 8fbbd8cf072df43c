use aws_config::BehaviorVersion;
use aws_sdk_lambda::Client as LambdaClient;
use aws_smithy_types::error::display::DisplayErrorContext;
use tracing::{error, info, instrument};

use super::{parse_invocation_payload, SecretMap, SecretSource, SecretsError};
use crate::config::AwsConfig;

/// Resolves secrets by invoking an AWS Lambda function with an empty payload.
pub struct LambdaSecretSource {
    client: LambdaClient,
    function_name: String,
}

impl LambdaSecretSource {
    pub fn new(client: LambdaClient, function_name: impl Into<String>) -> Self {
        Self {
            client,
            function_name: function_name.into(),
        }
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }
}

/// Build a Lambda client from the ambient AWS credential chain.
///
/// Only the secrets call uses ambient credentials; the table is reached with
/// whatever the function returns.
pub async fn build_lambda_client(aws: &AwsConfig) -> LambdaClient {
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(aws_config::Region::new(aws.region.clone()))
        .load()
        .await;

    let mut builder = aws_sdk_lambda::config::Builder::from(&sdk_config);
    if let Some(url) = &aws.aws_endpoint_url {
        builder = builder.endpoint_url(url);
    }
    LambdaClient::from_conf(builder.build())
}

#[async_trait::async_trait]
impl SecretSource for LambdaSecretSource {
    #[instrument(name = "fetch_secrets", skip(self), fields(function_name = %self.function_name))]
    async fn fetch(&self) -> Result<SecretMap, SecretsError> {
        info!("Invoking secrets function");

        let output = self
            .client
            .invoke()
            .function_name(&self.function_name)
            .send()
            .await
            .map_err(|e| {
                error!(error = %DisplayErrorContext(&e), "Error invoking secrets function");
                SecretsError::Invocation {
                    message: DisplayErrorContext(&e).to_string(),
                }
            })?;

        let payload = output
            .payload()
            .map(|blob| blob.as_ref())
            .unwrap_or_default();

        // Unhandled function errors carry an `errorMessage` payload; fall back
        // to the marker itself when the payload says nothing useful.
        if let Some(function_error) = output.function_error() {
            let err = match parse_invocation_payload(payload) {
                Err(err @ SecretsError::FunctionError { .. }) => err,
                _ => SecretsError::FunctionError {
                    message: function_error.to_string(),
                },
            };
            error!(error = %err, "Secrets function failed");
            return Err(err);
        }

        let secrets = parse_invocation_payload(payload).map_err(|e| {
            error!(error = %e, "Unable to read secrets payload");
            e
        })?;

        info!(count = secrets.len(), "Secrets retrieved");
        Ok(secrets)
    }
}
