//! Lambda client for the local invocation endpoint

use async_trait::async_trait;
use aws_config::{retry::RetryConfig, BehaviorVersion, Region};
use aws_sdk_lambda::{
    config::Credentials, error::DisplayErrorContext, primitives::Blob, types::InvocationType,
    Client,
};
use bytes::Bytes;
use tracing::debug;

use queuebridge_core::LOCAL_REGION;

use crate::invocation::{InvocationOutcome, InvokeError, Invoker};

/// Default local Lambda endpoint
pub const DEFAULT_LAMBDA_ENDPOINT: &str = "http://localhost:3002";

/// Connection settings for the local Lambda endpoint
#[derive(Debug, Clone)]
pub struct LambdaInvokerConfig {
    pub endpoint: String,
    pub region: String,
    /// Placeholder credentials; the local endpoint does not check them
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl Default for LambdaInvokerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_LAMBDA_ENDPOINT.to_string(),
            region: LOCAL_REGION.to_string(),
            access_key_id: "local".to_string(),
            secret_access_key: "local".to_string(),
        }
    }
}

/// [`Invoker`] backed by the AWS SDK, one `RequestResponse` call per message
pub struct LambdaInvoker {
    client: Client,
    endpoint: String,
}

impl LambdaInvoker {
    pub async fn new(config: LambdaInvokerConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint)
            .region(Region::new(config.region))
            .credentials_provider(Credentials::new(
                config.access_key_id,
                config.secret_access_key,
                None,
                None,
                "queuebridge",
            ))
            // A failed invocation is reported once and dropped
            .retry_config(RetryConfig::disabled())
            .load()
            .await;

        Self {
            client: Client::new(&sdk_config),
            endpoint: config.endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Invoker for LambdaInvoker {
    async fn invoke(&self, function_name: &str, payload: Bytes) -> Result<InvocationOutcome, InvokeError> {
        debug!(
            function_name = %function_name,
            endpoint = %self.endpoint,
            payload_size = payload.len(),
            "Invoke"
        );

        let output = self
            .client
            .invoke()
            .function_name(function_name)
            .invocation_type(InvocationType::RequestResponse)
            .payload(Blob::new(payload.to_vec()))
            .send()
            .await
            .map_err(|e| InvokeError::Request(DisplayErrorContext(&e).to_string()))?;

        Ok(InvocationOutcome {
            status_code: output.status_code(),
            function_error: output.function_error().map(str::to_string),
            payload: output
                .payload()
                .map(|blob| Bytes::copy_from_slice(blob.as_ref()))
                .unwrap_or_default(),
        })
    }
}
