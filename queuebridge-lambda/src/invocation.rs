//! Lambda invocation handling

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvokeError {
    /// The request never produced an invocation result
    #[error("Invocation request failed: {0}")]
    Request(String),
}

/// What the runtime reported for one synchronous invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutcome {
    pub status_code: i32,
    /// `Handled`/`Unhandled` when the function itself failed
    pub function_error: Option<String>,
    pub payload: Bytes,
}

impl InvocationOutcome {
    pub fn success(payload: impl Into<Bytes>) -> Self {
        Self {
            status_code: 200,
            function_error: None,
            payload: payload.into(),
        }
    }

    /// Only a 200 without a function error counts
    pub fn is_success(&self) -> bool {
        self.status_code == 200 && self.function_error.is_none()
    }
}

/// Synchronous invocation of a named function
#[async_trait]
pub trait Invoker: Send + Sync {
    async fn invoke(&self, function_name: &str, payload: Bytes) -> Result<InvocationOutcome, InvokeError>;
}
