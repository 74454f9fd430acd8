//! Message -> invocation bridge

use bytes::Bytes;
use thiserror::Error;
use tracing::{error, info, warn};

use queuebridge_core::queue_name_from_url;
use queuebridge_lambda::{InvokeError, SqsEvent};
use queuebridge_resolver::LookupError;

use crate::context::BridgeContext;
use crate::handlers::SendMessageRequest;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("QueueUrl is required")]
    MissingQueueUrl,

    #[error("MessageBody is required")]
    MissingMessageBody,

    #[error("Cannot derive a queue name from {0}")]
    InvalidQueueUrl(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invocation of {handler} failed: {source}")]
    Invocation {
        handler: String,
        #[source]
        source: InvokeError,
    },

    #[error("Invocation of {handler} returned status {status_code} (function error: {function_error:?}): {payload}")]
    Rejected {
        handler: String,
        status_code: i32,
        function_error: Option<String>,
        payload: String,
    },
}

impl DispatchError {
    /// Malformed requests, as opposed to routing or runtime failures
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingQueueUrl | Self::MissingMessageBody | Self::InvalidQueueUrl(_)
        )
    }
}

/// Deliver one message to its queue's handler. Returns `true` only when the
/// invocation succeeded; every failure is logged here.
pub async fn dispatch(context: &BridgeContext, request: &SendMessageRequest) -> bool {
    match try_dispatch(context, request).await {
        Ok(handler) => {
            info!(handler = %handler, "Message delivered");
            true
        }
        Err(e) if e.is_client_error() => {
            warn!(error = %e, "Rejected message");
            false
        }
        Err(e) => {
            error!(error = %e, "Dispatch failed");
            false
        }
    }
}

/// Deliver one message, returning the handler it was delivered to
pub async fn try_dispatch(
    context: &BridgeContext,
    request: &SendMessageRequest,
) -> Result<String, DispatchError> {
    let queue_url = request
        .queue_url
        .as_deref()
        .ok_or(DispatchError::MissingQueueUrl)?;
    let body = request
        .message_body
        .as_deref()
        .ok_or(DispatchError::MissingMessageBody)?;

    let queue_name = queue_name_from_url(queue_url)
        .ok_or_else(|| DispatchError::InvalidQueueUrl(queue_url.to_string()))?;
    let handler = context.handlers().lookup(queue_name)?;

    let payload = SqsEvent::single(queue_name, body).to_vec()?;

    info!(queue = %queue_name, handler = %handler, "Dispatching message");

    let outcome = context
        .invoker()
        .invoke(handler, Bytes::from(payload))
        .await
        .map_err(|source| DispatchError::Invocation {
            handler: handler.to_string(),
            source,
        })?;

    if !outcome.is_success() {
        return Err(DispatchError::Rejected {
            handler: handler.to_string(),
            status_code: outcome.status_code,
            function_error: outcome.function_error,
            payload: String::from_utf8_lossy(&outcome.payload).into_owned(),
        });
    }

    Ok(handler.to_string())
}
