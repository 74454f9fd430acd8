//! Local Lambda invocation for queuebridge
//!
//! Builds the SQS event a queue-triggered function receives and submits it
//! to a locally running Lambda endpoint.

pub mod client;
pub mod event;
pub mod invocation;

pub use client::{LambdaInvoker, LambdaInvokerConfig};
pub use event::{SqsEvent, SqsRecord};
pub use invocation::{InvocationOutcome, InvokeError, Invoker};
