//! SQS SendMessage gateway for queuebridge
//!
//! Accepts form-encoded `SendMessage` calls and hands each message to the
//! function bound to its queue:
//! - [`handlers`]: HTTP surface and request validation
//! - [`dispatch`]: message -> invocation bridge
//! - [`context`]: read-only state shared by every request

pub mod context;
pub mod dispatch;
pub mod handlers;

pub use context::BridgeContext;
pub use dispatch::{dispatch, try_dispatch, DispatchError};
pub use handlers::{handle_request, health, SendMessageRequest};
