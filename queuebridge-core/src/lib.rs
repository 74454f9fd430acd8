//! Core types for queuebridge
//!
//! This crate provides the local account/region identity, queue ARN and URL
//! helpers, and request ids shared by the other queuebridge crates.

pub mod account;
pub mod request_id;

pub use account::{queue_name_from_arn, queue_name_from_url, AccountRegionKey};
pub use request_id::RequestId;

/// Account id used for every synthetic ARN
pub const LOCAL_ACCOUNT_ID: &str = "000000000000";

/// Region tag used for every synthetic ARN and for the Lambda client
pub const LOCAL_REGION: &str = "localhost";
