//! SQS event delivered to queue-triggered functions

use std::collections::HashMap;

use queuebridge_core::AccountRegionKey;
use serde::Serialize;
use uuid::Uuid;

const EVENT_SOURCE: &str = "aws:sqs";

/// Batch of queue records, as Lambda receives it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SqsEvent {
    pub records: Vec<SqsRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SqsRecord {
    pub message_id: String,
    pub receipt_handle: String,
    pub body: String,
    pub attributes: HashMap<String, String>,
    pub message_attributes: HashMap<String, String>,
    pub md5_of_body: String,
    pub event_source: String,
    #[serde(rename = "eventSourceARN")]
    pub event_source_arn: String,
    pub aws_region: String,
}

impl SqsEvent {
    /// Single-record batch for a message accepted on `queue_name`.
    ///
    /// Identifiers and provenance are fixed offline sentinels: the nil
    /// message id, empty receipt handle and digest, and the local
    /// account/region.
    pub fn single(queue_name: &str, body: impl Into<String>) -> Self {
        let identity = AccountRegionKey::local();

        Self {
            records: vec![SqsRecord {
                message_id: Uuid::nil().to_string(),
                receipt_handle: String::new(),
                body: body.into(),
                attributes: HashMap::new(),
                message_attributes: HashMap::new(),
                md5_of_body: String::new(),
                event_source: EVENT_SOURCE.to_string(),
                event_source_arn: identity.queue_arn(queue_name),
                aws_region: identity.region,
            }],
        }
    }

    pub fn to_vec(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
