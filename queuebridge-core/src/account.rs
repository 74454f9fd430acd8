//! Account and region scoped identifiers

use crate::{LOCAL_ACCOUNT_ID, LOCAL_REGION};

/// Key for account and region scoped identifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountRegionKey {
    pub account_id: String,
    pub region: String,
}

impl AccountRegionKey {
    pub fn new(account_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            region: region.into(),
        }
    }

    /// The offline identity every synthetic event is attributed to
    pub fn local() -> Self {
        Self::new(LOCAL_ACCOUNT_ID, LOCAL_REGION)
    }

    /// Build the ARN of a queue owned by this account/region
    pub fn queue_arn(&self, queue_name: &str) -> String {
        format!(
            "arn:aws:sqs:{}:{}:{}",
            self.region, self.account_id, queue_name
        )
    }
}

impl Default for AccountRegionKey {
    fn default() -> Self {
        Self::local()
    }
}

/// Extract the queue name from an ARN-like string: the segment after the
/// last `:`. Returns `None` when there is no separator or the segment is empty.
pub fn queue_name_from_arn(arn: &str) -> Option<&str> {
    match arn.rsplit_once(':') {
        Some((_, name)) if !name.is_empty() => Some(name),
        _ => None,
    }
}

/// Extract the queue name from a queue URL: the final `/`-delimited segment.
pub fn queue_name_from_url(url: &str) -> Option<&str> {
    match url.rsplit_once('/') {
        Some((_, name)) if !name.is_empty() => Some(name),
        _ => None,
    }
}
