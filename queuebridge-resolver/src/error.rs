//! Resolution, loading and lookup errors

use std::path::PathBuf;
use thiserror::Error;

/// A malformed or ambiguous declaration. Never fatal: the declaration is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Queue resource {resource} has no QueueName property")]
    MissingQueueName { resource: String },

    #[error("Queue {queue} declared by {resource} is already declared by {existing}")]
    DuplicateQueue {
        queue: String,
        resource: String,
        existing: String,
    },

    #[error("Function {function} references malformed queue ARN: {arn}")]
    MalformedArn { function: String, arn: String },

    #[error("Function {function} references missing resource {resource}")]
    MissingResource { function: String, resource: String },

    #[error("Function {function} references resource {resource} which has no QueueName property")]
    ResourceWithoutQueueName { function: String, resource: String },

    #[error("Function {function} references unsupported attribute {resource}.{attribute}")]
    UnsupportedAttribute {
        function: String,
        resource: String,
        attribute: String,
    },

    #[error("Function {function} has unrecognized queue reference: {raw}")]
    UnrecognizedReference { function: String, raw: String },

    #[error("Unknown queue {queue} for function {function}")]
    UnknownQueue { function: String, queue: String },

    #[error("Queue {queue} already handled by {existing}, ignoring {function}")]
    HandlerConflict {
        queue: String,
        existing: String,
        function: String,
    },
}

impl ConfigError {
    /// Conflicts and dangling queue names are warnings; malformed declarations are errors
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::DuplicateQueue { .. } | Self::UnknownQueue { .. } | Self::HandlerConflict { .. }
        )
    }
}

/// Failure to read a definitions document
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid definitions: {0}")]
    InvalidShape(String),
}

/// Failed queue -> handler lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Unknown queue: {0}")]
    UnknownQueue(String),

    #[error("Queue {0} has no handler")]
    Unassigned(String),
}
