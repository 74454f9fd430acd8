//! Queue to handler resolution for queuebridge
//!
//! Turns declarative infrastructure definitions into a [`HandlerMap`]:
//! - [`definitions`]: resource and function definitions, typed queue references
//! - [`loader`]: reads a serverless-style YAML/JSON document into [`Definitions`]
//! - [`resolver`]: builds the queue -> handler assignment table

pub mod definitions;
pub mod error;
pub mod handler_map;
pub mod loader;
pub mod resolver;

pub use definitions::{Definitions, FunctionDefinition, QueueReference, ResourceDefinition};
pub use error::{ConfigError, LoadError, LookupError};
pub use handler_map::{Assignment, HandlerMap, QueueEntry};
pub use loader::{load_definitions, parse_definitions};
pub use resolver::{resolve, Resolution};
