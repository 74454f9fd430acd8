//! Builds the queue -> handler table from definitions

use tracing::{debug, error, info, warn};

use queuebridge_core::queue_name_from_arn;

use crate::definitions::{Definitions, QueueReference, ARN_ATTRIBUTE};
use crate::error::ConfigError;
use crate::handler_map::HandlerMap;

/// Result of a resolution pass
#[derive(Debug, Clone)]
pub struct Resolution {
    pub handlers: HandlerMap,
    /// Every declaration that was skipped, in the order it was found
    pub diagnostics: Vec<ConfigError>,
}

/// Resolve queue triggers against declared queue resources.
///
/// Queues are registered first, then each function's queue triggers are
/// bound to them. Declaration order decides both duplicate queues and
/// competing handlers (first wins). Malformed entries are logged, recorded
/// in [`Resolution::diagnostics`] and skipped; they never abort the pass.
pub fn resolve(definitions: &Definitions) -> Resolution {
    let mut handlers = HandlerMap::default();
    let mut diagnostics = Vec::new();

    for resource in definitions.resources.iter().filter(|r| r.is_queue()) {
        let registered = match resource.queue_name() {
            Some(queue_name) => handlers.register(queue_name, &resource.logical_id),
            None => Err(ConfigError::MissingQueueName {
                resource: resource.logical_id.clone(),
            }),
        };

        if let Err(e) = registered {
            report(&e);
            diagnostics.push(e);
        }
    }

    for function in &definitions.functions {
        let Some(name) = function.name.as_deref().filter(|n| !n.is_empty()) else {
            debug!(function = %function.key, "Skipping function without a name");
            continue;
        };

        for raw in function.queue_triggers() {
            let bound = resolve_queue_name(definitions, name, &QueueReference::parse(raw))
                .and_then(|queue_name| handlers.assign(&queue_name, name));

            if let Err(e) = bound {
                report(&e);
                diagnostics.push(e);
            }
        }
    }

    for entry in handlers.iter() {
        info!(
            queue = %entry.queue_name,
            handler = %entry.assignment,
            "Queue handler"
        );
    }

    Resolution {
        handlers,
        diagnostics,
    }
}

/// Turn a queue reference into a queue name
fn resolve_queue_name(
    definitions: &Definitions,
    function: &str,
    reference: &QueueReference,
) -> Result<String, ConfigError> {
    match reference {
        QueueReference::Literal(arn) => queue_name_from_arn(arn)
            .map(str::to_string)
            .ok_or_else(|| ConfigError::MalformedArn {
                function: function.to_string(),
                arn: arn.clone(),
            }),
        QueueReference::Attribute {
            resource,
            attribute,
        } => {
            if attribute != ARN_ATTRIBUTE {
                return Err(ConfigError::UnsupportedAttribute {
                    function: function.to_string(),
                    resource: resource.clone(),
                    attribute: attribute.clone(),
                });
            }

            let target = definitions
                .resource(resource)
                .ok_or_else(|| ConfigError::MissingResource {
                    function: function.to_string(),
                    resource: resource.clone(),
                })?;

            target
                .queue_name()
                .map(str::to_string)
                .ok_or_else(|| ConfigError::ResourceWithoutQueueName {
                    function: function.to_string(),
                    resource: resource.clone(),
                })
        }
        QueueReference::Unrecognized(raw) => Err(ConfigError::UnrecognizedReference {
            function: function.to_string(),
            raw: raw.to_string(),
        }),
    }
}

fn report(e: &ConfigError) {
    if e.is_warning() {
        warn!(error = %e, "Skipping queue declaration");
    } else {
        error!(error = %e, "Skipping queue declaration");
    }
}
