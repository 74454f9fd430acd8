//! Declarative resource and function definitions

use serde_json::{Map, Value};

/// Resource type tag of a queue resource
pub const QUEUE_RESOURCE_TYPE: &str = "AWS::SQS::Queue";

/// Property holding a queue resource's name
pub const QUEUE_NAME_PROPERTY: &str = "QueueName";

/// Event key marking a queue trigger
pub const QUEUE_EVENT_KEY: &str = "sqs";

/// The only resource attribute that resolves to a queue
pub const ARN_ATTRIBUTE: &str = "Arn";

const GET_ATT: &str = "Fn::GetAtt";

/// A declared infrastructure resource
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDefinition {
    pub logical_id: String,
    pub resource_type: String,
    pub properties: Map<String, Value>,
}

impl ResourceDefinition {
    pub fn new(logical_id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            logical_id: logical_id.into(),
            resource_type: resource_type.into(),
            properties: Map::new(),
        }
    }

    /// Shorthand for a queue resource named `queue_name`
    pub fn queue(logical_id: impl Into<String>, queue_name: &str) -> Self {
        Self::new(logical_id, QUEUE_RESOURCE_TYPE).with_property(QUEUE_NAME_PROPERTY, queue_name)
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn is_queue(&self) -> bool {
        self.resource_type == QUEUE_RESOURCE_TYPE
    }

    /// The queue-name property, if present as a non-empty string
    pub fn queue_name(&self) -> Option<&str> {
        self.properties
            .get(QUEUE_NAME_PROPERTY)
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }
}

/// A function plus its trigger declarations
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    /// Key the function is declared under
    pub key: String,
    /// Deployed function name, used as the handler name
    pub name: Option<String>,
    pub events: Vec<Value>,
}

impl FunctionDefinition {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: None,
            events: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_event(mut self, event: Value) -> Self {
        self.events.push(event);
        self
    }

    /// Raw queue references of every queue trigger, in declaration order.
    ///
    /// A trigger is either `{"sqs": <reference>}` or `{"sqs": {"arn": <reference>}}`.
    /// An `sqs` object without an `arn` key is returned as-is so it surfaces
    /// as an unrecognized reference.
    pub fn queue_triggers(&self) -> impl Iterator<Item = &Value> {
        self.events
            .iter()
            .filter_map(|event| event.get(QUEUE_EVENT_KEY))
            .map(|trigger| trigger.get("arn").unwrap_or(trigger))
    }
}

/// Everything the resolver consumes, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions {
    pub resources: Vec<ResourceDefinition>,
    pub functions: Vec<FunctionDefinition>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, resource: ResourceDefinition) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn with_function(mut self, function: FunctionDefinition) -> Self {
        self.functions.push(function);
        self
    }

    /// First resource declared under `logical_id`
    pub fn resource(&self, logical_id: &str) -> Option<&ResourceDefinition> {
        self.resources.iter().find(|r| r.logical_id == logical_id)
    }
}

/// A queue trigger's reference, classified
#[derive(Debug, Clone, PartialEq)]
pub enum QueueReference {
    /// ARN-like string; the queue name is its trailing segment
    Literal(String),
    /// `Fn::GetAtt` lookup of another resource's attribute
    Attribute { resource: String, attribute: String },
    /// Any other shape, kept for diagnostics
    Unrecognized(Value),
}

impl QueueReference {
    pub fn parse(raw: &Value) -> Self {
        match raw {
            Value::String(arn) => Self::Literal(arn.clone()),
            Value::Object(object) if object.len() == 1 => match object.get(GET_ATT) {
                Some(target) => Self::parse_get_att(target).unwrap_or_else(|| Self::Unrecognized(raw.clone())),
                None => Self::Unrecognized(raw.clone()),
            },
            _ => Self::Unrecognized(raw.clone()),
        }
    }

    // ["Resource", "Attribute"] or "Resource.Attribute"
    fn parse_get_att(target: &Value) -> Option<Self> {
        let (resource, attribute) = match target {
            Value::Array(parts) => match parts.as_slice() {
                [Value::String(resource), Value::String(attribute)] => {
                    (resource.as_str(), attribute.as_str())
                }
                _ => return None,
            },
            Value::String(dotted) => dotted.split_once('.')?,
            _ => return None,
        };

        if resource.is_empty() || attribute.is_empty() {
            return None;
        }

        Some(Self::Attribute {
            resource: resource.to_string(),
            attribute: attribute.to_string(),
        })
    }
}
