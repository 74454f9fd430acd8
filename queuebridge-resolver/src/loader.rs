//! Serverless-style definitions loader
//!
//! Reads `service`, `provider.stage`, `functions` and `resources.Resources`
//! from a YAML (or JSON) document, keeping declaration order.

use std::path::Path;

use serde_json::{Map, Number, Value as JsonValue};
use serde_yaml::{Mapping, Value as YamlValue};
use tracing::info;

use crate::definitions::{Definitions, FunctionDefinition, ResourceDefinition};
use crate::error::LoadError;

/// Stage used when neither the caller nor `provider.stage` names one
pub const DEFAULT_STAGE: &str = "dev";

/// Load definitions from a file. `stage` overrides `provider.stage`.
pub fn load_definitions(path: impl AsRef<Path>, stage: Option<&str>) -> Result<Definitions, LoadError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let definitions = parse_definitions(&contents, stage)?;

    info!(
        path = %path.display(),
        resources = definitions.resources.len(),
        functions = definitions.functions.len(),
        "Loaded definitions"
    );

    Ok(definitions)
}

/// Parse a definitions document. `stage` overrides `provider.stage`.
pub fn parse_definitions(contents: &str, stage: Option<&str>) -> Result<Definitions, LoadError> {
    let document: YamlValue = serde_yaml::from_str(contents)?;
    let YamlValue::Mapping(root) = document else {
        return Err(LoadError::InvalidShape("document root must be a mapping".to_string()));
    };

    let service = service_name(&root);
    let stage = stage
        .or_else(|| root.get("provider").and_then(|p| p.get("stage")).and_then(YamlValue::as_str))
        .unwrap_or(DEFAULT_STAGE);

    let mut definitions = Definitions::new();

    if let Some(functions) = optional_mapping(root.get("functions"), "functions")? {
        for (key, config) in functions {
            let key = mapping_key(key, "functions")?;
            definitions
                .functions
                .push(parse_function(key, config, service, stage)?);
        }
    }

    let resources = root.get("resources").and_then(|r| r.get("Resources"));
    if let Some(resources) = optional_mapping(resources, "resources.Resources")? {
        for (logical_id, body) in resources {
            let logical_id = mapping_key(logical_id, "resources.Resources")?;
            definitions.resources.push(parse_resource(logical_id, body));
        }
    }

    Ok(definitions)
}

// `service: name` or `service: { name: ... }`
fn service_name(root: &Mapping) -> Option<&str> {
    let service = root.get("service")?;
    service
        .as_str()
        .or_else(|| service.get("name").and_then(YamlValue::as_str))
}

fn parse_function(
    key: &str,
    config: &YamlValue,
    service: Option<&str>,
    stage: &str,
) -> Result<FunctionDefinition, LoadError> {
    let mut function = FunctionDefinition::new(key);

    function.name = match config.get("name").and_then(YamlValue::as_str) {
        Some(name) => Some(name.to_string()),
        None => service.map(|service| format!("{service}-{stage}-{key}")),
    };

    match config.get("events") {
        None | Some(YamlValue::Null) => {}
        Some(YamlValue::Sequence(events)) => {
            function.events = events.iter().map(yaml_to_json).collect();
        }
        Some(_) => {
            return Err(LoadError::InvalidShape(format!(
                "functions.{key}.events must be a list"
            )))
        }
    }

    Ok(function)
}

fn parse_resource(logical_id: &str, body: &YamlValue) -> ResourceDefinition {
    let resource_type = body.get("Type").and_then(YamlValue::as_str).unwrap_or_default();
    let mut resource = ResourceDefinition::new(logical_id, resource_type);

    if let Some(JsonValue::Object(properties)) = body.get("Properties").map(yaml_to_json) {
        resource.properties = properties;
    }

    resource
}

fn optional_mapping<'a>(
    value: Option<&'a YamlValue>,
    section: &str,
) -> Result<Option<&'a Mapping>, LoadError> {
    match value {
        None | Some(YamlValue::Null) => Ok(None),
        Some(YamlValue::Mapping(mapping)) => Ok(Some(mapping)),
        Some(_) => Err(LoadError::InvalidShape(format!("{section} must be a mapping"))),
    }
}

fn mapping_key<'a>(key: &'a YamlValue, section: &str) -> Result<&'a str, LoadError> {
    key.as_str()
        .ok_or_else(|| LoadError::InvalidShape(format!("{section} keys must be strings")))
}

/// Convert YAML into JSON. Tags become intrinsic-function objects:
/// `!GetAtt Queue.Arn` -> `{"Fn::GetAtt": "Queue.Arn"}`.
fn yaml_to_json(value: &YamlValue) -> JsonValue {
    match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::from(i)
            } else if let Some(u) = n.as_u64() {
                JsonValue::from(u)
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(JsonValue::Null, JsonValue::Number)
            }
        }
        YamlValue::String(s) => JsonValue::String(s.clone()),
        YamlValue::Sequence(items) => JsonValue::Array(items.iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(mapping) => JsonValue::Object(
            mapping
                .iter()
                .filter_map(|(k, v)| json_key(k).map(|k| (k, yaml_to_json(v))))
                .collect(),
        ),
        YamlValue::Tagged(tagged) => {
            let tag = tagged.tag.to_string();
            let mut object = Map::new();
            object.insert(
                format!("Fn::{}", tag.trim_start_matches('!')),
                yaml_to_json(&tagged.value),
            );
            JsonValue::Object(object)
        }
    }
}

fn json_key(key: &YamlValue) -> Option<String> {
    match key {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
