//! Configuration management

use serde::Deserialize;
use std::path::{Path, PathBuf};

use queuebridge_core::LOCAL_REGION;
use queuebridge_lambda::{client::DEFAULT_LAMBDA_ENDPOINT, LambdaInvokerConfig};

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub lambda: LambdaConfig,

    #[serde(default)]
    pub definitions: DefinitionsConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LambdaConfig {
    #[serde(default = "default_lambda_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default = "default_credential")]
    pub access_key_id: String,

    #[serde(default = "default_credential")]
    pub secret_access_key: String,
}

impl Default for LambdaConfig {
    fn default() -> Self {
        Self {
            endpoint: default_lambda_endpoint(),
            region: default_region(),
            access_key_id: default_credential(),
            secret_access_key: default_credential(),
        }
    }
}

impl LambdaConfig {
    pub fn invoker_config(&self) -> LambdaInvokerConfig {
        LambdaInvokerConfig {
            endpoint: self.endpoint.clone(),
            region: self.region.clone(),
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DefinitionsConfig {
    #[serde(default = "default_definitions_path")]
    pub path: PathBuf,

    /// Overrides `provider.stage` when generating function names
    #[serde(default)]
    pub stage: Option<String>,
}

impl Default for DefinitionsConfig {
    fn default() -> Self {
        Self {
            path: default_definitions_path(),
            stage: None,
        }
    }
}

fn default_port() -> u16 {
    3003
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_lambda_endpoint() -> String {
    DEFAULT_LAMBDA_ENDPOINT.to_string()
}

fn default_region() -> String {
    LOCAL_REGION.to_string()
}

fn default_credential() -> String {
    "local".to_string()
}

fn default_definitions_path() -> PathBuf {
    PathBuf::from("serverless.yml")
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Without an explicit file, `./queuebridge.toml` is used when present.
    /// Environment variables use the `QUEUEBRIDGE__` prefix and `__` between
    /// sections, e.g. `QUEUEBRIDGE__SERVER__PORT=4000`.
    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        let builder = config::Config::builder();
        let builder = match file {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name("queuebridge").required(false)),
        };

        let config = builder
            .add_source(
                config::Environment::with_prefix("QUEUEBRIDGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize::<Config>()?)
    }
}
