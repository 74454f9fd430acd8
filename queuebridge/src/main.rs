//! queuebridge - local SQS to Lambda bridge
//!
//! Emulates the SQS `SendMessage` call and hands every accepted message to
//! the locally running function bound to its queue, so queue-triggered
//! functions can be exercised without a cloud deployment.

mod config;
mod router;

use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use queuebridge_lambda::LambdaInvoker;
use queuebridge_resolver::{load_definitions, resolve};
use queuebridge_sqs::BridgeContext;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "queuebridge")]
#[command(about = "Local SQS SendMessage to Lambda bridge", long_about = None)]
struct Args {
    /// Configuration file (defaults to ./queuebridge.toml when present)
    #[arg(short, long, env = "QUEUEBRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "QUEUEBRIDGE_PORT")]
    port: Option<u16>,

    /// Host to bind to
    #[arg(long, env = "QUEUEBRIDGE_HOST")]
    host: Option<String>,

    /// Serverless-style definitions file
    #[arg(short, long, env = "QUEUEBRIDGE_DEFINITIONS")]
    definitions: Option<PathBuf>,

    /// Stage used for generated function names
    #[arg(long, env = "QUEUEBRIDGE_STAGE")]
    stage: Option<String>,

    /// Local Lambda invoke endpoint
    #[arg(long, env = "QUEUEBRIDGE_LAMBDA_ENDPOINT")]
    lambda_endpoint: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "QUEUEBRIDGE_LOG_LEVEL")]
    log_level: String,
}

impl Args {
    /// Command-line flags win over file and environment configuration
    fn apply(self, config: &mut Config) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(path) = self.definitions {
            config.definitions.path = path;
        }
        if let Some(stage) = self.stage {
            config.definitions.stage = Some(stage);
        }
        if let Some(endpoint) = self.lambda_endpoint {
            config.lambda.endpoint = endpoint;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("queuebridge={},tower_http=debug", args.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);

    info!("Starting queuebridge...");
    info!("  Definitions: {}", config.definitions.path.display());
    info!("  Lambda endpoint: {}", config.lambda.endpoint);

    let definitions = load_definitions(
        &config.definitions.path,
        config.definitions.stage.as_deref(),
    )
    .with_context(|| {
        format!(
            "failed to load definitions from {}",
            config.definitions.path.display()
        )
    })?;

    let resolution = resolve(&definitions);
    if !resolution.diagnostics.is_empty() {
        warn!(
            skipped = resolution.diagnostics.len(),
            "Some queue declarations were skipped"
        );
    }

    let invoker = LambdaInvoker::new(config.lambda.invoker_config()).await;
    let context = Arc::new(BridgeContext::new(resolution.handlers, Arc::new(invoker)));

    // Create router
    let app = router::create_router(context);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
