//! HTTP router for the gateway

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use queuebridge_sqs::{handle_request, health, BridgeContext};

/// Create the main application router
pub fn create_router(context: Arc<BridgeContext>) -> Router {
    Router::new()
        .route("/", post(handle_request))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}
