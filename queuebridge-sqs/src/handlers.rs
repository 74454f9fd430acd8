//! HTTP handlers for the SendMessage gateway

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use queuebridge_core::RequestId;

use crate::context::BridgeContext;
use crate::dispatch::dispatch;

/// The only supported action
pub const SEND_MESSAGE_ACTION: &str = "SendMessage";

const SEND_MESSAGE_RESPONSE: &str = "<SendMessageResponse></SendMessageResponse>";

const REQUEST_ID_HEADER: &str = "x-amzn-requestid";

/// Form fields of a `SendMessage` call. Other fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendMessageRequest {
    pub action: Option<String>,
    pub queue_url: Option<String>,
    pub message_body: Option<String>,
}

/// Handle a form-encoded `POST /`
pub async fn handle_request(State(context): State<Arc<BridgeContext>>, body: Bytes) -> Response {
    let request_id = RequestId::new();

    let request: SendMessageRequest = match serde_urlencoded::from_bytes(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "Malformed form body");
            return text_response(StatusCode::BAD_REQUEST, "malformed form body", &request_id);
        }
    };

    match request.action.as_deref() {
        None | Some("") => {
            warn!(request_id = %request_id, "Missing action");
            return text_response(StatusCode::BAD_REQUEST, "missing action", &request_id);
        }
        Some(SEND_MESSAGE_ACTION) => {}
        Some(action) => {
            warn!(request_id = %request_id, action = %action, "Unsupported action");
            return text_response(
                StatusCode::BAD_REQUEST,
                "only SendMessage supported",
                &request_id,
            );
        }
    }

    info!(
        request_id = %request_id,
        queue_url = request.queue_url.as_deref().unwrap_or_default(),
        "SQS SendMessage"
    );

    if dispatch(&context, &request).await {
        xml_response(StatusCode::OK, SEND_MESSAGE_RESPONSE, &request_id)
    } else {
        text_response(StatusCode::BAD_REQUEST, "", &request_id)
    }
}

/// Health check listing the resolved queues
pub async fn health(State(context): State<Arc<BridgeContext>>) -> Json<Value> {
    let handlers = context.handlers();
    let queues: serde_json::Map<String, Value> = handlers
        .iter()
        .map(|entry| (entry.queue_name.clone(), Value::from(entry.assignment.to_string())))
        .collect();

    Json(json!({
        "status": "running",
        "queues": queues,
    }))
}

// === Response Helpers ===

fn xml_response(status: StatusCode, body: &'static str, request_id: &RequestId) -> Response {
    response(status, Body::from(body), "text/xml", request_id)
}

fn text_response(status: StatusCode, body: &'static str, request_id: &RequestId) -> Response {
    response(status, Body::from(body), "text/plain; charset=utf-8", request_id)
}

fn response(status: StatusCode, body: Body, content_type: &'static str, request_id: &RequestId) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;

    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        headers.insert(REQUEST_ID_HEADER, value);
    }

    response
}
