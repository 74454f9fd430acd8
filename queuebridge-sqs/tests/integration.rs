//! Integration tests for the SendMessage gateway
//!
//! Router-level tests use a recording invoker; the end-to-end test drives the
//! gateway over HTTP and delivers to a fake Lambda endpoint through the SDK.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Request, StatusCode},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use queuebridge_lambda::{InvocationOutcome, InvokeError, Invoker, LambdaInvoker, LambdaInvokerConfig};
use queuebridge_resolver::{resolve, Definitions, FunctionDefinition, ResourceDefinition};
use queuebridge_sqs::{handle_request, health, BridgeContext};

const ORDERS_URL: &str = "http%3A%2F%2Flocalhost%3A3003%2F000000000000%2Forders";

type Calls = Arc<Mutex<Vec<(String, Bytes)>>>;

/// Records invocations and answers with a fixed status code
struct RecordingInvoker {
    calls: Calls,
    status_code: i32,
}

#[async_trait]
impl Invoker for RecordingInvoker {
    async fn invoke(&self, function_name: &str, payload: Bytes) -> Result<InvocationOutcome, InvokeError> {
        self.calls
            .lock()
            .unwrap()
            .push((function_name.to_string(), payload));

        Ok(InvocationOutcome {
            status_code: self.status_code,
            function_error: None,
            payload: Bytes::from_static(b"null"),
        })
    }
}

fn definitions() -> Definitions {
    Definitions::new()
        .with_resource(ResourceDefinition::queue("OrdersQueue", "orders"))
        .with_resource(ResourceDefinition::queue("FailingQueue", "failing"))
        .with_function(
            FunctionDefinition::new("process")
                .with_name("shop-dev-process")
                .with_event(json!({ "sqs": "arn:aws:sqs:localhost:000000000000:orders" })),
        )
        .with_function(
            FunctionDefinition::new("broken")
                .with_name("shop-dev-broken")
                .with_event(json!({ "sqs": { "arn": { "Fn::GetAtt": ["FailingQueue", "Arn"] } } })),
        )
}

fn create_router(invoker: Arc<dyn Invoker>) -> Router {
    let context = Arc::new(BridgeContext::new(resolve(&definitions()).handlers, invoker));

    Router::new()
        .route("/", post(handle_request))
        .route("/health", get(health))
        .with_state(context)
}

fn recording_router(status_code: i32) -> (Router, Calls) {
    let calls: Calls = Arc::default();
    let invoker = Arc::new(RecordingInvoker {
        calls: calls.clone(),
        status_code,
    });
    (create_router(invoker), calls)
}

fn form_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: Router, body: &str) -> (StatusCode, Option<String>, String) {
    let response = router.oneshot(form_request(body)).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_send_message_invokes_handler() {
    let (router, calls) = recording_router(200);

    let (status, content_type, body) = send(
        router,
        &format!("Action=SendMessage&QueueUrl={ORDERS_URL}&MessageBody=hello"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<SendMessageResponse></SendMessageResponse>");
    assert_eq!(content_type.as_deref(), Some("text/xml"));

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "shop-dev-process");

    let event: Value = serde_json::from_slice(&calls[0].1).unwrap();
    assert_eq!(event["Records"][0]["body"], "hello");
    assert!(event["Records"][0]["eventSourceARN"]
        .as_str()
        .unwrap()
        .ends_with(":orders"));
}

#[tokio::test]
async fn test_missing_action() {
    let (router, calls) = recording_router(200);
    let (status, _, body) = send(router, &format!("QueueUrl={ORDERS_URL}&MessageBody=hello")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "missing action");
    assert!(calls.lock().unwrap().is_empty());

    let (router, _) = recording_router(200);
    let (status, _, body) = send(router, "Action=&MessageBody=hello").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "missing action");
}

#[tokio::test]
async fn test_unsupported_action() {
    let (router, calls) = recording_router(200);
    let (status, _, body) = send(router, &format!("Action=ReceiveMessage&QueueUrl={ORDERS_URL}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "only SendMessage supported");
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_queue() {
    let (router, calls) = recording_router(200);
    let (status, _, body) = send(
        router,
        "Action=SendMessage&QueueUrl=http%3A%2F%2Flocalhost%3A3003%2F000000000000%2Fghost&MessageBody=hello",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_message_body() {
    let (router, calls) = recording_router(200);
    let (status, _, body) = send(router, &format!("Action=SendMessage&QueueUrl={ORDERS_URL}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_invocation_failure_status() {
    let (router, calls) = recording_router(500);
    let (status, _, body) = send(
        router,
        &format!("Action=SendMessage&QueueUrl={ORDERS_URL}&MessageBody=hello"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_gateway_keeps_serving_after_failure() {
    let (router, calls) = recording_router(200);

    let (status, _, _) = send(router.clone(), "Action=DeleteQueue").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(
        router,
        &format!("Action=SendMessage&QueueUrl={ORDERS_URL}&MessageBody=again"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_health_lists_queues() {
    let (router, _) = recording_router(200);

    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let health: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "running");
    assert_eq!(health["queues"]["orders"], "shop-dev-process");
    assert_eq!(health["queues"]["failing"], "shop-dev-broken");
}

// === End to end ===

async fn fake_invoke(State(calls): State<Calls>, Path(function_name): Path<String>, body: Bytes) -> &'static str {
    calls.lock().unwrap().push((function_name, body));
    "null"
}

async fn spawn(listener: TcpListener, router: Router) -> tokio::task::JoinHandle<()> {
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle
}

#[tokio::test]
async fn test_end_to_end_through_lambda_endpoint() {
    let lambda_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let lambda_endpoint = format!("http://{}", lambda_listener.local_addr().unwrap());
    let lambda_calls: Calls = Arc::default();
    let lambda_router = Router::new()
        .route("/2015-03-31/functions/:function_name/invocations", post(fake_invoke))
        .with_state(lambda_calls.clone());
    let _lambda = spawn(lambda_listener, lambda_router).await;

    let invoker = LambdaInvoker::new(LambdaInvokerConfig {
        endpoint: lambda_endpoint,
        ..Default::default()
    })
    .await;

    let gateway_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let gateway_url = format!("http://{}/", gateway_listener.local_addr().unwrap());
    let _gateway = spawn(gateway_listener, create_router(Arc::new(invoker))).await;

    let response = reqwest::Client::new()
        .post(&gateway_url)
        .form(&[
            ("Action", "SendMessage"),
            ("QueueUrl", "http://localhost:3003/000000000000/orders"),
            ("MessageBody", r#"{"orderId":7}"#),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert!(response.headers().contains_key("x-amzn-requestid"));
    assert_eq!(
        response.text().await.unwrap(),
        "<SendMessageResponse></SendMessageResponse>"
    );

    let calls = lambda_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "shop-dev-process");

    let event: Value = serde_json::from_slice(&calls[0].1).unwrap();
    assert_eq!(event["Records"][0]["body"], r#"{"orderId":7}"#);
    assert_eq!(event["Records"][0]["eventSource"], "aws:sqs");
    assert_eq!(event["Records"][0]["awsRegion"], "localhost");
}
