//! Executor behaviour against in-process transports.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use gqlbatch_client::{
    ClientError, GraphQlQuery, Headers, OperationKind, QueryBatch, QueryExecutor, QueryItem,
    Result, Transport, TransportResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};

// =============================================================================
// Test transports
// =============================================================================

/// Replies with a fixed status and body, recording every request body.
#[derive(Debug)]
struct FixedTransport {
    status: u16,
    body: String,
    requests: Mutex<Vec<String>>,
}

impl FixedTransport {
    fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn json(body: Value) -> Self {
        Self::new(200, body.to_string())
    }

    fn requests(&self) -> Vec<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|body| serde_json::from_str(body).unwrap())
            .collect()
    }
}

#[async_trait]
impl Transport for FixedTransport {
    async fn send(&self, body: String, _headers: &Headers) -> Result<TransportResponse> {
        self.requests.lock().unwrap().push(body);
        Ok(TransportResponse::new(self.status, self.body.clone()))
    }
}

/// Never answers. Flags when its in-flight future is dropped.
#[derive(Debug, Default)]
struct HangingTransport {
    calls: AtomicUsize,
    dropped: Arc<AtomicBool>,
}

#[derive(Debug)]
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for HangingTransport {
    async fn send(&self, _body: String, _headers: &Headers) -> Result<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _flag = DropFlag(Arc::clone(&self.dropped));
        std::future::pending().await
    }
}

/// Answers after a delay.
#[derive(Debug)]
struct SlowTransport {
    delay: Duration,
}

#[async_trait]
impl Transport for SlowTransport {
    async fn send(&self, _body: String, _headers: &Headers) -> Result<TransportResponse> {
        tokio::time::sleep(self.delay).await;
        Ok(TransportResponse::new(200, r#"{"data":{"a":1}}"#))
    }
}

fn user_batch() -> QueryBatch {
    QueryBatch::new()
        .with_item(
            "a",
            QueryItem::new("user")
                .typed_variable("id", "42", "ID!")
                .with_selection("id name"),
        )
        .unwrap()
}

// =============================================================================
// Request shape
// =============================================================================

#[tokio::test]
async fn test_posts_compiled_document() {
    let transport = Arc::new(FixedTransport::json(json!({ "data": { "a": null } })));
    let executor = QueryExecutor::new(Arc::clone(&transport));

    executor
        .execute(OperationKind::Query, &user_batch())
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        json!({
            "query": "query queryName($input0:ID!){a:user(id:$input0){id name}}",
            "variables": { "input0": "42" }
        })
    );
}

#[tokio::test]
async fn test_mutation_keyword() {
    let transport = Arc::new(FixedTransport::json(json!({ "data": {} })));
    let executor = QueryExecutor::new(Arc::clone(&transport));
    let batch = QueryBatch::new()
        .with_item("t", QueryItem::new("touch"))
        .unwrap();

    executor.execute(OperationKind::Mutation, &batch).await.unwrap();

    let query = transport.requests()[0]["query"].as_str().unwrap().to_string();
    assert_eq!(query, "mutation queryName{t:touch}");
}

// =============================================================================
// Response handling
// =============================================================================

#[tokio::test]
async fn test_partial_success_is_ok() {
    let body = json!({ "data": { "a": 1 }, "errors": [{ "message": "x" }] });
    let executor = QueryExecutor::new(FixedTransport::json(body));

    let response = executor
        .execute(OperationKind::Query, &user_batch())
        .await
        .unwrap();

    assert_eq!(response.data, Some(json!({ "a": 1 })));
    assert!(response.is_partial());
    assert_eq!(response.errors()[0].message, "x");
}

#[tokio::test]
async fn test_error_status_is_bad_response() {
    let executor = QueryExecutor::new(FixedTransport::new(404, "not found"));

    let err = executor
        .execute(OperationKind::Query, &user_batch())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Bad response(404) from server: not found");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_server_error_keeps_body() {
    let executor = QueryExecutor::new(FixedTransport::new(502, "<html>bad gateway</html>"));

    let err = executor
        .execute(OperationKind::Query, &user_batch())
        .await
        .unwrap_err();

    match err {
        ClientError::BadResponse { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body, "<html>bad gateway</html>");
        }
        other => panic!("expected BadResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_body_is_invalid_response() {
    let executor = QueryExecutor::new(FixedTransport::new(200, "ok"));

    let err = executor
        .execute(OperationKind::Query, &user_batch())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidResponse(_)));
}

#[derive(Debug, Deserialize, PartialEq)]
struct UserData {
    a: User,
}

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: String,
    name: String,
}

#[tokio::test]
async fn test_execute_as_typed_data() {
    let body = json!({ "data": { "a": { "id": "42", "name": "Ada" } } });
    let executor = QueryExecutor::new(FixedTransport::json(body));

    let response = executor
        .execute_as::<UserData>(OperationKind::Query, &user_batch(), &Headers::new())
        .await
        .unwrap();

    assert_eq!(
        response.data,
        Some(UserData {
            a: User {
                id: "42".into(),
                name: "Ada".into()
            }
        })
    );
    assert!(!response.has_errors());
}

// =============================================================================
// Deadline
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_hanging_transport_times_out_at_default() {
    let transport = Arc::new(HangingTransport::default());
    let executor = QueryExecutor::new(Arc::clone(&transport));
    assert_eq!(executor.timeout(), Duration::from_millis(3000));

    let started = tokio::time::Instant::now();
    let err = executor
        .execute(OperationKind::Query, &user_batch())
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.to_string(), "Request timed out after 3000ms");
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(3000));
    assert!(elapsed < Duration::from_millis(3100));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_cancels_in_flight_request() {
    let transport = Arc::new(HangingTransport::default());
    let executor = QueryExecutor::new(Arc::clone(&transport)).with_timeout(Duration::from_millis(50));

    let err = executor
        .execute(OperationKind::Query, &user_batch())
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert!(transport.dropped.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn test_response_inside_deadline() {
    let executor = QueryExecutor::new(SlowTransport {
        delay: Duration::from_millis(2999),
    });

    let response = executor
        .execute(OperationKind::Query, &user_batch())
        .await
        .unwrap();
    assert_eq!(response.data, Some(json!({ "a": 1 })));
}

#[tokio::test(start_paused = true)]
async fn test_response_after_deadline() {
    let executor = QueryExecutor::new(SlowTransport {
        delay: Duration::from_millis(3001),
    });

    let err = executor
        .execute(OperationKind::Query, &user_batch())
        .await
        .unwrap_err();
    assert!(err.is_timeout());
}

// =============================================================================
// Pending query sessions
// =============================================================================

#[tokio::test]
async fn test_session_drains_on_execute() {
    let transport = Arc::new(FixedTransport::json(json!({ "data": { "a": null, "b": null } })));
    let executor = QueryExecutor::new(Arc::clone(&transport));
    let mut query = GraphQlQuery::new(&executor, OperationKind::Query);

    assert!(!query.has_items());
    query
        .add_item("a", QueryItem::new("user").typed_variable("id", "1", "ID!"))
        .unwrap()
        .add_item("b", QueryItem::new("user").typed_variable("id", "2", "ID!"))
        .unwrap();
    assert!(query.has_items());

    let err = query.add_item("a", QueryItem::new("team")).unwrap_err();
    assert!(matches!(err, ClientError::DuplicateAlias { .. }));

    query.execute().await.unwrap();
    assert!(!query.has_items());

    let requests = transport.requests();
    assert_eq!(
        requests[0]["query"],
        "query queryName($input0:ID!,$input1:ID!){a:user(id:$input0),b:user(id:$input1)}"
    );
    assert_eq!(requests[0]["variables"], json!({ "input0": "1", "input1": "2" }));
}

#[tokio::test]
async fn test_session_drains_on_failure() {
    let executor = QueryExecutor::new(FixedTransport::new(500, "boom"));
    let mut query = GraphQlQuery::new(&executor, OperationKind::Query);
    query.extend(user_batch()).unwrap();

    assert!(query.execute().await.unwrap_err().is_bad_response());
    assert!(!query.has_items());
}
