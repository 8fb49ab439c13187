use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use kb_relay::api::{create_router, AppState};
use kb_relay::domain::{ports::DocumentStore, Document, DomainError, KeywordFilter};
use kb_relay::infrastructure::{AppConfig, InMemoryDocumentStore};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::util::ServiceExt;

const SECRET: &str = "test-webhook-secret";

/// In-memory store that counts every call it serves.
struct CountingStore {
    inner: InMemoryDocumentStore,
    calls: AtomicUsize,
}

impl CountingStore {
    fn seeded() -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryDocumentStore::with_documents(vec![
                Document::new(1, "Hours", "We are open 9 to 5"),
                Document::new(2, "Returns", "Refunds within 30 days"),
            ]),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn fetch_all(&self) -> Result<Vec<Document>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_all().await
    }

    async fn fetch_matching(&self, filter: &KeywordFilter) -> Result<Vec<Document>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_matching(filter).await
    }
}

struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn fetch_all(&self) -> Result<Vec<Document>, DomainError> {
        Err(DomainError::store("Invalid API key"))
    }

    async fn fetch_matching(&self, _: &KeywordFilter) -> Result<Vec<Document>, DomainError> {
        Ok(vec![])
    }
}

struct PanickingStore;

#[async_trait]
impl DocumentStore for PanickingStore {
    async fn fetch_all(&self) -> Result<Vec<Document>, DomainError> {
        panic!("store exploded")
    }

    async fn fetch_matching(&self, _: &KeywordFilter) -> Result<Vec<Document>, DomainError> {
        Ok(vec![])
    }
}

fn config() -> AppConfig {
    AppConfig::from_lookup(|name| match name {
        "DOCUMENT_STORE" => Some("memory".into()),
        "VAPI_WEBHOOK_SECRET" => Some(SECRET.into()),
        _ => None,
    })
    .expect("test config")
}

fn app(store: Arc<dyn DocumentStore>) -> Router {
    create_router(AppState::new(store, config()))
}

fn user_says(text: &str) -> Value {
    json!({
        "message": {
            "messages": [
                { "role": "assistant", "content": "How can I help?" },
                { "role": "user", "content": text }
            ]
        }
    })
}

async fn post_search(app: Router, auth: Option<&str>, body: String) -> (StatusCode, Value) {
    send_search(app, auth, Some("application/json"), body).await
}

async fn send_search(
    app: Router,
    auth: Option<&str>,
    content_type: Option<&str>,
    body: String,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method("POST").uri("/kb/search");
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }
    if let Some(auth) = auth {
        request = request.header(header::AUTHORIZATION, auth);
    }

    let response = app
        .oneshot(request.body(Body::from(body)).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn authorized_search(app: Router, body: Value) -> (StatusCode, Value) {
    post_search(app, Some(&format!("Bearer {SECRET}")), body.to_string()).await
}

fn hours_doc() -> Value {
    json!({ "uuid": 1, "title": "Hours", "content": "We are open 9 to 5", "similarity": 1 })
}

fn returns_doc() -> Value {
    json!({ "uuid": 2, "title": "Returns", "content": "Refunds within 30 days", "similarity": 1 })
}

#[tokio::test]
async fn liveness_route_returns_plain_text() {
    let response = app(CountingStore::seeded())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"KB server is running");
}

#[tokio::test]
async fn health_route_reports_version() {
    let response = app(CountingStore::seeded())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn missing_or_wrong_token_is_rejected_before_any_store_call() {
    let store = CountingStore::seeded();
    let cases = [
        None,
        Some(""),
        Some("Bearer "),
        Some("Bearer wrong-secret"),
        Some("Basic dGVzdDp0ZXN0"),
    ];

    for auth in cases {
        let (status, body) =
            post_search(app(store.clone()), auth, user_says("open").to_string()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "auth: {auth:?}");
        assert_eq!(body, json!({ "error": "Unauthorized" }));
    }

    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn matching_query_returns_only_filtered_documents() {
    let store = CountingStore::seeded();
    let (status, body) = authorized_search(app(store.clone()), user_says("open hours")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "documents": [hours_doc()] }));
    assert_eq!(store.calls(), 2);
}

#[tokio::test]
async fn matching_is_case_insensitive_and_any_keyword() {
    let (status, body) =
        authorized_search(app(CountingStore::seeded()), user_says("REFUNDS please")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "documents": [returns_doc()] }));
}

#[tokio::test]
async fn non_matching_query_falls_back_to_all_documents() {
    let (status, body) = authorized_search(app(CountingStore::seeded()), user_says("xyz")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "documents": [hours_doc(), returns_doc()] }));
}

#[tokio::test]
async fn whitespace_only_query_returns_all_documents() {
    let (status, body) =
        authorized_search(app(CountingStore::seeded()), user_says(" \t\n ")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["documents"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn payload_without_user_message_is_not_an_error() {
    for payload in [json!({}), json!({ "message": { "messages": [] } })] {
        let (status, body) = authorized_search(app(CountingStore::seeded()), payload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["documents"].as_array().unwrap().len(), 2);
    }
}

#[tokio::test]
async fn only_the_latest_user_message_is_searched() {
    let payload = json!({
        "message": {
            "messages": [
                { "role": "user", "content": "refunds" },
                { "role": "assistant", "content": "Anything else?" },
                { "role": "user", "content": "when are you open" },
                { "role": "assistant", "content": "refunds" }
            ]
        }
    });

    let (_, body) = authorized_search(app(CountingStore::seeded()), payload).await;
    assert_eq!(body, json!({ "documents": [hours_doc()] }));
}

#[tokio::test]
async fn identical_requests_yield_identical_responses() {
    let store = CountingStore::seeded();
    let first = authorized_search(app(store.clone()), user_says("days")).await;
    let second = authorized_search(app(store.clone()), user_says("days")).await;

    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(first, second);
}

#[tokio::test]
async fn store_failure_surfaces_store_message() {
    let (status, body) = authorized_search(app(Arc::new(FailingStore)), user_says("open")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Invalid API key" }));
}

#[tokio::test]
async fn panic_in_handler_becomes_server_error() {
    let (status, body) =
        authorized_search(app(Arc::new(PanickingStore)), user_says("open")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "store exploded" }));
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let store = CountingStore::seeded();
    let (status, body) = post_search(
        app(store.clone()),
        Some(&format!("Bearer {SECRET}")),
        "{\"message\":".to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn off_shape_earlier_turns_do_not_fail_the_search() {
    let payloads = [
        json!({
            "message": {
                "messages": [
                    { "role": "assistant", "content": [{ "type": "text", "text": "Hi there" }] },
                    { "role": "user", "content": "open" }
                ]
            }
        }),
        json!({
            "message": {
                "messages": [
                    { "role": null, "content": "system prompt" },
                    { "role": "user", "content": "open" }
                ]
            }
        }),
    ];

    for payload in payloads {
        let (status, body) = authorized_search(app(CountingStore::seeded()), payload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "documents": [hours_doc()] }));
    }
}

#[tokio::test]
async fn body_without_json_content_type_reads_as_empty_query() {
    let auth = format!("Bearer {SECRET}");
    for content_type in [None, Some("text/plain")] {
        let (status, body) = send_search(
            app(CountingStore::seeded()),
            Some(&auth),
            content_type,
            user_says("open hours").to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "content type: {content_type:?}");
        assert_eq!(body, json!({ "documents": [hours_doc(), returns_doc()] }));
    }
}

#[tokio::test]
async fn json_body_of_the_wrong_shape_is_unprocessable() {
    let (status, body) = post_search(
        app(CountingStore::seeded()),
        Some(&format!("Bearer {SECRET}")),
        json!({ "message": { "messages": "open" } }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().is_some_and(|e| e.contains("expected a sequence")));
}
