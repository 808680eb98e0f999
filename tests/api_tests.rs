mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FakeNotifier, FakeSummarizer, FlakyStore};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use todo_summary::api::middleware::latency_millis;
use todo_summary::api::{AppState, build_router};
use todo_summary::clients::{Notifier, Summarizer};
use todo_summary::store::{InMemoryTaskStore, TaskCache, TaskStore};

async fn spawn_app(
    store: Arc<dyn TaskStore>,
    summarizer: Arc<dyn Summarizer>,
    notifier: Arc<dyn Notifier>,
) -> String {
    let state = AppState::new(
        store,
        TaskCache::new(),
        summarizer,
        notifier,
        Duration::from_secs(5),
        vec!["http://localhost:5173".to_string()],
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

async fn default_app() -> String {
    spawn_app(
        Arc::new(InMemoryTaskStore::new()),
        FakeSummarizer::failing(),
        FakeNotifier::succeeding(),
    )
    .await
}

async fn create(http: &reqwest::Client, base: &str, body: Value) -> Value {
    let resp = http
        .post(format!("{base}/todos"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn test_health() {
    let base = default_app().await;
    let resp = reqwest::get(format!("{base}/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_todo_crud_round_trip() {
    let base = default_app().await;
    let http = reqwest::Client::new();

    let created = create(&http, &base, json!({ "title": "Buy milk", "description": "2L" })).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["completed"], false);

    // Legacy clients send `text`.
    let legacy = create(&http, &base, json!({ "text": "Ship release" })).await;
    assert_eq!(legacy["title"], "Ship release");

    let listed: Vec<Value> = http
        .get(format!("{base}/todos"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);

    let updated: Value = http
        .put(format!("{base}/todos/{id}"))
        .json(&json!({ "completed": true }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["title"], "Buy milk");

    let resp = http
        .delete(format!("{base}/todos/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Todo deleted successfully");
    assert_eq!(body["deletedTodo"]["id"], id.as_str());

    let resp = http
        .delete(format!("{base}/todos/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Todo not found");
}

#[tokio::test]
async fn test_create_validation_errors() {
    let base = default_app().await;
    let http = reqwest::Client::new();

    let resp = http
        .post(format!("{base}/todos"))
        .json(&json!({ "title": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Todo title is required");

    let resp = http
        .post(format!("{base}/todos"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_update_unknown_todo_is_404() {
    let base = default_app().await;
    let resp = reqwest::Client::new()
        .put(format!("{base}/todos/nope"))
        .json(&json!({ "completed": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_summarize_with_no_pending_todos() {
    let notifier = FakeNotifier::succeeding();
    let base = spawn_app(
        Arc::new(InMemoryTaskStore::new()),
        FakeSummarizer::replying("unused"),
        notifier.clone(),
    )
    .await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/summarize"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "success": true, "message": "No pending todos to summarize" })
    );
    assert_eq!(notifier.call_count(), 0);
}

#[tokio::test]
async fn test_summarize_delivered() {
    let base = spawn_app(
        Arc::new(InMemoryTaskStore::new()),
        FakeSummarizer::replying("One errand."),
        FakeNotifier::succeeding(),
    )
    .await;
    let http = reqwest::Client::new();
    create(&http, &base, json!({ "title": "Buy milk" })).await;

    let body: Value = http
        .post(format!("{base}/summarize"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Summary generated and sent to Slack");
    assert_eq!(body["summary"], "One errand.");
    assert_eq!(body["delivered"], true);
    assert!(body.get("deliveryError").is_none());
}

#[tokio::test]
async fn test_summarize_undelivered_still_succeeds() {
    let base = spawn_app(
        Arc::new(InMemoryTaskStore::new()),
        FakeSummarizer::failing(),
        FakeNotifier::failing("status 403: invalid_token"),
    )
    .await;
    let http = reqwest::Client::new();
    create(&http, &base, json!({ "title": "Buy milk" })).await;
    create(&http, &base, json!({ "title": "Ship release", "description": "v2.1" })).await;

    let resp = http
        .post(format!("{base}/summarize"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Summary generated but Slack delivery failed");
    assert_eq!(body["delivered"], false);
    let summary = body["summary"].as_str().unwrap();
    assert!(summary.contains("2 pending"));
    assert!(summary.contains("- Ship release: v2.1"));
    assert!(
        body["deliveryError"]
            .as_str()
            .is_some_and(|e| e.contains("invalid_token"))
    );
}

#[tokio::test]
async fn test_summarize_internal_fault_is_500() {
    let mut broken = common::task("placeholder", "", false);
    broken.title = String::new();
    let base = spawn_app(
        Arc::new(FlakyStore::with_tasks(vec![broken])),
        FakeSummarizer::replying("unused"),
        FakeNotifier::succeeding(),
    )
    .await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/summarize"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Failed to generate summary");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_cors_preflight_and_headers() {
    let base = default_app().await;
    let http = reqwest::Client::new();

    let resp = http
        .request(reqwest::Method::OPTIONS, format!("{base}/todos"))
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        resp.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );

    let resp = http
        .get(format!("{base}/todos"))
        .header("origin", "http://evil.example")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!resp.headers().contains_key("access-control-allow-origin"));
}

#[test]
fn test_latency_millis_saturates() {
    assert_eq!(latency_millis(Duration::from_millis(1_250)), 1_250);
    assert_eq!(latency_millis(Duration::MAX), u64::MAX);
}
