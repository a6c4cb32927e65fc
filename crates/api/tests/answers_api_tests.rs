use std::sync::Arc;

use answers_api::create_app;
use answers_core::{
    config::ApiConfig, Answer, AnswerEvent, AnswerEventRepository, AnswerEventType,
    QueueAttributes,
};
use answers_domain::new_answer_service;
use answers_infrastructure::{InMemoryAnswerRepository, QueuePublisher};
use answers_testing_utils::{RecordingEventRepository, RecordingQueueApi};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    queue_api: Arc<RecordingQueueApi>,
    events: RecordingEventRepository,
}

fn test_app() -> TestApp {
    let queue_api = Arc::new(RecordingQueueApi::new());
    let events = RecordingEventRepository::new();
    let service = new_answer_service(
        Arc::new(InMemoryAnswerRepository::new()),
        Arc::new(events.clone()),
        Arc::new(QueuePublisher::new(queue_api.clone(), QueueAttributes::default())),
        "answer-events",
    );

    TestApp {
        router: create_app(service, &ApiConfig::default()),
        queue_api,
        events,
    }
}

async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app();
    let (status, body) = call(&app.router, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_then_get_answer() {
    let app = test_app();

    let (status, body) = call(
        &app.router,
        Method::POST,
        "/api/answers",
        Some(json!({"key": "a", "value": "1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!({"key": "a", "value": "1"}));
    assert_eq!(app.queue_api.sent_messages().len(), 1);

    let (status, body) = call(&app.router, Method::GET, "/api/answers/a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["value"], "1");
}

#[tokio::test]
async fn test_duplicate_create_is_conflict() {
    let app = test_app();
    let payload = json!({"key": "a", "value": "1"});

    call(&app.router, Method::POST, "/api/answers", Some(payload.clone())).await;
    let (status, body) = call(&app.router, Method::POST, "/api/answers", Some(payload)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["kind"], "ALREADY_EXISTS");
    assert_eq!(
        body["error"]["message"],
        "Answer with the provided key is already in use"
    );
}

#[tokio::test]
async fn test_invalid_payloads_are_bad_request() {
    let app = test_app();

    let (status, body) = call(
        &app.router,
        Method::POST,
        "/api/answers",
        Some(json!({"key": "a", "value": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Value required");

    let (status, body) = call(
        &app.router,
        Method::POST,
        "/api/answers",
        Some(json!({"key": "a"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "INVALID_ARGUMENT");
    assert!(app.queue_api.sent_messages().is_empty());
}

#[tokio::test]
async fn test_update_and_delete_flow() {
    let app = test_app();

    let (status, _) = call(
        &app.router,
        Method::PUT,
        "/api/answers/a",
        Some(json!({"value": "2"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    call(
        &app.router,
        Method::POST,
        "/api/answers",
        Some(json!({"key": "a", "value": "1"})),
    )
    .await;

    let (status, body) = call(
        &app.router,
        Method::PUT,
        "/api/answers/a",
        Some(json!({"value": "2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["value"], "2");

    let (status, body) = call(&app.router, Method::DELETE, "/api/answers/a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Answer a deleted");

    let (status, body) = call(&app.router, Method::GET, "/api/answers/a", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Answer not found");

    assert_eq!(app.queue_api.sent_messages().len(), 3);
}

#[tokio::test]
async fn test_history_lists_recorded_events() {
    let app = test_app();
    app.events
        .create(&AnswerEvent::new(AnswerEventType::Create, Answer::new("a", "1")))
        .await
        .unwrap();
    app.events
        .create(&AnswerEvent::new(AnswerEventType::Update, Answer::new("a", "2")))
        .await
        .unwrap();

    let (status, body) = call(&app.router, Method::GET, "/api/answers/a/history", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([
            {"eventType": "create", "data": {"key": "a", "value": "1"}},
            {"eventType": "update", "data": {"key": "a", "value": "2"}}
        ])
    );
}

#[tokio::test]
async fn test_publish_failure_is_internal_error() {
    let app = test_app();
    app.queue_api.fail_send_message("queue unavailable");

    let (status, body) = call(
        &app.router,
        Method::POST,
        "/api/answers",
        Some(json!({"key": "a", "value": "1"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["kind"], "UNKNOWN");

    // 写入已提交，事件发布失败不回滚
    let (status, _) = call(&app.router, Method::GET, "/api/answers/a", None).await;
    assert_eq!(status, StatusCode::OK);
}
