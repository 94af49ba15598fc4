//! Integration tests for the HTTP surface.

mod helpers;

use axum::http::StatusCode;

use helpers::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let response = app.request("GET", "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_send_returns_created_record() {
    let app = TestApp::new();

    let response = app.post_send("user-1", "status", "build passed").await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["status"], "sent");
    let notification = &response.body["notification"];
    assert_eq!(notification["user_id"], "user-1");
    assert_eq!(notification["type"], "status");
    assert_eq!(notification["message"], "build passed");
    assert!(notification["id"].is_string());
    assert!(notification["created_at"].is_string());
    assert_eq!(app.sink.delivered().await.len(), 1);
}

#[tokio::test]
async fn test_unknown_type_is_bad_request() {
    let app = TestApp::new();

    let response = app.post_send("user-1", "promo", "hello").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_CATEGORY");
    assert_eq!(app.store.count_calls(), 0);
}

#[tokio::test]
async fn test_empty_field_is_bad_request() {
    let app = TestApp::new();

    let response = app.post_send("", "status", "hello").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/v1/notifications/send",
            Some(serde_json::json!({ "user_id": "user-1", "type": "status" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .raw_request("POST", "/v1/notifications/send", "{not json".to_string())
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION");
}

#[tokio::test]
async fn test_quota_exceeded_is_too_many_requests() {
    let app = TestApp::new();

    assert_eq!(app.post_send("user-1", "status", "a").await.status, StatusCode::CREATED);
    assert_eq!(app.post_send("user-1", "status", "b").await.status, StatusCode::CREATED);
    let response = app.post_send("user-1", "status", "c").await;

    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.error_code(), "QUOTA_EXCEEDED");
    assert_eq!(app.store.len().await, 2);
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let app = TestApp::new();
    app.store.fail_creates(true);

    let response = app.post_send("user-1", "news", "digest").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error_code(), "STORE_ERROR");
    assert_eq!(app.sink.attempts(), 0);
}

#[tokio::test]
async fn test_dispatch_failure_is_bad_gateway_with_record() {
    let app = TestApp::new();
    app.sink.set_failing(true);

    let response = app.post_send("user-1", "news", "digest").await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.error_code(), "DISPATCH_ERROR");
    let records = app.store.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(
        response.body["details"]["notification"]["id"],
        records[0].id.to_string()
    );
}

#[tokio::test]
async fn test_cancelled_admission_is_service_unavailable() {
    let app = TestApp::new();
    app.state.shutdown.cancel();

    let response = app.post_send("user-1", "status", "late").await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.error_code(), "CANCELLED");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_lists_quotas() {
    let app = TestApp::new();

    let response = app.request("GET", "/v1/quotas", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["consistency"], "best_effort");
    let quotas = response.body["quotas"].as_array().expect("quotas array");
    assert_eq!(quotas.len(), 3);
    assert_eq!(quotas[0]["type"], "marketing");
    assert_eq!(quotas[0]["max_count"], 3);
    assert_eq!(quotas[0]["window_seconds"], 3600);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new();
    let response = app.request("GET", "/v1/nothing", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
