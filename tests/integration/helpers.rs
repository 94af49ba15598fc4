//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use notifier_api::{AppState, build_app};
use notifier_core::config::AppConfig;
use notifier_core::traits::ManualClock;
use notifier_core::types::Consistency;
use notifier_database::MemoryNotificationStore;
use notifier_entity::{NotificationRequest, QuotaTable};
use notifier_service::{AdmissionService, RecordingSink};

/// Test application context backed by the in-memory store.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Handler state, for reaching the shutdown token
    pub state: AppState,
    /// Admission engine shared with the router
    pub admission: Arc<AdmissionService>,
    /// Store behind the engine
    pub store: MemoryNotificationStore,
    /// Sink behind the engine
    pub sink: RecordingSink,
    /// Clock driving both the engine and the store
    pub clock: ManualClock,
}

impl TestApp {
    /// Default quota table, best-effort store.
    pub fn new() -> Self {
        Self::build(
            AppConfig::default(),
            Consistency::BestEffort,
            None,
        )
    }

    /// Quotas and consistency taken from a TOML document.
    pub fn from_toml(source: &str) -> Self {
        let config = AppConfig::from_toml(source).expect("Failed to parse test config");
        let consistency = config.admission.consistency;
        Self::build(config, consistency, None)
    }

    /// Store that sleeps after each count, widening the check-then-act gap.
    pub fn with_count_latency(consistency: Consistency, latency: Duration) -> Self {
        Self::build(AppConfig::default(), consistency, Some(latency))
    }

    fn build(config: AppConfig, consistency: Consistency, latency: Option<Duration>) -> Self {
        let clock = ManualClock::default();
        let mut store = MemoryNotificationStore::with_clock(Arc::new(clock.clone()), consistency);
        if let Some(latency) = latency {
            store = store.with_count_latency(latency);
        }
        let sink = RecordingSink::new();
        let quotas = QuotaTable::from_config(&config.quotas).expect("Invalid test quotas");

        let admission = Arc::new(AdmissionService::new(
            Arc::new(store.clone()),
            Arc::new(sink.clone()),
            Arc::new(quotas),
            Arc::new(clock.clone()),
        ));
        let state = AppState::new(Arc::new(config), Arc::clone(&admission));
        let router = build_app(state.clone());

        Self {
            router,
            state,
            admission,
            store,
            sink,
            clock,
        }
    }

    /// Send through the engine directly.
    pub async fn send(
        &self,
        owner: &str,
        category: &str,
    ) -> notifier_core::AppResult<notifier_entity::Notification> {
        self.admission
            .send(&NotificationRequest::new(owner, category, "test body"))
            .await
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.raw_request(method, path, body_str).await
    }

    /// Make an HTTP request with a literal body
    pub async fn raw_request(&self, method: &str, path: &str, body: String) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// POST a send request
    pub async fn post_send(&self, user_id: &str, category: &str, message: &str) -> TestResponse {
        self.request(
            "POST",
            "/v1/notifications/send",
            Some(serde_json::json!({
                "user_id": user_id,
                "type": category,
                "message": message,
            })),
        )
        .await
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `error` code of an error body.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
