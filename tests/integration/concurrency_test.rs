//! Integration tests for concurrent admissions on the same owner+category.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use notifier_core::types::Consistency;
use notifier_entity::NotificationRequest;
use notifier_service::AdmissionDecision;

use helpers::TestApp;

const COUNT_LATENCY: Duration = Duration::from_millis(20);

async fn race(app: &TestApp, requests: Vec<NotificationRequest>) -> Vec<AdmissionDecision> {
    let handles = requests.into_iter().map(|request| {
        let admission = Arc::clone(&app.admission);
        tokio::spawn(async move { admission.decide(&request).await })
    });

    join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("admission task panicked"))
        .collect()
}

fn admitted(decisions: &[AdmissionDecision]) -> usize {
    decisions.iter().filter(|d| d.is_admitted()).count()
}

#[tokio::test]
async fn test_best_effort_store_can_over_admit() {
    let app = TestApp::with_count_latency(Consistency::BestEffort, COUNT_LATENCY);
    let requests = vec![NotificationRequest::new("alice", "news", "digest"); 5];

    let decisions = race(&app, requests).await;

    let admitted = admitted(&decisions);
    assert!(admitted > 1, "expected over-admission, got {admitted}");
    assert!(admitted <= 5);
    assert_eq!(app.store.len().await, admitted);
}

#[tokio::test]
async fn test_exact_store_admits_exactly_max() {
    let app = TestApp::with_count_latency(Consistency::Exact, COUNT_LATENCY);
    let requests = vec![NotificationRequest::new("alice", "news", "digest"); 5];

    let decisions = race(&app, requests).await;

    assert_eq!(admitted(&decisions), 1);
    assert_eq!(app.store.len().await, 1);
    assert_eq!(app.sink.delivered().await.len(), 1);
    assert!(decisions.iter().all(|d| matches!(
        d,
        AdmissionDecision::Admitted(_) | AdmissionDecision::RejectedQuotaExceeded { .. }
    )));
}

#[tokio::test]
async fn test_exact_store_admits_max_above_one() {
    let app = TestApp::with_count_latency(Consistency::Exact, COUNT_LATENCY);
    let requests = vec![NotificationRequest::new("alice", "marketing", "sale"); 8];

    let decisions = race(&app, requests).await;

    assert_eq!(admitted(&decisions), 3);
    assert_eq!(app.store.len().await, 3);
}

#[tokio::test]
async fn test_exact_store_does_not_serialize_across_owners() {
    let app = TestApp::with_count_latency(Consistency::Exact, COUNT_LATENCY);
    let requests = ["alice", "bob", "carol"]
        .into_iter()
        .map(|owner| NotificationRequest::new(owner, "news", "digest"))
        .collect();

    let decisions = race(&app, requests).await;

    assert_eq!(admitted(&decisions), 3);
}
