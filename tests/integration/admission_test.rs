//! Integration tests for admission scenarios driven by configured quotas.

mod helpers;

use chrono::TimeDelta;
use notifier_core::ErrorKind;

use helpers::TestApp;

#[tokio::test]
async fn test_status_two_per_minute() {
    let app = TestApp::new();

    assert!(app.send("alice", "status").await.is_ok());
    app.clock.advance(TimeDelta::seconds(20));
    assert!(app.send("alice", "status").await.is_ok());
    app.clock.advance(TimeDelta::seconds(20));
    let err = app.send("alice", "status").await.unwrap_err();
    assert!(err.is(ErrorKind::QuotaExceeded));

    // First send leaves the window at +60s.
    app.clock.advance(TimeDelta::seconds(20) + TimeDelta::nanoseconds(1));
    assert!(app.send("alice", "status").await.is_ok());
    let err = app.send("alice", "status").await.unwrap_err();
    assert!(err.is(ErrorKind::QuotaExceeded));
}

#[tokio::test]
async fn test_news_one_per_day() {
    let app = TestApp::new();

    assert!(app.send("alice", "news").await.is_ok());
    app.clock.advance(TimeDelta::hours(23));
    assert!(app.send("alice", "news").await.is_err());
    app.clock.advance(TimeDelta::hours(1) + TimeDelta::seconds(1));
    assert!(app.send("alice", "news").await.is_ok());
}

#[tokio::test]
async fn test_marketing_three_per_hour() {
    let app = TestApp::new();

    for _ in 0..3 {
        assert!(app.send("alice", "marketing").await.is_ok());
        app.clock.advance(TimeDelta::minutes(5));
    }
    assert!(app.send("alice", "marketing").await.is_err());
    assert_eq!(app.sink.delivered().await.len(), 3);
}

#[tokio::test]
async fn test_categories_and_owners_are_independent() {
    let app = TestApp::new();

    assert!(app.send("alice", "news").await.is_ok());
    assert!(app.send("alice", "news").await.is_err());

    assert!(app.send("bob", "news").await.is_ok());
    assert!(app.send("alice", "status").await.is_ok());
    assert!(app.send("alice", "marketing").await.is_ok());
}

#[tokio::test]
async fn test_configured_quota_replaces_defaults() {
    let app = TestApp::from_toml(
        r#"
        [quotas.digest]
        max_count = 1
        window_seconds = 604800
        "#,
    );

    assert!(app.send("alice", "digest").await.is_ok());
    app.clock.advance(TimeDelta::days(6));
    assert!(app.send("alice", "digest").await.is_err());

    let err = app.send("alice", "status").await.unwrap_err();
    assert!(err.is(ErrorKind::InvalidCategory));
}

#[tokio::test]
async fn test_rejections_do_not_consume_quota() {
    let app = TestApp::new();

    assert!(app.send("alice", "news").await.is_ok());
    for _ in 0..5 {
        assert!(app.send("alice", "news").await.is_err());
    }

    assert_eq!(app.store.len().await, 1);
    app.clock.advance(TimeDelta::days(1) + TimeDelta::seconds(1));
    assert!(app.send("alice", "news").await.is_ok());
}

#[tokio::test]
async fn test_failed_dispatch_still_counts() {
    let app = TestApp::new();

    app.sink.set_failing(true);
    let err = app.send("alice", "news").await.unwrap_err();
    assert!(err.is(ErrorKind::Dispatch));

    app.sink.set_failing(false);
    let err = app.send("alice", "news").await.unwrap_err();
    assert!(err.is(ErrorKind::QuotaExceeded));
}
