//! Route definitions for the Notifier HTTP API.

use axum::Router;
use axum::routing::{get, post};

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router with all routes.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .nest("/v1", v1_routes())
        .with_state(state)
}

/// Liveness probe.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Versioned API.
fn v1_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications/send",
            post(handlers::notification::send_notification),
        )
        .route("/quotas", get(handlers::quota::list_quotas))
}
