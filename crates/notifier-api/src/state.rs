//! Application state shared across all handlers.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use notifier_core::config::AppConfig;
use notifier_service::AdmissionService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Admission engine.
    pub admission: Arc<AdmissionService>,
    /// Fires when in-flight admissions should stop waiting.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Creates the state with a fresh shutdown token.
    pub fn new(config: Arc<AppConfig>, admission: Arc<AdmissionService>) -> Self {
        Self {
            config,
            admission,
            shutdown: CancellationToken::new(),
        }
    }
}
