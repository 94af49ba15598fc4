//! Application builder: wires store, sink, and admission engine into an
//! Axum app and runs it.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::trace::TraceLayer;

use notifier_core::config::{AppConfig, StoreBackend};
use notifier_core::error::AppError;
use notifier_core::traits::{Clock, SystemClock};
use notifier_database::migration::run_migrations;
use notifier_database::{
    DatabasePool, MemoryNotificationStore, NotificationStore, PgNotificationRepository,
};
use notifier_entity::QuotaTable;
use notifier_service::{AdmissionService, LogSink};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state).layer(TraceLayer::new_for_http())
}

/// Opens the configured notification store.
///
/// For PostgreSQL this connects the pool and, when enabled, applies
/// pending migrations.
pub async fn build_store(
    config: &AppConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn NotificationStore>, AppError> {
    let consistency = config.admission.consistency;

    match config.database.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory notification store; records are lost on restart");
            Ok(Arc::new(MemoryNotificationStore::with_clock(
                clock,
                consistency,
            )))
        }
        StoreBackend::Postgres => {
            let db = DatabasePool::connect(&config.database).await?;
            if config.database.run_migrations {
                run_migrations(db.pool()).await?;
            }
            Ok(Arc::new(PgNotificationRepository::new(
                db.into_pool(),
                consistency,
            )))
        }
    }
}

/// Builds the admission engine and handler state from configuration.
pub async fn build_state(config: AppConfig) -> Result<AppState, AppError> {
    let quotas = Arc::new(QuotaTable::from_config(&config.quotas)?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let store = build_store(&config, Arc::clone(&clock)).await?;

    let admission = AdmissionService::new(store, Arc::new(LogSink::new()), quotas, clock)
        .with_timeouts(
            config.admission.store_timeout(),
            config.admission.sink_timeout(),
        );

    tracing::info!(
        backend = ?config.database.backend,
        consistency = %admission.consistency(),
        categories = admission.quotas().len(),
        sink = admission.sink_name(),
        "Admission engine ready"
    );

    Ok(AppState::new(Arc::new(config), Arc::new(admission)))
}

/// Runs the Notifier server with the given configuration.
///
/// On Ctrl+C or SIGTERM the listener stops accepting connections. In-flight
/// admissions get `server.shutdown_grace_seconds` to finish before they
/// are cancelled.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Notifier server...");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = build_state(config).await?;
    let shutdown = state.shutdown.clone();
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Notifier server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!(grace_seconds = grace.as_secs(), "Shutdown requested");
            tokio::spawn(async move {
                tokio::time::sleep(grace).await;
                shutdown.cancel();
            });
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Notifier server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
