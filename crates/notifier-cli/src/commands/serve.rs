//! Server command.

use notifier_core::error::AppError;

/// Load configuration and run the HTTP server until Ctrl+C.
pub async fn execute(config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    notifier_api::run_server(config).await
}
