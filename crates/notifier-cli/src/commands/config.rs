//! Configuration management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use notifier_core::config::{AppConfig, StoreBackend};
use notifier_core::error::AppError;
use notifier_database::connection::mask_password;
use notifier_entity::QuotaTable;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Validate the configuration file, including quota rules
    Validate,
}

/// Flattened view of the effective configuration.
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigSummary {
    #[tabled(rename = "Listen")]
    pub listen: String,
    #[tabled(rename = "Store")]
    pub store: String,
    #[tabled(rename = "Database")]
    pub database: String,
    #[tabled(rename = "Consistency")]
    pub consistency: String,
    #[tabled(rename = "Categories")]
    pub categories: usize,
}

impl ConfigSummary {
    fn new(config: &AppConfig, quotas: &QuotaTable) -> Self {
        let store = match config.database.backend {
            StoreBackend::Postgres => "postgres",
            StoreBackend::Memory => "memory",
        };
        Self {
            listen: format!("{}:{}", config.server.host, config.server.port),
            store: store.to_string(),
            database: mask_password(&config.database.url),
            consistency: config.admission.consistency.to_string(),
            categories: quotas.len(),
        }
    }
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = super::load_config(config_path)?;
            let quotas = QuotaTable::from_config(&config.quotas)?;
            output::print_item(&ConfigSummary::new(&config, &quotas), format);
        }
        ConfigCommand::Validate => {
            let (config, quotas) = match validate(config_path) {
                Ok(loaded) => loaded,
                Err(e) => {
                    output::print_error(&format!("Configuration invalid: {e}"));
                    return Err(e);
                }
            };

            output::print_success(&format!("Configuration '{config_path}' is valid"));
            let summary = ConfigSummary::new(&config, &quotas);
            output::print_kv("Listen", &summary.listen);
            output::print_kv("Store", &summary.store);
            output::print_kv("Database", &summary.database);
            output::print_kv("Consistency", &summary.consistency);
            output::print_kv("Categories", &summary.categories.to_string());

            if config.database.backend == StoreBackend::Memory {
                output::print_warning("Memory store keeps records only for the process lifetime");
            }
        }
    }

    Ok(())
}

fn validate(config_path: &str) -> Result<(AppConfig, QuotaTable), AppError> {
    let config = super::load_config(config_path)?;
    if config.database.backend == StoreBackend::Postgres && config.database.url.is_empty() {
        return Err(AppError::configuration(
            "database.url must be set for the postgres backend",
        ));
    }
    let quotas = QuotaTable::from_config(&config.quotas)?;
    Ok((config, quotas))
}
