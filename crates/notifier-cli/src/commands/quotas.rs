//! Quota table commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use notifier_core::error::AppError;
use notifier_entity::{NotificationCategory, QuotaRule, QuotaTable};

/// Arguments for quota commands
#[derive(Debug, Args)]
pub struct QuotasArgs {
    /// Quota subcommand
    #[command(subcommand)]
    pub command: QuotasCommand,
}

/// Quota subcommands
#[derive(Debug, Subcommand)]
pub enum QuotasCommand {
    /// List the configured quota rules
    List,
}

/// One row of the quota table.
#[derive(Debug, Serialize, Tabled)]
pub struct QuotaRow {
    /// Category name.
    #[tabled(rename = "Category")]
    pub category: String,
    /// Allowed notifications per window.
    #[tabled(rename = "Max")]
    pub max_count: u32,
    /// Window length in seconds.
    #[tabled(rename = "Window (s)")]
    pub window_seconds: u64,
}

impl QuotaRow {
    fn new(category: &NotificationCategory, rule: &QuotaRule) -> Self {
        Self {
            category: category.as_str().to_string(),
            max_count: rule.max_count(),
            window_seconds: rule.window().as_secs(),
        }
    }
}

/// Execute quota commands
pub async fn execute(
    args: &QuotasArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;

    match &args.command {
        QuotasCommand::List => {
            let table = QuotaTable::from_config(&config.quotas)?;
            output::print_list(&rows(&table), format);
        }
    }

    Ok(())
}

fn rows(table: &QuotaTable) -> Vec<QuotaRow> {
    table
        .entries()
        .into_iter()
        .map(|(category, rule)| QuotaRow::new(category, rule))
        .collect()
}
