//! CLI command definitions and dispatch.

pub mod config;
pub mod migrate;
pub mod quotas;
pub mod send;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use notifier_core::config::AppConfig;
use notifier_core::error::AppError;

/// Notifier: per-category notification admission control
#[derive(Debug, Parser)]
#[command(name = "notifier", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve,
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Inspect the quota table
    Quotas(quotas::QuotasArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Send one notification through the admission engine
    Send(send::SendArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve => serve::execute(&self.config).await,
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
            Commands::Quotas(args) => quotas::execute(args, &self.config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
            Commands::Send(args) => send::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load_file(config_path)
}
