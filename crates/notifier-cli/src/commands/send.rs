//! One-shot send command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use notifier_core::error::AppError;
use notifier_entity::{Notification, NotificationRequest};

/// Arguments for the send command
#[derive(Debug, Args)]
pub struct SendArgs {
    /// Recipient
    #[arg(long)]
    pub owner: String,
    /// Notification category (e.g. status, news, marketing)
    #[arg(long)]
    pub category: String,
    /// Notification body
    #[arg(long)]
    pub body: String,
}

/// A sent notification as printed.
#[derive(Debug, Serialize, Tabled)]
pub struct SentRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Owner")]
    pub owner: String,
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Created")]
    pub created_at: String,
}

impl From<Notification> for SentRow {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            owner: notification.owner,
            category: notification.category.to_string(),
            created_at: notification.created_at.to_rfc3339(),
        }
    }
}

/// Run one admission against the configured store and the log sink.
pub async fn execute(
    args: &SendArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let state = notifier_api::build_state(config).await?;

    let request = NotificationRequest::new(&args.owner, &args.category, &args.body);
    let notification = state.admission.send(&request).await?;

    output::print_success(&format!(
        "Sent {} notification to {}",
        notification.category, notification.owner
    ));
    output::print_item(&SentRow::from(notification), format);
    Ok(())
}
