//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use notifier_core::types::NotificationId;
use notifier_entity::{Notification, NotificationCategory, QuotaRule};

/// A persisted notification on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    /// Notification ID.
    pub id: NotificationId,
    /// Recipient.
    pub user_id: String,
    /// Category.
    #[serde(rename = "type")]
    pub category: String,
    /// Body text.
    pub message: String,
    /// When it was persisted.
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            user_id: notification.owner,
            category: notification.category.as_str().to_string(),
            message: notification.body,
            created_at: notification.created_at,
        }
    }
}

/// Response to a successful send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendNotificationResponse {
    /// Always `"sent"`.
    pub status: String,
    /// The persisted notification.
    pub notification: NotificationResponse,
}

impl SendNotificationResponse {
    /// Wraps a delivered notification.
    pub fn sent(notification: Notification) -> Self {
        Self {
            status: "sent".to_string(),
            notification: notification.into(),
        }
    }
}

/// One quota rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaResponse {
    /// Category name.
    #[serde(rename = "type")]
    pub category: String,
    /// Notifications allowed per window.
    pub max_count: u32,
    /// Window length in seconds.
    pub window_seconds: u64,
}

impl QuotaResponse {
    /// Builds a response entry from a table row.
    pub fn new(category: &NotificationCategory, rule: &QuotaRule) -> Self {
        Self {
            category: category.as_str().to_string(),
            max_count: rule.max_count(),
            window_seconds: rule.window().as_secs(),
        }
    }
}

/// The quota table and the guarantee the store gives under concurrency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaListResponse {
    /// `"best_effort"` or `"exact"`.
    pub consistency: String,
    /// Rules ordered by category.
    pub quotas: Vec<QuotaResponse>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status string.
    pub status: String,
    /// Crate version.
    pub version: String,
}
