//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notifier_core::types::NotificationId;

use super::category::NotificationCategory;

/// A notification persisted by a store.
///
/// `id` and `created_at` are assigned by the store at creation time and
/// never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient.
    #[sqlx(rename = "user_id")]
    pub owner: String,
    /// Notification category.
    #[sqlx(rename = "type")]
    pub category: NotificationCategory,
    /// Notification body text.
    #[sqlx(rename = "message")]
    pub body: String,
    /// When the store persisted the notification.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Check whether this record falls inside a window starting at `since`.
    ///
    /// The window start is inclusive.
    pub fn is_within(&self, since: DateTime<Utc>) -> bool {
        self.created_at >= since
    }

    /// Check whether this record belongs to the owner+category pair.
    pub fn matches(&self, owner: &str, category: &NotificationCategory) -> bool {
        self.owner == owner && &self.category == category
    }
}
