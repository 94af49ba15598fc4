//! Inbound notification requests.

use serde::{Deserialize, Serialize};

use super::category::NotificationCategory;

/// A caller's request to notify `owner`.
///
/// `category` is raw caller input and may name a category that does not
/// exist. Owner and body are opaque here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// The recipient.
    pub owner: String,
    /// Requested category name.
    pub category: String,
    /// Notification body text.
    pub body: String,
}

impl NotificationRequest {
    /// Create a new request.
    pub fn new(
        owner: impl Into<String>,
        category: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            category: category.into(),
            body: body.into(),
        }
    }
}

/// A validated notification ready to be persisted.
///
/// Carries no id or timestamp; the store assigns both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    /// The recipient.
    pub owner: String,
    /// Resolved category.
    pub category: NotificationCategory,
    /// Notification body text.
    pub body: String,
}
