//! Notification category tag.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

/// Category of a notification (`"status"`, `"news"`, `"marketing"`, ...).
///
/// The set of valid categories is the key set of the configured
/// [`QuotaTable`](crate::quota::QuotaTable); use
/// [`QuotaTable::resolve`](crate::quota::QuotaTable::resolve) to turn caller
/// input into a category. Values read back from the database are trusted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct NotificationCategory(String);

impl NotificationCategory {
    /// Delivery status updates.
    pub const STATUS: &'static str = "status";
    /// Daily news.
    pub const NEWS: &'static str = "news";
    /// Marketing campaigns.
    pub const MARKETING: &'static str = "marketing";

    /// Create a category from a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Return the category as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NotificationCategory {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NotificationCategory {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
