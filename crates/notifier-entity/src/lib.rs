//! # notifier-entity
//!
//! Domain entity models for Notifier. [`Notification`](notification::Notification)
//! is the persisted table row; requests and quota rules are value objects
//! that never touch the database directly.

pub mod notification;
pub mod quota;

pub use notification::{NewNotification, Notification, NotificationCategory, NotificationRequest};
pub use quota::{QuotaRule, QuotaTable};
