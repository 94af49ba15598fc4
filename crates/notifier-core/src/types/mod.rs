//! Core type definitions used across the Notifier workspace.

pub mod consistency;
pub mod id;

pub use consistency::Consistency;
pub use id::NotificationId;
