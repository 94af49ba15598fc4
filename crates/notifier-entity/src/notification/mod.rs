//! Notification domain entities.

pub mod category;
pub mod model;
pub mod request;

pub use category::NotificationCategory;
pub use model::Notification;
pub use request::{NewNotification, NotificationRequest};
