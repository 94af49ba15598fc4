//! HTTP request handlers.

pub mod health;
pub mod notification;
pub mod quota;
