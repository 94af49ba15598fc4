//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use notifier_entity::NotificationRequest;

/// Send notification request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendNotificationRequest {
    /// Recipient.
    #[validate(length(min = 1, message = "user_id is required"))]
    pub user_id: String,
    /// Notification category.
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type is required"))]
    pub category: String,
    /// Body text.
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
}

impl From<SendNotificationRequest> for NotificationRequest {
    fn from(body: SendNotificationRequest) -> Self {
        NotificationRequest::new(body.user_id, body.category, body.message)
    }
}
