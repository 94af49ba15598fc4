//! Sink that writes deliveries to the log.

use async_trait::async_trait;
use tracing::info;

use notifier_core::result::AppResult;
use notifier_entity::Notification;

use super::sink::DeliverySink;

/// Logs each notification and always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl LogSink {
    /// Creates a new log sink.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DeliverySink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, notification: &Notification) -> AppResult<()> {
        info!(
            id = %notification.id,
            owner = %notification.owner,
            category = %notification.category,
            body = %notification.body,
            "Sending {} notification to {}",
            notification.category,
            notification.owner
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use notifier_core::types::NotificationId;
    use notifier_entity::NotificationCategory;

    #[tokio::test]
    async fn test_log_sink_always_succeeds() {
        let notification = Notification {
            id: NotificationId::new(),
            owner: "u1".to_string(),
            category: NotificationCategory::new("status"),
            body: "hello".to_string(),
            created_at: Utc::now(),
        };
        let sink = LogSink::new();
        assert_eq!(sink.name(), "log");
        assert!(sink.send(&notification).await.is_ok());
    }
}
