//! Sink that keeps deliveries in memory.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use notifier_core::error::AppError;
use notifier_core::result::AppResult;
use notifier_entity::Notification;

use super::sink::DeliverySink;

/// Records every notification it accepts.
///
/// Can be switched into a failing mode to simulate a channel outage; failed
/// attempts are counted but not recorded. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    delivered: Arc<Mutex<Vec<Notification>>>,
    attempts: Arc<AtomicU64>,
    failing: Arc<AtomicBool>,
}

impl RecordingSink {
    /// Creates an empty sink that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent deliveries fail (`true`) or succeed (`false`).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `send` calls, including failed ones.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Accepted notifications in delivery order.
    pub async fn delivered(&self) -> Vec<Notification> {
        self.delivered.lock().await.clone()
    }
}

#[async_trait]
impl DeliverySink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, notification: &Notification) -> AppResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::dispatch(format!(
                "Channel unavailable for notification {}",
                notification.id
            )));
        }
        self.delivered.lock().await.push(notification.clone());
        Ok(())
    }
}
