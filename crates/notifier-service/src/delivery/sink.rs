//! Delivery sink trait.

use async_trait::async_trait;

use notifier_core::result::AppResult;
use notifier_entity::Notification;

/// Hands a persisted notification to an external channel.
///
/// One attempt per call. An `Err` means the channel did not accept the
/// notification; the caller does not retry.
#[async_trait]
pub trait DeliverySink: Send + Sync + std::fmt::Debug + 'static {
    /// Sink name for logging (e.g. `"log"`, `"email"`).
    fn name(&self) -> &str;

    /// Deliver the notification.
    async fn send(&self, notification: &Notification) -> AppResult<()>;
}
