//! Notification store contract.
//!
//! The admission engine only needs to count recent notifications for an
//! owner+category pair and persist new ones. Stores decide how strongly the
//! two steps are tied together; see [`Consistency`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use notifier_core::result::AppResult;
use notifier_core::types::Consistency;
use notifier_entity::{NewNotification, Notification, NotificationCategory, QuotaRule};

/// Outcome of a quota-guarded create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaCheck {
    /// The window had room; the notification was persisted.
    Created(Notification),
    /// The window was full; nothing was persisted.
    Exceeded {
        /// Notifications already in the window.
        count: u64,
    },
}

/// Durable record of sent notifications.
///
/// Errors from any method are store failures; callers do not retry.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Guarantee this store gives for concurrent [`create_within_quota`]
    /// calls on the same owner+category.
    ///
    /// [`create_within_quota`]: NotificationStore::create_within_quota
    fn consistency(&self) -> Consistency {
        Consistency::BestEffort
    }

    /// Count notifications for `owner` + `category` with
    /// `created_at >= since`.
    ///
    /// Reflects every create committed before the call began.
    async fn count_since(
        &self,
        owner: &str,
        category: &NotificationCategory,
        since: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Persist a notification, assigning its id and `created_at`.
    ///
    /// The record is visible to `count_since` once this returns.
    async fn create(&self, notification: &NewNotification) -> AppResult<Notification>;

    /// Count, compare against `rule`, and create if the window has room.
    ///
    /// The provided implementation runs the two steps independently
    /// ([`Consistency::BestEffort`]). Stores reporting
    /// [`Consistency::Exact`] override it and serialize per key.
    async fn create_within_quota(
        &self,
        notification: &NewNotification,
        since: DateTime<Utc>,
        rule: &QuotaRule,
    ) -> AppResult<QuotaCheck> {
        count_then_create(self, notification, since, rule).await
    }
}

/// Unsynchronized count → compare → create.
pub async fn count_then_create<S>(
    store: &S,
    notification: &NewNotification,
    since: DateTime<Utc>,
    rule: &QuotaRule,
) -> AppResult<QuotaCheck>
where
    S: NotificationStore + ?Sized,
{
    let count = store
        .count_since(&notification.owner, &notification.category, since)
        .await?;

    if rule.is_exceeded_by(count) {
        return Ok(QuotaCheck::Exceeded { count });
    }

    store.create(notification).await.map(QuotaCheck::Created)
}
