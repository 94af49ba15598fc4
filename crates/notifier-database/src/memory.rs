//! In-memory notification store.
//!
//! Reference implementation of [`NotificationStore`] for single-process
//! deployments and tests. Records live in a `tokio::sync::RwLock<Vec<_>>`;
//! in [`Consistency::Exact`] mode, quota-guarded creates are serialized
//! per owner+category with a map of per-key mutexes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use notifier_core::error::AppError;
use notifier_core::result::AppResult;
use notifier_core::traits::{Clock, SystemClock};
use notifier_core::types::{Consistency, NotificationId};
use notifier_entity::{NewNotification, Notification, NotificationCategory, QuotaRule};

use crate::store::{NotificationStore, QuotaCheck, count_then_create};

type KeyLocks = DashMap<(String, NotificationCategory), Arc<Mutex<()>>>;

/// Shared state behind the cloneable store handle.
#[derive(Debug)]
struct Inner {
    /// Persisted notifications in creation order.
    records: RwLock<Vec<Notification>>,
    /// Source of `created_at`.
    clock: Arc<dyn Clock>,
    /// Guarantee for `create_within_quota`.
    consistency: Consistency,
    /// Per owner+category admission locks (exact mode only).
    key_locks: KeyLocks,
    /// Simulated latency inside `count_since`, after the count is taken.
    count_latency: Option<Duration>,
    /// Number of `count_since` calls.
    count_calls: AtomicU64,
    /// Number of `create` calls.
    create_calls: AtomicU64,
    /// Fail every `count_since` call.
    fail_counts: AtomicBool,
    /// Fail every `create` call.
    fail_creates: AtomicBool,
}

/// In-memory [`NotificationStore`].
///
/// Clones share the same records.
#[derive(Debug, Clone)]
pub struct MemoryNotificationStore {
    inner: Arc<Inner>,
}

impl MemoryNotificationStore {
    /// Create a best-effort store on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()), Consistency::BestEffort)
    }

    /// Create a store with an explicit clock and consistency mode.
    pub fn with_clock(clock: Arc<dyn Clock>, consistency: Consistency) -> Self {
        Self {
            inner: Arc::new(Inner {
                records: RwLock::new(Vec::new()),
                clock,
                consistency,
                key_locks: DashMap::new(),
                count_latency: None,
                count_calls: AtomicU64::new(0),
                create_calls: AtomicU64::new(0),
                fail_counts: AtomicBool::new(false),
                fail_creates: AtomicBool::new(false),
            }),
        }
    }

    /// Sleep for `latency` after taking each count, before returning it.
    ///
    /// Widens the gap between count and create so concurrent admissions
    /// interleave deterministically. Must be called before cloning.
    pub fn with_count_latency(mut self, latency: Duration) -> Self {
        if let Some(inner) = Arc::get_mut(&mut self.inner) {
            inner.count_latency = Some(latency);
        }
        self
    }

    /// Make every `count_since` call fail.
    pub fn fail_counts(&self, fail: bool) {
        self.inner.fail_counts.store(fail, Ordering::SeqCst);
    }

    /// Make every `create` call fail.
    pub fn fail_creates(&self, fail: bool) {
        self.inner.fail_creates.store(fail, Ordering::SeqCst);
    }

    /// Number of `count_since` calls so far.
    pub fn count_calls(&self) -> u64 {
        self.inner.count_calls.load(Ordering::SeqCst)
    }

    /// Number of `create` calls so far.
    pub fn create_calls(&self) -> u64 {
        self.inner.create_calls.load(Ordering::SeqCst)
    }

    /// Snapshot of all persisted notifications.
    pub async fn records(&self) -> Vec<Notification> {
        self.inner.records.read().await.clone()
    }

    /// Number of persisted notifications.
    pub async fn len(&self) -> usize {
        self.inner.records.read().await.len()
    }

    /// Whether nothing has been persisted.
    pub async fn is_empty(&self) -> bool {
        self.inner.records.read().await.is_empty()
    }

    /// Insert a record with an explicit timestamp, bypassing the clock.
    pub async fn insert_at(
        &self,
        notification: &NewNotification,
        created_at: DateTime<Utc>,
    ) -> Notification {
        let record = Notification {
            id: NotificationId::new(),
            owner: notification.owner.clone(),
            category: notification.category.clone(),
            body: notification.body.clone(),
            created_at,
        };
        self.inner.records.write().await.push(record.clone());
        record
    }

    fn key_lock(&self, owner: &str, category: &NotificationCategory) -> KeyLock<'_> {
        let key = (owner.to_string(), category.clone());
        let lock = self
            .inner
            .key_locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        KeyLock {
            locks: &self.inner.key_locks,
            key,
            lock,
        }
    }
}

/// Handle on one owner+category admission lock.
///
/// Dropping the last handle removes the map entry, including when the
/// owning future is dropped mid-admission.
struct KeyLock<'a> {
    locks: &'a KeyLocks,
    key: (String, NotificationCategory),
    lock: Arc<Mutex<()>>,
}

impl Drop for KeyLock<'_> {
    fn drop(&mut self) {
        // Two references left: the map's and ours.
        self.locks
            .remove_if(&self.key, |_, held| {
                Arc::ptr_eq(held, &self.lock) && Arc::strong_count(held) == 2
            });
    }
}

impl Default for MemoryNotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    fn consistency(&self) -> Consistency {
        self.inner.consistency
    }

    async fn count_since(
        &self,
        owner: &str,
        category: &NotificationCategory,
        since: DateTime<Utc>,
    ) -> AppResult<u64> {
        self.inner.count_calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_counts.load(Ordering::SeqCst) {
            return Err(AppError::store("Memory store count failure (injected)"));
        }

        let count = self
            .inner
            .records
            .read()
            .await
            .iter()
            .filter(|n| n.matches(owner, category) && n.is_within(since))
            .count() as u64;

        if let Some(latency) = self.inner.count_latency {
            tokio::time::sleep(latency).await;
        }

        Ok(count)
    }

    async fn create(&self, notification: &NewNotification) -> AppResult<Notification> {
        self.inner.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_creates.load(Ordering::SeqCst) {
            return Err(AppError::store("Memory store create failure (injected)"));
        }

        let mut records = self.inner.records.write().await;
        let record = Notification {
            id: NotificationId::new(),
            owner: notification.owner.clone(),
            category: notification.category.clone(),
            body: notification.body.clone(),
            created_at: self.inner.clock.now(),
        };
        records.push(record.clone());

        debug!(
            id = %record.id,
            owner = %record.owner,
            category = %record.category,
            "Notification stored in memory"
        );
        Ok(record)
    }

    async fn create_within_quota(
        &self,
        notification: &NewNotification,
        since: DateTime<Utc>,
        rule: &QuotaRule,
    ) -> AppResult<QuotaCheck> {
        if self.inner.consistency == Consistency::BestEffort {
            return count_then_create(self, notification, since, rule).await;
        }

        let key_lock = self.key_lock(&notification.owner, &notification.category);
        let _guard = key_lock.lock.lock().await;
        count_then_create(self, notification, since, rule).await
    }
}
