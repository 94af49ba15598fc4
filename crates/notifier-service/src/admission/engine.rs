//! Admission policy engine.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use notifier_core::error::{AppError, ErrorKind};
use notifier_core::result::AppResult;
use notifier_core::traits::Clock;
use notifier_core::types::Consistency;
use notifier_database::{NotificationStore, QuotaCheck};
use notifier_entity::{NewNotification, Notification, NotificationRequest, QuotaTable};

use super::decision::AdmissionDecision;
use crate::delivery::DeliverySink;

/// Why a guarded collaborator call did not complete.
#[derive(Debug, Clone, Copy)]
enum Interrupted {
    Cancelled,
    TimedOut(Duration),
}

/// Decides whether a notification may be sent, then persists and
/// dispatches it.
///
/// Holds no mutable state. How tightly concurrent requests for the same
/// owner+category are serialized is up to the store; see
/// [`AdmissionService::consistency`].
#[derive(Debug, Clone)]
pub struct AdmissionService {
    /// Notification store.
    store: Arc<dyn NotificationStore>,
    /// Delivery channel.
    sink: Arc<dyn DeliverySink>,
    /// Category quotas.
    quotas: Arc<QuotaTable>,
    /// Time source for window starts.
    clock: Arc<dyn Clock>,
    /// Upper bound on the store call, if any.
    store_timeout: Option<Duration>,
    /// Upper bound on the sink call, if any.
    sink_timeout: Option<Duration>,
}

impl AdmissionService {
    /// Creates a new admission service without call timeouts.
    pub fn new(
        store: Arc<dyn NotificationStore>,
        sink: Arc<dyn DeliverySink>,
        quotas: Arc<QuotaTable>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            sink,
            quotas,
            clock,
            store_timeout: None,
            sink_timeout: None,
        }
    }

    /// Bounds the store and sink calls. `None` leaves a call unbounded.
    pub fn with_timeouts(
        mut self,
        store_timeout: Option<Duration>,
        sink_timeout: Option<Duration>,
    ) -> Self {
        self.store_timeout = store_timeout;
        self.sink_timeout = sink_timeout;
        self
    }

    /// Guarantee the configured store gives under concurrent requests.
    pub fn consistency(&self) -> Consistency {
        self.store.consistency()
    }

    /// The quota table in force.
    pub fn quotas(&self) -> &QuotaTable {
        &self.quotas
    }

    /// Name of the configured delivery sink.
    pub fn sink_name(&self) -> &str {
        self.sink.name()
    }

    /// Admits, persists, and dispatches a notification.
    pub async fn send(&self, request: &NotificationRequest) -> AppResult<Notification> {
        self.decide(request).await.into_result()
    }

    /// Like [`send`](Self::send), aborting when `cancel` fires.
    pub async fn send_with_cancel(
        &self,
        request: &NotificationRequest,
        cancel: &CancellationToken,
    ) -> AppResult<Notification> {
        self.decide_with_cancel(request, cancel).await.into_result()
    }

    /// Runs the admission sequence and reports the full decision.
    pub async fn decide(&self, request: &NotificationRequest) -> AdmissionDecision {
        self.decide_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Runs the admission sequence, aborting when `cancel` fires.
    ///
    /// Cancellation before the store call leaves nothing persisted.
    /// Cancellation while the store call is in flight drops that call, so
    /// whether the record landed is up to the store. Cancellation after
    /// the record is persisted leaves it persisted but undelivered.
    #[instrument(
        skip(self, request, cancel),
        fields(owner = %request.owner, category = %request.category)
    )]
    pub async fn decide_with_cancel(
        &self,
        request: &NotificationRequest,
        cancel: &CancellationToken,
    ) -> AdmissionDecision {
        let Some((category, rule)) = self.quotas.resolve(&request.category) else {
            warn!("Rejected notification with unknown category");
            return AdmissionDecision::RejectedInvalidCategory {
                category: request.category.clone(),
            };
        };

        let rule = *rule;
        let notification = NewNotification {
            owner: request.owner.clone(),
            category: category.clone(),
            body: request.body.clone(),
        };
        let since = rule.window_start(self.clock.now());

        let attempt = guarded(
            cancel,
            self.store_timeout,
            self.store.create_within_quota(&notification, since, &rule),
        )
        .await;

        let record = match attempt {
            Ok(Ok(QuotaCheck::Created(record))) => record,
            Ok(Ok(QuotaCheck::Exceeded { count })) => {
                warn!(
                    count,
                    max_count = rule.max_count(),
                    window_seconds = rule.window().as_secs(),
                    "Notification quota exceeded"
                );
                return AdmissionDecision::RejectedQuotaExceeded {
                    category: notification.category,
                    count,
                    max_count: rule.max_count(),
                    window: rule.window(),
                };
            }
            Ok(Err(e)) => {
                let e = e.tagged(ErrorKind::Store, "Failed to admit notification");
                error!(error = %e, "Notification store failed");
                return AdmissionDecision::FailedStore(e);
            }
            Err(Interrupted::Cancelled) => {
                info!("Admission cancelled before the notification was persisted");
                return AdmissionDecision::Cancelled { notification: None };
            }
            Err(Interrupted::TimedOut(limit)) => {
                let e = AppError::store(format!(
                    "Notification store did not answer within {}ms",
                    limit.as_millis()
                ));
                error!(error = %e, "Notification store timed out");
                return AdmissionDecision::FailedStore(e);
            }
        };

        let delivery = guarded(cancel, self.sink_timeout, self.sink.send(&record)).await;

        match delivery {
            Ok(Ok(())) => {
                info!(
                    id = %record.id,
                    sink = self.sink.name(),
                    "Notification sent"
                );
                AdmissionDecision::Admitted(record)
            }
            Ok(Err(e)) => {
                let e = e.tagged(ErrorKind::Dispatch, "Failed to deliver notification");
                error!(id = %record.id, error = %e, "Notification persisted but not delivered");
                AdmissionDecision::FailedDispatch {
                    notification: record,
                    error: e,
                }
            }
            Err(Interrupted::Cancelled) => {
                info!(id = %record.id, "Admission cancelled before dispatch");
                AdmissionDecision::Cancelled {
                    notification: Some(record),
                }
            }
            Err(Interrupted::TimedOut(limit)) => {
                let e = AppError::dispatch(format!(
                    "Sink '{}' did not answer within {}ms",
                    self.sink.name(),
                    limit.as_millis()
                ));
                error!(id = %record.id, error = %e, "Notification persisted but not delivered");
                AdmissionDecision::FailedDispatch {
                    notification: record,
                    error: e,
                }
            }
        }
    }
}

/// Runs one collaborator call unless `cancel` fires first or `limit` elapses.
async fn guarded<F, T>(
    cancel: &CancellationToken,
    limit: Option<Duration>,
    call: F,
) -> Result<T, Interrupted>
where
    F: Future<Output = T>,
{
    if cancel.is_cancelled() {
        return Err(Interrupted::Cancelled);
    }

    let bounded = async move {
        match limit {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| Interrupted::TimedOut(limit)),
            None => Ok(call.await),
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Interrupted::Cancelled),
        result = bounded => result,
    }
}
