//! Outcome of a single admission attempt.

use std::time::Duration;

use notifier_core::error::AppError;
use notifier_core::result::AppResult;
use notifier_entity::{Notification, NotificationCategory};

/// What happened to one send request.
///
/// Every path through the engine ends in exactly one variant. Variants that
/// carry a [`Notification`] mean the record was persisted.
#[derive(Debug, Clone)]
pub enum AdmissionDecision {
    /// Persisted and delivered.
    Admitted(Notification),
    /// The category is not in the quota table. Nothing was touched.
    RejectedInvalidCategory {
        /// Category name as requested.
        category: String,
    },
    /// The window is full. Nothing was persisted or delivered.
    RejectedQuotaExceeded {
        category: NotificationCategory,
        /// Notifications already in the window.
        count: u64,
        max_count: u32,
        window: Duration,
    },
    /// Counting or persisting failed. Nothing was delivered.
    FailedStore(AppError),
    /// Persisted, but the sink did not accept it. The record is kept.
    FailedDispatch {
        notification: Notification,
        error: AppError,
    },
    /// The caller cancelled. `notification` is set when cancellation came
    /// after the record was persisted.
    Cancelled {
        notification: Option<Notification>,
    },
}

impl AdmissionDecision {
    /// Short outcome label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Admitted(_) => "admitted",
            Self::RejectedInvalidCategory { .. } => "invalid_category",
            Self::RejectedQuotaExceeded { .. } => "quota_exceeded",
            Self::FailedStore(_) => "store_error",
            Self::FailedDispatch { .. } => "dispatch_error",
            Self::Cancelled { .. } => "cancelled",
        }
    }

    /// Whether the notification was persisted and delivered.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted(_))
    }

    /// The persisted record, if any.
    pub fn notification(&self) -> Option<&Notification> {
        match self {
            Self::Admitted(notification) | Self::FailedDispatch { notification, .. } => {
                Some(notification)
            }
            Self::Cancelled { notification } => notification.as_ref(),
            _ => None,
        }
    }

    /// Collapse into the caller-facing result.
    pub fn into_result(self) -> AppResult<Notification> {
        match self {
            Self::Admitted(notification) => Ok(notification),
            Self::RejectedInvalidCategory { category } => Err(AppError::invalid_category(
                format!("Unknown notification category '{category}'"),
            )),
            Self::RejectedQuotaExceeded {
                category,
                count,
                max_count,
                window,
            } => Err(AppError::quota_exceeded(format!(
                "Quota exceeded for '{category}': {count} of {max_count} allowed in {}s",
                window.as_secs()
            ))),
            Self::FailedStore(error) => Err(error),
            Self::FailedDispatch { error, .. } => Err(error),
            Self::Cancelled { notification: None } => {
                Err(AppError::cancelled("Admission cancelled before persisting"))
            }
            Self::Cancelled {
                notification: Some(notification),
            } => Err(AppError::cancelled(format!(
                "Admission cancelled after persisting notification {}",
                notification.id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use notifier_core::ErrorKind;
    use notifier_core::types::NotificationId;

    fn record() -> Notification {
        Notification {
            id: NotificationId::new(),
            owner: "u1".to_string(),
            category: NotificationCategory::new("status"),
            body: "hi".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_into_result_kinds() {
        let cases = [
            (
                AdmissionDecision::RejectedInvalidCategory {
                    category: "promo".to_string(),
                },
                ErrorKind::InvalidCategory,
            ),
            (
                AdmissionDecision::RejectedQuotaExceeded {
                    category: NotificationCategory::new("status"),
                    count: 2,
                    max_count: 2,
                    window: Duration::from_secs(60),
                },
                ErrorKind::QuotaExceeded,
            ),
            (
                AdmissionDecision::FailedStore(AppError::store("down")),
                ErrorKind::Store,
            ),
            (
                AdmissionDecision::FailedDispatch {
                    notification: record(),
                    error: AppError::dispatch("refused"),
                },
                ErrorKind::Dispatch,
            ),
            (
                AdmissionDecision::Cancelled { notification: None },
                ErrorKind::Cancelled,
            ),
        ];

        for (decision, kind) in cases {
            let err = decision.into_result().unwrap_err();
            assert_eq!(err.kind, kind);
        }
    }

    #[test]
    fn test_quota_message_names_limit() {
        let err = AdmissionDecision::RejectedQuotaExceeded {
            category: NotificationCategory::new("marketing"),
            count: 3,
            max_count: 3,
            window: Duration::from_secs(3600),
        }
        .into_result()
        .unwrap_err();
        assert_eq!(
            err.message,
            "Quota exceeded for 'marketing': 3 of 3 allowed in 3600s"
        );
    }

    #[test]
    fn test_dispatch_failure_keeps_record() {
        let persisted = record();
        let decision = AdmissionDecision::FailedDispatch {
            notification: persisted.clone(),
            error: AppError::dispatch("refused"),
        };
        assert_eq!(decision.notification(), Some(&persisted));
        assert_eq!(decision.outcome(), "dispatch_error");
        assert!(!decision.is_admitted());
    }
}
