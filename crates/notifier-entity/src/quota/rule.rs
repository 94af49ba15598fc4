//! A single sliding-window quota rule.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use notifier_core::error::AppError;
use notifier_core::result::AppResult;

/// At most `max_count` notifications per trailing `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaRule {
    max_count: u32,
    window: Duration,
    window_delta: TimeDelta,
}

impl QuotaRule {
    /// Create a rule. `max_count` must be at least 1 and `window` non-zero.
    pub fn new(max_count: u32, window: Duration) -> AppResult<Self> {
        if max_count == 0 {
            return Err(AppError::configuration(
                "Quota max_count must be at least 1",
            ));
        }
        if window.is_zero() {
            return Err(AppError::configuration("Quota window must be positive"));
        }
        let window_delta = TimeDelta::from_std(window).map_err(|e| {
            AppError::configuration(format!("Quota window {window:?} is out of range: {e}"))
        })?;

        Ok(Self {
            max_count,
            window,
            window_delta,
        })
    }

    /// Built-in rule with a window in whole seconds. `max_count` is clamped to 1.
    pub(crate) fn fixed(max_count: u32, window_seconds: u32) -> Self {
        let window_seconds = window_seconds.max(1);
        Self {
            max_count: max_count.max(1),
            window: Duration::from_secs(u64::from(window_seconds)),
            window_delta: TimeDelta::seconds(i64::from(window_seconds)),
        }
    }

    /// Maximum admitted notifications per window.
    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    /// Window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Inclusive start of the window ending at `now`.
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.window_delta)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Check whether `count` prior admissions leave no room for another.
    pub fn is_exceeded_by(&self, count: u64) -> bool {
        count >= u64::from(self.max_count)
    }
}
