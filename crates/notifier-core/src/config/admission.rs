//! Admission engine and quota table configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::Consistency;

/// Admission engine settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Consistency class requested from the store.
    #[serde(default)]
    pub consistency: Consistency,
    /// Per-call store timeout in milliseconds (`0` disables).
    #[serde(default)]
    pub store_timeout_ms: u64,
    /// Per-call sink timeout in milliseconds (`0` disables).
    #[serde(default)]
    pub sink_timeout_ms: u64,
}

impl AdmissionConfig {
    /// Store call timeout, if enabled.
    pub fn store_timeout(&self) -> Option<Duration> {
        (self.store_timeout_ms > 0).then(|| Duration::from_millis(self.store_timeout_ms))
    }

    /// Sink call timeout, if enabled.
    pub fn sink_timeout(&self) -> Option<Duration> {
        (self.sink_timeout_ms > 0).then(|| Duration::from_millis(self.sink_timeout_ms))
    }
}

/// Raw quota rule for one category, as written in configuration.
///
/// Validation (`max_count >= 1`, `window_seconds > 0`) happens when the
/// quota table is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Maximum admitted notifications per window.
    pub max_count: u32,
    /// Window length in seconds.
    pub window_seconds: u64,
}

impl QuotaConfig {
    /// Window length as a [`Duration`].
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }
}
