//! Consistency class offered by a notification store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Guarantee a store gives for concurrent admissions of the same
/// owner+category pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consistency {
    /// Count and create are separate steps. Concurrent requests for the same
    /// key can all observe a count below the limit, so up to
    /// `racers - 1` extra notifications may be admitted per window.
    #[default]
    BestEffort,
    /// Count and create are serialized per owner+category key. Exactly
    /// `max_count` notifications are admitted per window.
    Exact,
}

impl Consistency {
    /// Return the mode as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BestEffort => "best_effort",
            Self::Exact => "exact",
        }
    }
}

impl fmt::Display for Consistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
