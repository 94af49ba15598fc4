//! Immutable category → rule mapping.

use std::collections::{BTreeMap, HashMap};

use notifier_core::config::QuotaConfig;
use notifier_core::error::AppError;
use notifier_core::result::AppResult;

use super::rule::QuotaRule;
use crate::notification::NotificationCategory;

/// The quota table, loaded once at startup and read-only afterwards.
///
/// Its key set is the closed set of valid notification categories.
#[derive(Debug, Clone)]
pub struct QuotaTable {
    rules: HashMap<NotificationCategory, QuotaRule>,
}

impl QuotaTable {
    /// Build a table from `(category, rule)` pairs.
    pub fn new(rules: impl IntoIterator<Item = (NotificationCategory, QuotaRule)>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Built-in table: status 2/minute, news 1/day, marketing 3/hour.
    pub fn defaults() -> Self {
        Self::new([
            (
                NotificationCategory::new(NotificationCategory::STATUS),
                QuotaRule::fixed(2, 60),
            ),
            (
                NotificationCategory::new(NotificationCategory::NEWS),
                QuotaRule::fixed(1, 24 * 60 * 60),
            ),
            (
                NotificationCategory::new(NotificationCategory::MARKETING),
                QuotaRule::fixed(3, 60 * 60),
            ),
        ])
    }

    /// Build a table from configuration. An empty map yields [`Self::defaults`].
    pub fn from_config(quotas: &BTreeMap<String, QuotaConfig>) -> AppResult<Self> {
        if quotas.is_empty() {
            return Ok(Self::defaults());
        }

        let mut rules = HashMap::with_capacity(quotas.len());
        for (name, quota) in quotas {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::configuration("Quota category name is empty"));
            }
            let rule = QuotaRule::new(quota.max_count, quota.window()).map_err(|e| {
                AppError::configuration(format!("Invalid quota for '{name}': {}", e.message))
            })?;
            rules.insert(NotificationCategory::new(name), rule);
        }

        Ok(Self { rules })
    }

    /// Look up a category by name.
    ///
    /// Returns `None` for names outside the configured set.
    pub fn resolve(&self, name: &str) -> Option<(&NotificationCategory, &QuotaRule)> {
        self.rules.get_key_value(name)
    }

    /// Rule for an already-resolved category.
    pub fn rule(&self, category: &NotificationCategory) -> Option<&QuotaRule> {
        self.rules.get(category)
    }

    /// All rules ordered by category name.
    pub fn entries(&self) -> Vec<(&NotificationCategory, &QuotaRule)> {
        let mut entries: Vec<_> = self.rules.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Number of configured categories.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no categories are configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
