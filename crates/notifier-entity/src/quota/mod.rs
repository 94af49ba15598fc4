//! Quota rules and the per-category quota table.

pub mod rule;
pub mod table;

pub use rule::QuotaRule;
pub use table::QuotaTable;
