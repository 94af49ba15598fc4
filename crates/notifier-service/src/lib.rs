//! # notifier-service
//!
//! Business logic service layer for Notifier. The admission engine
//! orchestrates the notification store, the quota table, and a delivery
//! sink to decide whether a notification may be sent.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod admission;
pub mod delivery;

pub use admission::{AdmissionDecision, AdmissionService};
pub use delivery::{DeliverySink, LogSink, RecordingSink};
