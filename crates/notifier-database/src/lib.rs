//! # notifier-database
//!
//! The [`NotificationStore`] contract the admission engine depends on,
//! plus two implementations: [`PgNotificationRepository`] on PostgreSQL
//! and [`MemoryNotificationStore`] for single-process use and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryNotificationStore;
pub use repositories::PgNotificationRepository;
pub use store::{NotificationStore, QuotaCheck};
