//! # notifier-api
//!
//! HTTP API layer for Notifier built on Axum.
//!
//! Provides the send endpoint, quota and health endpoints, DTOs, error
//! mapping, and the server bootstrap that wires a store, a sink, and the
//! admission engine together from configuration.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use error::ApiError;
pub use state::AppState;
