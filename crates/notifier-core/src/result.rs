//! Convenience result type alias for Notifier.

use crate::error::AppError;

/// A specialized `Result` type for Notifier operations.
pub type AppResult<T> = Result<T, AppError>;
