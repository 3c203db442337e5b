//! Convenience result type alias for PrintQ.

use crate::error::AppError;

/// A specialized `Result` type for PrintQ operations.
pub type AppResult<T> = Result<T, AppError>;
