//! Convenience result type alias for PTQA.

use crate::error::AppError;

/// A specialized `Result` type for PTQA operations.
pub type AppResult<T> = Result<T, AppError>;
