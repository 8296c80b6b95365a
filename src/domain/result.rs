//! Result type alias for Strata operations.

use super::errors::StrataError;

/// Result type alias that uses [`StrataError`] as the error type.
///
/// # Examples
///
/// ```
/// use strata::domain::{Result, StrataError};
///
/// fn require(value: &str) -> Result<()> {
///     if value.is_empty() {
///         return Err(StrataError::Validation("value must not be empty".to_string()));
///     }
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, StrataError>;
