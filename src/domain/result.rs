//! Result type alias for Pagex
//!
//! This module provides a convenient Result type alias that uses PagexError
//! as the error type.

use super::errors::PagexError;

/// Result type alias for Pagex operations
///
/// # Examples
///
/// ```
/// use pagex::domain::result::Result;
/// use pagex::domain::errors::PagexError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(PagexError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, PagexError>;
