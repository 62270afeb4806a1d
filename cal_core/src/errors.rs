//! # Error Types
//!
//! Structured error types for cal_core. Every failure in this crate is local
//! and reported through a return value; nothing here aborts the process.
//!
//! Malformed lines in the record file and a missing record file are *not*
//! errors: the store skips the former and treats the latter as empty.
//!
//! ## Example
//!
//! ```rust
//! use cal_core::errors::{CalError, CalResult};
//!
//! fn validate_month(month: u32) -> CalResult<()> {
//!     if !(1..=12).contains(&month) {
//!         return Err(CalError::invalid_input(
//!             "month",
//!             month.to_string(),
//!             "Month must be between 1 and 12",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for cal_core operations
pub type CalResult<T> = Result<T, CalError>;

/// Structured error type for calendar and store operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalError {
    /// An input value is invalid (out of range, unknown name, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A year/month/day triple that does not exist on the calendar
    #[error("Invalid date: {year}-{month}-{day}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },
}

impl CalError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidDate error
    pub fn invalid_date(year: i32, month: u32, day: u32) -> Self {
        CalError::InvalidDate { year, month, day }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the failure came from persisting or loading the record file
    pub fn is_io(&self) -> bool {
        matches!(self, CalError::FileError { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalError::InvalidInput { .. } => "INVALID_INPUT",
            CalError::InvalidDate { .. } => "INVALID_DATE",
            CalError::FileError { .. } => "FILE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalError::file_error("write", "OffdayList.txt", "permission denied");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"FileError\""));
        let roundtrip: CalError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalError::invalid_date(2024, 2, 30).error_code(), "INVALID_DATE");
        assert_eq!(CalError::invalid_input("kind", "9", "unknown").error_code(), "INVALID_INPUT");
        assert_eq!(CalError::file_error("read", "x", "y").error_code(), "FILE_ERROR");
        assert!(CalError::file_error("read", "x", "y").is_io());
        assert!(!CalError::invalid_date(2024, 13, 1).is_io());
    }

    #[test]
    fn test_error_display() {
        let error = CalError::invalid_date(2023, 2, 29);
        assert_eq!(error.to_string(), "Invalid date: 2023-2-29");
    }
}
