//! # Error Types
//!
//! Structured error types for report_core. Save failures coming back from the
//! report API are carried separately as [`crate::api::ApiError`], because the
//! editor turns those into a banner instead of propagating them.
//!
//! ## Example
//!
//! ```rust
//! use report_core::errors::{ReportError, ReportResult};
//!
//! fn validate_name(name: &str) -> ReportResult<()> {
//!     if name.is_empty() {
//!         return Err(ReportError::missing_field("name"));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for report_core operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Structured error type for report form operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ReportError {
    /// A field value is invalid (too long, wrong shape, etc.)
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Configuration could not be read or parsed
    #[error("Config error in '{path}': {reason}")]
    Config { path: String, reason: String },

    /// Transport-level HTTP failure (connection, TLS, timeout)
    #[error("HTTP error: {reason}")]
    Http { reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl ReportError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ReportError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        ReportError::MissingField {
            field: field.into(),
        }
    }

    /// Create a Config error
    pub fn config(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ReportError::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ReportError::InvalidInput { .. } => "INVALID_INPUT",
            ReportError::MissingField { .. } => "MISSING_FIELD",
            ReportError::Config { .. } => "CONFIG_ERROR",
            ReportError::Http { .. } => "HTTP_ERROR",
            ReportError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::SerializationError {
            reason: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for ReportError {
    fn from(err: reqwest::Error) -> Self {
        ReportError::Http {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = ReportError::invalid_input("aws_key", "must be at most 100 characters");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: ReportError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ReportError::missing_field("name").error_code(), "MISSING_FIELD");
        assert_eq!(ReportError::config("a.toml", "bad").error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_display_mentions_field() {
        let error = ReportError::missing_field("name");
        assert_eq!(error.to_string(), "Missing required field: name");
    }
}
