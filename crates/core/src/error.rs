//! Error types for the Sentinel console
//!
//! This module provides the error type shared by every crate in the
//! workspace: validation failures, local storage problems and configuration
//! mistakes. HTTP and identity failures have their own
//! types in `sentinel_client` and convert into this one at the UI boundary.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the console
#[derive(Debug, Error)]
pub enum ConsoleError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required form field was left empty
    #[error("{label} is required")]
    FieldRequired { field: String, label: String },

    /// A form field holds a value of the wrong shape
    #[error("{label} {message}")]
    FieldInvalid {
        field: String,
        label: String,
        message: String,
    },

    /// Session expiration is missing, malformed or not in the future
    #[error("Invalid session expiration: {0}")]
    InvalidExpiration(String),

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    /// Unknown resource segment or kind
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// Record has no usable identifier
    #[error("Record of '{0}' has no identifier")]
    MissingIdentifier(String),

    /// Endpoint shape not offered for this resource
    #[error("'{resource}' cannot be reached {scope}")]
    UnsupportedScope { resource: String, scope: String },

    // ========================================================================
    // Storage Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Local store read error
    #[error("Failed to read local store '{path}': {message}")]
    StoreRead { path: PathBuf, message: String },

    /// Local store write error
    #[error("Failed to write local store '{path}': {message}")]
    StoreWrite { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// Record could not be converted into the typed entity
    #[error("Invalid '{resource}' record: {message}")]
    InvalidRecord { resource: String, message: String },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConsoleError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        ConsoleError::Validation(msg.into())
    }

    /// Create a required-field error
    pub fn field_required(field: impl Into<String>, label: impl Into<String>) -> Self {
        ConsoleError::FieldRequired {
            field: field.into(),
            label: label.into(),
        }
    }

    /// Create an invalid-field error
    pub fn field_invalid(
        field: impl Into<String>,
        label: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        ConsoleError::FieldInvalid {
            field: field.into(),
            label: label.into(),
            message: msg.into(),
        }
    }

    /// Create an invalid record error
    pub fn invalid_record(resource: impl Into<String>, msg: impl Into<String>) -> Self {
        ConsoleError::InvalidRecord {
            resource: resource.into(),
            message: msg.into(),
        }
    }

    /// Create an unsupported-scope error
    pub fn unsupported_scope(resource: impl Into<String>, scope: impl Into<String>) -> Self {
        ConsoleError::UnsupportedScope {
            resource: resource.into(),
            scope: scope.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        ConsoleError::InvalidConfig(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        ConsoleError::Internal(msg.into())
    }

    /// Field name this error is scoped to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            ConsoleError::FieldRequired { field, .. } | ConsoleError::FieldInvalid { field, .. } => {
                Some(field)
            }
            _ => None,
        }
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConsoleError::Validation(_)
                | ConsoleError::FieldRequired { .. }
                | ConsoleError::FieldInvalid { .. }
                | ConsoleError::InvalidExpiration(_)
        )
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ConsoleError::UnknownResource(_)
                | ConsoleError::MissingIdentifier(_)
                | ConsoleError::UnsupportedScope { .. }
        )
    }
}

/// Result type alias using ConsoleError
pub type ConsoleResult<T> = Result<T, ConsoleError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = ConsoleError::validation("Name is required");
        assert!(err.is_validation());
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Validation error: Name is required");
    }

    #[test]
    fn test_field_required_error() {
        let err = ConsoleError::field_required("email", "Email");
        assert!(err.is_validation());
        assert_eq!(err.field(), Some("email"));
        assert_eq!(err.to_string(), "Email is required");
    }

    #[test]
    fn test_field_invalid_error() {
        let err = ConsoleError::field_invalid("latitude", "Latitude", "must be a number");
        assert!(err.is_validation());
        assert_eq!(err.field(), Some("latitude"));
        assert_eq!(err.to_string(), "Latitude must be a number");
    }

    #[test]
    fn test_expiration_error_is_validation() {
        let err = ConsoleError::InvalidExpiration("must be in the future".into());
        assert!(err.is_validation());
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_not_found_errors() {
        let err = ConsoleError::UnknownResource("widgets".to_string());
        assert!(err.is_not_found());
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Unknown resource: widgets");
    }

    #[test]
    fn test_io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ConsoleError = io_err.into();
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "IO error: file not found");
    }
}
