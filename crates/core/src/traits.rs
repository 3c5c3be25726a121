//! Core traits for the Sentinel console
//!
//! Validation shared by the configuration types.

use crate::error::ConsoleResult;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can be validated
///
/// Types implementing this trait can check their internal consistency
/// and return validation errors if the state is invalid.
///
/// # Example
///
/// ```rust,ignore
/// use sentinel_core::{ConsoleError, ConsoleResult, Validatable};
///
/// struct Role {
///     name: String,
/// }
///
/// impl Validatable for Role {
///     fn validate(&self) -> ConsoleResult<()> {
///         if self.name.trim().is_empty() {
///             return Err(ConsoleError::field_required("name", "Name"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or a `ConsoleError` describing the first problem.
    fn validate(&self) -> ConsoleResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

// ============================================================================
// Tests
// ============================================================================
