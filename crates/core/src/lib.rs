//! # Sentinel Core
//!
//! Core types, traits, and error handling for the Sentinel security console.
//!
//! This crate provides the foundational building blocks used by the model,
//! client and UI crates:
//!
//! - **Types**: Field descriptors, form modes, the UI variant and audit deny-lists
//! - **Traits**: `Validatable`
//! - **Errors**: Unified error handling with `ConsoleError` and `ConsoleResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{ConsoleError, ConsoleResult};
pub use traits::Validatable;
pub use types::{
    FORM_HIDDEN_FIELDS, FieldDescriptor, FieldKind, FormMode, TABLE_HIDDEN_FIELDS, UiVariant,
    column_header, field_label, is_form_hidden, is_table_hidden,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
