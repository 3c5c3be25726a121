//! # Sentinel Model
//!
//! Data model of the security backend as the console sees it.
//!
//! ## Core Concepts
//!
//! - **Record**: an untyped JSON object, the currency of the generic table and form
//! - **Entity**: a typed mirror of a backend record (User, Role, Session, ...)
//! - **ResourceKind**: catalogue entry with endpoints and field descriptors
//! - **Scope**: parent context for owned resources (addresses of a user, ...)
//! - **DomainConflict**: backend "already has a/an X" rejections
//!

pub mod conflict;
pub mod entities;
pub mod record;
pub mod resource;
pub mod timestamp;

pub use conflict::{DomainConflict, detect_conflict};
pub use entities::{
    Address, Answer, ClientUser, Device, DigitalSignature, Entity, Password, Permission, Profile,
    Role, RolePermission, SecurityQuestion, Session, User, UserRole,
};
pub use record::{
    Record, RecordId, field_text, record_id, records_from_value, require_id, strip_audit_fields,
    without_audit_fields,
};
pub use resource::{API_PREFIX, ResourceKind, Scope};

// Re-export core types that are commonly used with the model
pub use sentinel_core::{ConsoleError, ConsoleResult, FieldDescriptor, FieldKind};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
