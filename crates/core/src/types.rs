//! Core types used throughout the console
//!
//! Field descriptors drive the generic form and table, `UiVariant` names the
//! visual rendering in use, and the audit deny-lists keep server-managed
//! fields out of everything the client renders or submits.

use heck::ToTitleCase;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConsoleError;

// ============================================================================
// Audit Deny-Lists
// ============================================================================

/// Fields never shown as table columns
pub const TABLE_HIDDEN_FIELDS: &[&str] = &["password", "created_at", "updated_at"];

/// Fields never rendered in a form nor submitted back to the server
pub const FORM_HIDDEN_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

/// Whether a field is excluded from inferred table columns
pub fn is_table_hidden(name: &str) -> bool {
    TABLE_HIDDEN_FIELDS.contains(&name)
}

/// Whether a field is excluded from forms and payloads
pub fn is_form_hidden(name: &str) -> bool {
    FORM_HIDDEN_FIELDS.contains(&name)
}

/// Table header text for a column: underscores become spaces, uppercased
pub fn column_header(name: &str) -> String {
    name.replace('_', " ").to_uppercase()
}

/// Human-readable label for a field name (`operating_system` -> `Operating System`)
pub fn field_label(name: &str) -> String {
    name.to_title_case()
}

// ============================================================================
// Field Descriptors
// ============================================================================

/// Input kind of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text
    #[default]
    Text,
    /// Email address
    Email,
    /// Write-only secret (passwords)
    Secret,
    /// Integer or decimal number
    Number,
    /// Checkbox
    Boolean,
    /// Local date and time (`YYYY-MM-DDTHH:mm` from the picker)
    DateTime,
}

impl FieldKind {
    /// HTML input type used to render this kind
    pub fn input_type(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Secret => "password",
            FieldKind::Number => "number",
            FieldKind::Boolean => "checkbox",
            FieldKind::DateTime => "datetime-local",
        }
    }

    /// `step` attribute of the input; date-times keep their seconds
    pub fn input_step(&self) -> Option<&'static str> {
        match self {
            FieldKind::DateTime => Some("1"),
            _ => None,
        }
    }

    /// Whether values of this kind are edited as text
    pub fn is_textual(&self) -> bool {
        !matches!(self, FieldKind::Boolean)
    }
}

/// Explicit description of one editable field of a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Wire name of the field
    pub name: String,
    /// Label shown next to the input
    pub label: String,
    /// Input kind
    pub kind: FieldKind,
    /// Whether presence validation applies
    pub required: bool,
}

impl FieldDescriptor {
    /// Create a descriptor with a label derived from the name
    pub fn new(name: impl Into<String>, kind: FieldKind, required: bool) -> Self {
        let name = name.into();
        Self {
            label: field_label(&name),
            name,
            kind,
            required,
        }
    }

    /// Required text field
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text, true)
    }

    /// Required email field
    pub fn email(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Email, true)
    }

    /// Required secret field
    pub fn secret(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Secret, true)
    }

    /// Required number field
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number, true)
    }

    /// Boolean field (never fails presence validation)
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean, false)
    }

    /// Required date-time field
    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::DateTime, true)
    }

    /// Mark the field as optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Override the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

// ============================================================================
// Form Mode
// ============================================================================

/// Whether a form creates a new record or updates an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Update,
}

impl FormMode {
    /// Label of the submit button
    pub fn submit_label(&self) -> &'static str {
        match self {
            FormMode::Create => "Create",
            FormMode::Update => "Update",
        }
    }
}

// ============================================================================
// UI Variant
// ============================================================================

/// Visual rendering selected for the whole application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiVariant {
    #[default]
    Tailwind,
    Bootstrap,
    Material,
}

impl UiVariant {
    /// All variants in display order
    pub const ALL: [UiVariant; 3] = [UiVariant::Tailwind, UiVariant::Bootstrap, UiVariant::Material];

    /// Persisted key of the variant
    pub fn as_str(&self) -> &'static str {
        match self {
            UiVariant::Tailwind => "tailwind",
            UiVariant::Bootstrap => "bootstrap",
            UiVariant::Material => "material",
        }
    }

    /// Name shown in the settings page
    pub fn display_name(&self) -> &'static str {
        match self {
            UiVariant::Tailwind => "Tailwind",
            UiVariant::Bootstrap => "Bootstrap",
            UiVariant::Material => "Material",
        }
    }
}

impl fmt::Display for UiVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UiVariant {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tailwind" => Ok(UiVariant::Tailwind),
            "bootstrap" => Ok(UiVariant::Bootstrap),
            "material" | "ui" | "mui" => Ok(UiVariant::Material),
            other => Err(ConsoleError::config(format!("unknown UI variant '{}'", other))),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
