//! # UI Components
//!
//! Reusable Dioxus components shared by the console pages:
//! - **DataTable**: generic table over records with per-row actions
//! - **GenericForm**: descriptor-driven create/update form
//! - **Inputs**: text, select, checkbox and file inputs
//! - **Dialogs**: confirmation and notice dialogs
//! - **ToastStack**: transient notifications
//!
//! ## Component Hierarchy
//!
//! ```text
//! ResourceListPage
//! ├── DataTable
//! └── ConfirmDialog (while a delete is pending)
//!
//! ResourceFormPage
//! └── GenericForm
//!     ├── TextInput (multiple)
//!     └── Checkbox (multiple)
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod dialogs;
pub mod form;
pub mod inputs;
pub mod table;
pub mod toast;

// ============================================================================
// Re-exports
// ============================================================================

pub use dialogs::{AboutDialog, ConfirmDialog, ErrorDialog, GuidanceDialog};
pub use form::{FieldErrors, FieldValue, FormField, FormState, GenericForm, infer_descriptors};
pub use inputs::{Checkbox, FileInput, Select, SelectOption, TextInput};
pub use table::{
    DataTable, EMPTY_PLACEHOLDER, TableAction, TableModel, actions_for, format_cell_value,
    infer_columns,
};
pub use toast::ToastStack;
