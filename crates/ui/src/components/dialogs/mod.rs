//! # Dialog Components
//!
//! - **ConfirmDialog**: page-local confirmation for destructive actions
//! - **GuidanceDialog**, **ErrorDialog**, **AboutDialog**: global dialogs
//!   rendered by the overlay for `Dialog` values in the UI state

pub mod confirm;
pub mod notice;

pub use confirm::{ConfirmDialog, delete_message};
pub use notice::{AboutDialog, ErrorDialog, GuidanceDialog};
