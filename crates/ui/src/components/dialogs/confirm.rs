//! # Confirm Dialog Component
//!
//! Modal asking the operator to confirm a destructive action. Nothing is sent
//! to the backend until "confirm" is clicked; cancelling or clicking the
//! backdrop leaves everything as it was.

use dioxus::prelude::*;

use crate::theme::{self, Tone};

// ============================================================================
// Component Props
// ============================================================================

#[derive(Props, Clone, PartialEq)]
pub struct ConfirmDialogProps {
    /// Heading, e.g. "Delete role"
    pub title: String,

    /// Explanation of what will happen
    pub message: String,

    /// Label of the destructive button
    #[props(default = "Delete".to_string())]
    pub confirm_label: String,

    /// Disable the buttons while the request runs
    #[props(default = false)]
    pub busy: bool,

    pub on_confirm: EventHandler<()>,

    pub on_cancel: EventHandler<()>,
}

// ============================================================================
// Main Component
// ============================================================================

/// Confirmation dialog for destructive operations
#[component]
pub fn ConfirmDialog(props: ConfirmDialogProps) -> Element {
    let r = theme::current();

    rsx! {
        div {
            class: "dialog-layer",

            div {
                class: r.backdrop(),
                onclick: move |_| {
                    if !props.busy {
                        props.on_cancel.call(());
                    }
                },
            }

            div {
                class: r.dialog(),
                onclick: move |e| e.stop_propagation(),

                div {
                    class: "dialog-header",
                    span { class: "dialog-icon", "⚠️" }
                    h2 { class: r.page_title(), "{props.title}" }
                }

                p { class: "dialog-message", "{props.message}" }

                div {
                    class: "dialog-actions",

                    button {
                        r#type: "button",
                        class: r.button(Tone::Secondary),
                        disabled: props.busy,
                        onclick: move |_| props.on_cancel.call(()),
                        "Cancel"
                    }

                    button {
                        r#type: "button",
                        class: r.button(Tone::Danger),
                        disabled: props.busy,
                        onclick: move |_| props.on_confirm.call(()),
                        if props.busy {
                            span { class: r.spinner() }
                            "Working..."
                        } else {
                            "{props.confirm_label}"
                        }
                    }
                }
            }
        }
    }
}

/// Standard wording for deleting one record
pub fn delete_message(singular: &str, id: &str) -> (String, String) {
    (
        format!("Delete {}", singular),
        format!(
            "The {} with ID {} will be permanently deleted. This cannot be undone.",
            singular, id
        ),
    )
}

// ============================================================================
// Tests
// ============================================================================
