//! # Notice Dialogs
//!
//! The global dialogs opened through `UiState::show_dialog`: conflict
//! guidance, sign-in errors and the about box.

use dioxus::prelude::*;

use crate::state::{APP_STATE, Page};
use crate::theme::{self, Tone};

/// Guidance for a recoverable domain conflict
///
/// Acknowledging it moves to the related list when there is one.
#[component]
pub fn GuidanceDialog(message: String, navigate_to: Option<Page>) -> Element {
    let r = theme::current();
    let button_label = match &navigate_to {
        Some(page) => format!("Go to {}", page.title()),
        None => "OK".to_string(),
    };

    rsx! {
        div {
            class: "dialog-body",
            div {
                class: "dialog-header",
                span { class: "dialog-icon", "ℹ️" }
                h2 { class: r.page_title(), "Nothing to create" }
            }
            p { class: "dialog-message", "{message}" }
            div {
                class: "dialog-actions",
                button {
                    class: r.button(Tone::Primary),
                    onclick: move |_| APP_STATE.write().ui.dismiss_dialog(),
                    "{button_label}"
                }
            }
        }
    }
}

/// Error that needs acknowledging
#[component]
pub fn ErrorDialog(message: String) -> Element {
    let r = theme::current();

    rsx! {
        div {
            class: "dialog-body",
            div {
                class: "dialog-header",
                span { class: "dialog-icon", "❌" }
                h2 { class: r.page_title(), "Error" }
            }
            p { class: "dialog-message", "{message}" }
            div {
                class: "dialog-actions",
                button {
                    class: r.button(Tone::Secondary),
                    onclick: move |_| APP_STATE.write().ui.close_dialog(),
                    "Close"
                }
            }
        }
    }
}

/// About box
#[component]
pub fn AboutDialog() -> Element {
    let r = theme::current();

    rsx! {
        div {
            class: "dialog-body",
            h2 { class: r.page_title(), {crate::NAME} }
            p { {format!("Version {}", crate::VERSION)} }
            p { "Administration console for the Sentinel security backend." }
            div {
                class: "dialog-actions",
                button {
                    class: r.button(Tone::Secondary),
                    onclick: move |_| APP_STATE.write().ui.close_dialog(),
                    "Close"
                }
            }
        }
    }
}
