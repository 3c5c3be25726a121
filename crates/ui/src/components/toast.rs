//! Toast stack: transient notifications in the corner of the window

use dioxus::prelude::*;

use crate::state::{APP_STATE, StatusLevel};
use crate::theme;

fn icon(level: StatusLevel) -> &'static str {
    match level {
        StatusLevel::Info => "ℹ️",
        StatusLevel::Success => "✅",
        StatusLevel::Warning => "⚠️",
        StatusLevel::Error => "❌",
    }
}

/// Visible toasts, newest at the bottom; a click dismisses one early
#[component]
pub fn ToastStack() -> Element {
    let r = theme::current();
    let toasts = APP_STATE.read().ui.toasts.clone();

    rsx! {
        div {
            class: "toast-stack",
            for toast in toasts {
                div {
                    key: "{toast.id}",
                    class: r.toast(toast.level),
                    onclick: move |_| APP_STATE.write().ui.dismiss_toast(toast.id),
                    span { class: "toast-icon", {icon(toast.level)} }
                    span { "{toast.text}" }
                }
            }
        }
    }
}
