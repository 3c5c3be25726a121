//! Main Application Component for Sentinel Console
//!
//! The root Dioxus component. It restores preferences and the stored session
//! on mount, then shows either the sign-in page or the console shell with its
//! header, sidebar, content area, dialog overlay and toasts.

use dioxus::prelude::*;

use sentinel_client::AuthState;

use crate::components::ToastStack;
use crate::components::dialogs::{AboutDialog, ErrorDialog, GuidanceDialog};
use crate::pages::{
    LinkPage, ResourceFormPage, ResourceListPage, SessionsPage, SettingsPage, SignInPage,
    UploadPage,
};
use crate::services::use_services;
use crate::state::{APP_STATE, Dialog, Page, StatusLevel, notify};
use crate::theme::{self, Tone};

// ============================================================================
// Main App Component
// ============================================================================

/// Root application component
#[component]
pub fn App() -> Element {
    let services = use_services();

    use_hook(move || {
        let fallback = services.config.ui_variant.unwrap_or_default();
        {
            let mut state = APP_STATE.write();
            state.ui.variant = services.preferences.ui_variant(fallback);
            state.ui.sidebar_collapsed = services.preferences.sidebar_collapsed();
        }
        tracing::info!("{} UI initialized", crate::NAME);

        let auth = services.auth.clone();
        spawn(async move {
            let resolved = auth.resolve_startup().await;
            APP_STATE.write().auth = resolved;
        });
    });

    let auth = APP_STATE.read().auth.clone();
    let r = theme::current();

    rsx! {
        div {
            class: r.shell(),
            match auth {
                AuthState::Loading => rsx! {
                    div {
                        class: "splash",
                        div { class: r.spinner() }
                        p { "Restoring session..." }
                    }
                },
                AuthState::Unauthenticated => rsx! { SignInPage {} },
                AuthState::Authenticated { .. } => rsx! { Shell {} },
            }
            DialogOverlay {}
            ToastStack {}
        }
    }
}

// ============================================================================
// Shell
// ============================================================================

/// Layout shown to a signed-in operator
#[component]
fn Shell() -> Element {
    rsx! {
        Header {}
        div {
            class: "shell-body",
            Sidebar {}
            MainContent {}
        }
    }
}

/// Top bar with the operator's name and sign-out
#[component]
fn Header() -> Element {
    let services = use_services();
    let r = theme::current();
    let greeting = APP_STATE
        .read()
        .auth
        .user()
        .map(|user| user.greeting_name().to_string())
        .unwrap_or_default();

    let sign_out = move |_| match services.auth.sign_out() {
        Ok(state) => {
            APP_STATE.write().reset_session(state);
            notify("Signed out", StatusLevel::Info);
        }
        Err(err) => {
            tracing::error!("Sign-out failed: {}", err);
            notify("Could not clear the stored session", StatusLevel::Error);
        }
    };

    rsx! {
        header {
            class: r.header(),
            div {
                class: "header-brand",
                span { class: "header-logo", "🛡️" }
                span { class: "header-title", {crate::NAME} }
            }
            div { class: "header-spacer" }
            span { class: "header-user", "{greeting}" }
            button {
                class: r.button(Tone::Secondary),
                onclick: sign_out,
                "Sign out"
            }
        }
    }
}

// ============================================================================
// Sidebar Component
// ============================================================================

/// Left navigation, collapsible
#[component]
fn Sidebar() -> Element {
    let services = use_services();
    let r = theme::current();
    let (collapsed, section) = {
        let state = APP_STATE.read();
        (state.ui.sidebar_collapsed, state.ui.active_page.section())
    };
    let width = if collapsed { "width: 60px;" } else { "width: 220px;" };

    let toggle = move |_| {
        let collapsed = {
            let mut state = APP_STATE.write();
            state.ui.toggle_sidebar();
            state.ui.sidebar_collapsed
        };
        if let Err(err) = services.preferences.set_sidebar_collapsed(collapsed) {
            tracing::warn!("Could not persist sidebar state: {}", err);
        }
    };

    rsx! {
        aside {
            class: r.sidebar(),
            style: width,

            div {
                class: "sidebar-top",
                button {
                    class: "sidebar-toggle",
                    title: if collapsed { "Expand sidebar" } else { "Collapse sidebar" },
                    onclick: toggle,
                    if collapsed { "☰" } else { "✕" }
                }
            }

            nav {
                class: "sidebar-nav",
                for (label, page) in Page::sidebar().into_iter().map(|p| (p.nav_label(), p)) {
                    SidebarItem {
                        key: "{label}",
                        active: page == section,
                        collapsed: collapsed,
                        page: page,
                    }
                }
            }
        }
    }
}

/// One navigation entry
#[component]
fn SidebarItem(page: Page, active: bool, collapsed: bool) -> Element {
    let r = theme::current();
    let icon = page.icon();
    let label = page.nav_label();
    let target = page.clone();

    rsx! {
        button {
            class: r.sidebar_item(active),
            title: "{label}",
            onclick: move |_| APP_STATE.write().ui.navigate(target.clone()),
            span { class: "sidebar-icon", "{icon}" }
            if !collapsed {
                span { class: "sidebar-label", "{label}" }
            }
        }
    }
}

// ============================================================================
// Main Content Area
// ============================================================================

/// Renders the active page
///
/// Every page mounts fresh on navigation, so it always fetches current data.
#[component]
fn MainContent() -> Element {
    let r = theme::current();
    let page = APP_STATE.read().ui.active_page.clone();
    let page_key = format!("{:?}", page);

    rsx! {
        main {
            class: r.content(),
            for page in std::iter::once(page) {
                PageView { key: "{page_key}", page: page }
            }
        }
    }
}

#[component]
fn PageView(page: Page) -> Element {
    match page {
        Page::List { kind, scope } => rsx! { ResourceListPage { kind: kind, scope: scope } },
        Page::Create { kind, scope } => rsx! { ResourceFormPage { kind: kind, scope: scope } },
        Page::Edit { kind, id, scope } => rsx! {
            ResourceFormPage { kind: kind, scope: scope, id: id }
        },
        Page::Sessions { user } => rsx! { SessionsPage { user: user } },
        Page::Upload { kind, scope, id } => rsx! {
            UploadPage { kind: kind, scope: scope, id: id }
        },
        Page::Link { kind, owner } => rsx! { LinkPage { kind: kind, owner: owner } },
        Page::Settings => rsx! { SettingsPage {} },
    }
}

// ============================================================================
// Dialog Overlay
// ============================================================================

/// Global modal dialog, if one is open
#[component]
fn DialogOverlay() -> Element {
    let r = theme::current();
    let Some(dialog) = APP_STATE.read().ui.active_dialog.clone() else {
        return rsx! {};
    };

    rsx! {
        div {
            class: "dialog-layer",

            div {
                class: r.backdrop(),
                onclick: move |_| APP_STATE.write().ui.dismiss_dialog(),
            }

            div {
                class: r.dialog(),
                onclick: move |e| e.stop_propagation(),

                match dialog {
                    Dialog::Guidance { message, navigate_to } => rsx! {
                        GuidanceDialog { message: message, navigate_to: navigate_to }
                    },
                    Dialog::Error(message) => rsx! { ErrorDialog { message: message } },
                    Dialog::About => rsx! { AboutDialog {} },
                }
            }
        }
    }
}
