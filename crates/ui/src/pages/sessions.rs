//! Sessions Page
//!
//! Sessions of one user. New sessions are checked locally: a malformed or
//! past expiration never reaches the backend.

use dioxus::prelude::*;

use sentinel_model::timestamp::{now_local, session_payload};
use sentinel_model::{FieldKind, Record, RecordId, ResourceKind, Scope, record_id};

use crate::components::dialogs::{ConfirmDialog, delete_message};
use crate::components::inputs::TextInput;
use crate::components::table::{DataTable, TableModel, actions_for};
use crate::controller::PageController;
use crate::pages::{report_failure, success_message};
use crate::services::use_services;
use crate::state::{Page, StatusLevel, navigate, notify};
use crate::theme::{self, Tone};

/// Values typed into the new-session form
#[derive(Debug, Clone, Default, PartialEq)]
struct SessionDraft {
    expiration: String,
    fa_code: String,
    error: Option<String>,
}

/// Sessions of `user`: list, create and revoke
#[component]
pub fn SessionsPage(user: RecordId) -> Element {
    let services = use_services();
    let scope = Scope::User(user.clone());
    let mut ctl = use_signal(PageController::new);
    let mut sessions = use_signal(Vec::<Record>::new);
    let mut draft = use_signal(SessionDraft::default);

    let load = {
        let services = services.clone();
        let scope = scope.clone();
        use_callback(move |_: ()| {
            if !ctl.write().should_fetch() {
                return;
            }
            let services = services.clone();
            let scope = scope.clone();
            spawn(async move {
                match services.resource(ResourceKind::Sessions).list_in(&scope).await {
                    Ok(rows) => sessions.set(rows),
                    Err(err) => {
                        sessions.set(Vec::new());
                        report_failure(&services, &err, &scope);
                    }
                }
                ctl.write().loaded();
            });
        })
    };

    use_hook(move || load.call(()));

    let create = {
        let services = services.clone();
        let scope = scope.clone();
        move |_| {
            let current = draft.read().clone();
            let payload = match session_payload(&current.expiration, &current.fa_code, now_local()) {
                Ok(payload) => payload,
                Err(err) => {
                    draft.write().error = Some(err.to_string());
                    return;
                }
            };
            if !ctl.write().begin_mutation() {
                return;
            }
            let services = services.clone();
            let scope = scope.clone();
            spawn(async move {
                let created = services
                    .resource(ResourceKind::Sessions)
                    .create_in(&scope, &payload)
                    .await;
                ctl.write().finish_mutation();
                match created {
                    Ok(_) => {
                        notify(success_message(ResourceKind::Sessions, "created"), StatusLevel::Success);
                        draft.set(SessionDraft::default());
                        ctl.write().refresh();
                        load.call(());
                    }
                    Err(err) => {
                        report_failure(&services, &err, &scope);
                    }
                }
            });
        }
    };

    let on_action = move |(action, record): (String, Record)| {
        if action != "delete" {
            return;
        }
        if let Some(id) = record_id(&record) {
            ctl.write().request_delete(id);
        }
    };

    let revoke = {
        let services = services.clone();
        let scope = scope.clone();
        move |_| {
            let Some(id) = ctl.write().confirm_delete() else {
                return;
            };
            let services = services.clone();
            let scope = scope.clone();
            spawn(async move {
                let revoked = services.resource(ResourceKind::Sessions).delete(&id).await;
                ctl.write().finish_mutation();
                match revoked {
                    Ok(()) => {
                        tracing::info!("Revoked session {}", id);
                        notify("Session revoked", StatusLevel::Success);
                        ctl.write().refresh();
                        load.call(());
                    }
                    Err(err) => {
                        report_failure(&services, &err, &scope);
                    }
                }
            });
        }
    };

    let r = theme::current();
    let controller = ctl.read().clone();
    let current = draft.read().clone();
    let model = TableModel::for_kind(ResourceKind::Sessions, sessions.read().clone());
    let title = Page::Sessions { user: user.clone() }.title();
    let pending = controller
        .pending_delete()
        .map(|id| delete_message("session", id.as_str()));

    rsx! {
        div {
            class: "page",

            div {
                class: "page-header",
                h1 { class: r.page_title(), "{title}" }
                div {
                    class: "page-actions",
                    button {
                        class: r.button(Tone::Secondary),
                        onclick: move |_| navigate(Page::list(ResourceKind::Users)),
                        "← Users"
                    }
                }
            }

            div {
                class: r.card(),
                h2 { class: r.label(), "New session" }
                TextInput {
                    value: current.expiration,
                    label: "Expiration",
                    input_type: FieldKind::DateTime.input_type().to_string(),
                    step: FieldKind::DateTime.input_step().map(str::to_string),
                    required: true,
                    error: current.error,
                    disabled: controller.is_busy(),
                    on_change: move |value: String| {
                        let mut d = draft.write();
                        d.expiration = value;
                        d.error = None;
                    },
                }
                TextInput {
                    value: current.fa_code,
                    label: "2FA code",
                    placeholder: "Optional",
                    disabled: controller.is_busy(),
                    on_change: move |value: String| draft.write().fa_code = value,
                }
                div {
                    class: "form-actions",
                    button {
                        class: r.button(Tone::Primary),
                        r#type: "button",
                        disabled: controller.is_busy(),
                        onclick: create,
                        "Create session"
                    }
                }
            }

            if controller.is_loading() {
                div { class: r.spinner() }
            } else {
                DataTable {
                    model: model,
                    actions: actions_for(ResourceKind::Sessions),
                    busy: controller.is_busy(),
                    on_action: on_action,
                }
            }

            if let Some((title, message)) = pending {
                ConfirmDialog {
                    title: title,
                    message: message,
                    confirm_label: "Revoke",
                    busy: controller.is_busy(),
                    on_confirm: revoke,
                    on_cancel: move |_| ctl.write().cancel_delete(),
                }
            }
        }
    }
}
