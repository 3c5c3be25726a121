//! Resource List Page
//!
//! Generic table of one resource, either the whole collection or the records
//! owned by one user. Deleting goes through a confirmation dialog.

use dioxus::prelude::*;

use sentinel_model::{Record, ResourceKind, Scope, record_id};

use crate::components::dialogs::{ConfirmDialog, delete_message};
use crate::components::table::{DataTable, TableModel, actions_for};
use crate::controller::PageController;
use crate::pages::{RowCommand, create_target, report_failure, row_command, success_message};
use crate::services::use_services;
use crate::state::{Page, StatusLevel, navigate, notify};
use crate::theme::{self, Tone};

/// List page for `kind` in `scope`
#[component]
pub fn ResourceListPage(kind: ResourceKind, scope: Scope) -> Element {
    let services = use_services();
    let mut ctl = use_signal(PageController::new);
    let mut records = use_signal(Vec::<Record>::new);
    let mut load_error = use_signal(|| None::<String>);

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
                match services.resource(kind).list_in(&scope).await {
                    Ok(rows) => {
                        tracing::debug!("Loaded {} {}", rows.len(), kind.segment());
                        records.set(rows);
                        load_error.set(None);
                    }
                    Err(err) => {
                        records.set(Vec::new());
                        load_error.set(report_failure(&services, &err, &scope));
                    }
                }
                ctl.write().loaded();
            });
        })
    };

    use_hook(move || load.call(()));

    let on_action = {
        let scope = scope.clone();
        move |(action, record): (String, Record)| {
            let Some(id) = record_id(&record) else {
                notify("This record has no ID", StatusLevel::Error);
                return;
            };
            match row_command(kind, &scope, &action, id) {
                Some(RowCommand::Open(page)) => navigate(page),
                Some(RowCommand::Delete(id)) => ctl.write().request_delete(id),
                None => tracing::warn!("Unhandled action '{}' on {}", action, kind.segment()),
            }
        }
    };

    let confirm_delete = {
        let services = services.clone();
        let scope = scope.clone();
        move |_| {
            let Some(id) = ctl.write().confirm_delete() else {
                return;
            };
            let services = services.clone();
            let scope = scope.clone();
            spawn(async move {
                match services.resource(kind).delete(&id).await {
                    Ok(()) => {
                        tracing::info!("Deleted {} {}", kind.singular(), id);
                        notify(success_message(kind, "deleted"), StatusLevel::Success);
                        ctl.write().finish_mutation();
                        ctl.write().refresh();
                        load.call(());
                    }
                    Err(err) => {
                        report_failure(&services, &err, &scope);
                        ctl.write().finish_mutation();
                    }
                }
            });
        }
    };

    let r = theme::current();
    let controller = ctl.read().clone();
    let model = TableModel::for_kind(kind, records.read().clone());
    let title = Page::List {
        kind,
        scope: scope.clone(),
    }
    .title();
    let new_page = create_target(kind, &scope);
    let new_label = format!("New {}", kind.singular());
    let back = scope.user().map(|_| Page::list(ResourceKind::Users));
    let pending = controller
        .pending_delete()
        .map(|id| delete_message(kind.singular(), id.as_str()));

    rsx! {
        div {
            class: "page",

            div {
                class: "page-header",
                h1 { class: r.page_title(), "{title}" }
                div {
                    class: "page-actions",
                    if let Some(page) = back {
                        button {
                            class: r.button(Tone::Secondary),
                            onclick: move |_| navigate(page.clone()),
                            "← Users"
                        }
                    }
                    button {
                        class: r.button(Tone::Secondary),
                        disabled: controller.is_loading(),
                        onclick: move |_| {
                            ctl.write().refresh();
                            load.call(());
                        },
                        "Refresh"
                    }
                    if let Some(page) = new_page {
                        button {
                            class: r.button(Tone::Primary),
                            onclick: move |_| navigate(page.clone()),
                            "{new_label}"
                        }
                    }
                }
            }

            if controller.is_loading() {
                div { class: r.spinner() }
            } else if let Some(message) = load_error() {
                div {
                    class: r.empty_state(),
                    p { "{message}" }
                }
            } else {
                DataTable {
                    model: model,
                    actions: actions_for(kind),
                    busy: controller.is_busy(),
                    on_action: on_action,
                }
            }

            if let Some((title, message)) = pending {
                ConfirmDialog {
                    title: title,
                    message: message,
                    busy: controller.is_busy(),
                    on_confirm: confirm_delete,
                    on_cancel: move |_| ctl.write().cancel_delete(),
                }
            }
        }
    }
}
