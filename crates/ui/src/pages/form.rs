//! Resource Form Page
//!
//! Generic create and edit page over `GenericForm`. Creating a user can also
//! assign roles right after the user exists.

use std::collections::BTreeSet;

use dioxus::prelude::*;

use sentinel_client::create_user_with_roles;
use sentinel_core::FormMode;
use sentinel_model::{Record, RecordId, ResourceKind, Scope, field_text, record_id};

use crate::components::form::{FormState, GenericForm};
use crate::components::inputs::Checkbox;
use crate::controller::PageController;
use crate::pages::{load_failure_message, report_failure, return_page, success_message};
use crate::services::{Services, use_services};
use crate::state::{Page, StatusLevel, navigate, notify};
use crate::theme::{self, Tone};

/// Create (`id` is `None`) or edit a record of `kind`
#[component]
pub fn ResourceFormPage(kind: ResourceKind, scope: Scope, id: Option<RecordId>) -> Element {
    let services = use_services();
    let mode = if id.is_some() {
        FormMode::Update
    } else {
        FormMode::Create
    };

    let mut ctl = use_signal(PageController::new);
    let mut form = use_signal(move || FormState::for_kind(kind, &blank_template(kind), mode));
    let roles = use_signal(Vec::<Record>::new);
    let selected_roles = use_signal(BTreeSet::<RecordId>::new);
    let mut load_error = use_signal(|| None::<String>);

    use_hook({
        let services = services.clone();
        let scope = scope.clone();
        let id = id.clone();
        move || {
            if !ctl.write().should_fetch() {
                return;
            }
            spawn(async move {
                match id {
                    Some(id) => match services.resource(kind).get(&id).await {
                        Ok(record) => form.set(FormState::for_kind(kind, &record, FormMode::Update)),
                        Err(err) => {
                            let shown = report_failure(&services, &err, &scope);
                            load_error.set(Some(shown.unwrap_or_else(|| load_failure_message(kind))));
                            ctl.write().load_failed();
                            return;
                        }
                    },
                    None if kind == ResourceKind::Users => load_roles(&services, roles).await,
                    None => {}
                }
                ctl.write().loaded();
            });
        }
    });

    let on_submit = {
        let services = services.clone();
        let scope = scope.clone();
        let id = id.clone();
        move |payload: Record| {
            if !ctl.write().begin_mutation() {
                return;
            }
            let services = services.clone();
            let scope = scope.clone();
            let id = id.clone();
            let picked: Vec<RecordId> = selected_roles.read().iter().cloned().collect();
            spawn(async move {
                let saved = match &id {
                    Some(id) => services.resource(kind).update(id, &payload).await.map(|_| "updated"),
                    None if kind == ResourceKind::Users && !picked.is_empty() => {
                        create_user_with_roles(&services.api, &payload, &picked)
                            .await
                            .map(|outcome| {
                                if !outcome.failed.is_empty() {
                                    notify(
                                        format!("{} role(s) could not be assigned", outcome.failed.len()),
                                        StatusLevel::Warning,
                                    );
                                }
                                "created"
                            })
                    }
                    None => services.resource(kind).create_in(&scope, &payload).await.map(|_| "created"),
                };

                ctl.write().finish_mutation();
                match saved {
                    Ok(verb) => {
                        tracing::info!("{} {}", kind.singular(), verb);
                        notify(success_message(kind, verb), StatusLevel::Success);
                        navigate(return_page(kind, &scope));
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
    let title = match &id {
        Some(id) => Page::Edit {
            kind,
            id: id.clone(),
            scope: scope.clone(),
        }
        .title(),
        None => Page::Create {
            kind,
            scope: scope.clone(),
        }
        .title(),
    };
    let back = return_page(kind, &scope);
    let leave = back.clone();
    let show_roles = kind == ResourceKind::Users && mode == FormMode::Create;

    rsx! {
        div {
            class: "page",
            h1 { class: r.page_title(), "{title}" }

            if controller.is_loading() && id.is_some() {
                div { class: r.spinner() }
            } else if let Some(message) = load_error() {
                div {
                    class: r.empty_state(),
                    p { "{message}" }
                    button {
                        class: r.button(Tone::Secondary),
                        onclick: move |_| navigate(leave.clone()),
                        "Back"
                    }
                }
            } else {
                GenericForm {
                    form: form,
                    busy: controller.is_busy(),
                    on_submit: on_submit,
                    on_cancel: move |_| navigate(back.clone()),
                }
            }

            if show_roles {
                RolePicker { roles: roles, selected: selected_roles }
            }
        }
    }
}

/// Checkboxes to pick roles for a new user
#[component]
fn RolePicker(roles: Signal<Vec<Record>>, mut selected: Signal<BTreeSet<RecordId>>) -> Element {
    let r = theme::current();
    let picked = selected.read().clone();
    let options: Vec<(RecordId, String, bool)> = roles
        .read()
        .iter()
        .filter_map(|role| {
            let id = record_id(role)?;
            let checked = picked.contains(&id);
            Some((id, field_text(role, "name"), checked))
        })
        .collect();

    rsx! {
        div {
            class: r.card(),
            h2 { class: r.label(), "Roles to assign" }
            if options.is_empty() {
                p { class: r.empty_state(), "No roles defined yet" }
            }
            for (id, name, checked) in options {
                Checkbox {
                    key: "{id}",
                    checked: checked,
                    label: name,
                    on_change: {
                        let id = id.clone();
                        move |checked: bool| {
                            if checked {
                                selected.write().insert(id.clone());
                            } else {
                                selected.write().remove(&id);
                            }
                        }
                    },
                }
            }
        }
    }
}

async fn load_roles(services: &Services, mut roles: Signal<Vec<Record>>) {
    match services.resource(ResourceKind::Roles).list().await {
        Ok(list) => roles.set(list),
        Err(err) => tracing::warn!("Could not load roles for assignment: {}", err),
    }
}

fn blank_template(kind: ResourceKind) -> Record {
    kind.template().unwrap_or_else(|err| {
        tracing::warn!("No template for {}: {}", kind.segment(), err);
        Record::new()
    })
}
