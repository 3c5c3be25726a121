//! Link Page
//!
//! Creates a join record between an owner and a picked target: a role for a
//! user, an answer to a security question, or a permission for a role. The
//! target comes from a dropdown; the remaining fields (validity window or
//! answer text) come from the catalogue.

use dioxus::prelude::*;

use sentinel_core::FormMode;
use sentinel_model::{Record, RecordId, ResourceKind, Scope, field_text, record_id};

use crate::components::form::{FormState, GenericForm};
use crate::components::inputs::{Select, SelectOption};
use crate::controller::PageController;
use crate::pages::{report_failure, return_page, success_message};
use crate::services::use_services;
use crate::state::{Page, StatusLevel, navigate, notify};
use crate::theme;

/// Resource the operator picks from when creating a `kind` link
pub fn target_kind(kind: ResourceKind) -> Option<ResourceKind> {
    match kind {
        ResourceKind::UserRoles => Some(ResourceKind::Roles),
        ResourceKind::Answers => Some(ResourceKind::SecurityQuestions),
        ResourceKind::RolePermissions => Some(ResourceKind::Permissions),
        _ => None,
    }
}

/// Scope the create request is sent in
pub fn link_scope(kind: ResourceKind, owner: RecordId, target: RecordId) -> Option<Scope> {
    match kind {
        ResourceKind::UserRoles => Some(Scope::UserRole {
            user: owner,
            role: target,
        }),
        ResourceKind::Answers => Some(Scope::UserQuestion {
            user: owner,
            question: target,
        }),
        ResourceKind::RolePermissions => Some(Scope::RolePermission {
            role: owner,
            permission: target,
        }),
        _ => None,
    }
}

/// Dropdown option for a target record
pub fn target_option(record: &Record) -> Option<SelectOption> {
    let id = record_id(record)?;
    let label = ["name", "url", "description"]
        .iter()
        .map(|field| field_text(record, field))
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| format!("#{}", id));
    // Permissions read better with their method
    let label = match field_text(record, "method") {
        method if !method.is_empty() && !field_text(record, "url").is_empty() => {
            format!("{} {}", method, label)
        }
        _ => label,
    };
    Some(SelectOption::new(id.as_str(), label))
}

/// Where the link page returns to
fn link_return(kind: ResourceKind, owner: &RecordId) -> Page {
    match kind {
        ResourceKind::RolePermissions => return_page(kind, &Scope::All),
        _ => return_page(kind, &Scope::User(owner.clone())),
    }
}

/// Link `owner` to a picked target through a `kind` record
#[component]
pub fn LinkPage(kind: ResourceKind, owner: RecordId) -> Element {
    let services = use_services();
    let mut ctl = use_signal(PageController::new);
    let mut targets = use_signal(Vec::<SelectOption>::new);
    let mut target = use_signal(String::new);
    let mut target_error = use_signal(|| None::<String>);
    let form = use_signal(move || {
        let template = kind.template().unwrap_or_default();
        FormState::for_kind(kind, &template, FormMode::Create)
    });

    use_hook({
        let services = services.clone();
        let owner = owner.clone();
        move || {
            if !ctl.write().should_fetch() {
                return;
            }
            let Some(source) = target_kind(kind) else {
                tracing::warn!("{} is not a link resource", kind.segment());
                ctl.write().loaded();
                return;
            };
            spawn(async move {
                match services.resource(source).list().await {
                    Ok(rows) => targets.set(rows.iter().filter_map(target_option).collect()),
                    Err(err) => {
                        report_failure(&services, &err, &Scope::User(owner));
                    }
                }
                ctl.write().loaded();
            });
        }
    });

    let on_submit = {
        let services = services.clone();
        let owner = owner.clone();
        move |payload: Record| {
            let picked = target.read().clone();
            if picked.is_empty() {
                target_error.set(Some("Choose one".to_string()));
                return;
            }
            let Some(scope) = link_scope(kind, owner.clone(), RecordId::from(picked)) else {
                return;
            };
            if !ctl.write().begin_mutation() {
                return;
            }
            let services = services.clone();
            let owner = owner.clone();
            spawn(async move {
                let created = services.resource(kind).create_in(&scope, &payload).await;
                ctl.write().finish_mutation();
                match created {
                    Ok(_) => {
                        tracing::info!("Linked {} in {}", kind.singular(), scope);
                        notify(success_message(kind, "created"), StatusLevel::Success);
                        navigate(link_return(kind, &owner));
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
    let title = Page::Link {
        kind,
        owner: owner.clone(),
    }
    .title();
    let target_label = target_kind(kind)
        .map(|k| crate::state::capitalize(k.singular()))
        .unwrap_or_default();
    let back = link_return(kind, &owner);
    let options = targets.read().clone();
    let no_targets = options.is_empty();

    rsx! {
        div {
            class: "page",
            h1 { class: r.page_title(), "{title}" }

            if controller.is_loading() {
                div { class: r.spinner() }
            } else {
                div {
                    class: r.card(),
                    Select {
                        value: target(),
                        options: options,
                        label: target_label,
                        placeholder: "Select...",
                        error: target_error(),
                        disabled: controller.is_busy(),
                        on_change: move |value: String| {
                            target.set(value);
                            target_error.set(None);
                        },
                    }
                    if no_targets {
                        p { class: r.empty_state(), "Nothing to pick from yet" }
                    }
                }
                GenericForm {
                    form: form,
                    busy: controller.is_busy(),
                    on_submit: on_submit,
                    on_cancel: move |_| navigate(back.clone()),
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
