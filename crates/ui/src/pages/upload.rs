//! Upload Page
//!
//! Multipart create and edit for records that carry a photo (profiles,
//! digital signatures). Text fields come from the resource catalogue; the
//! photo is picked with the native file dialog.

use dioxus::prelude::*;

use sentinel_client::{FileUpload, Upload};
use sentinel_core::FormMode;
use sentinel_model::{Record, RecordId, ResourceKind, Scope};

use crate::components::form::FormState;
use crate::components::inputs::{FileInput, TextInput};
use crate::controller::PageController;
use crate::pages::{load_failure_message, report_failure, return_page, success_message};
use crate::services::use_services;
use crate::state::{Page, StatusLevel, navigate, notify};
use crate::theme::{self, Tone};

/// Extensions offered by the photo picker
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Create a `kind` record under `scope`, or replace the one with `id`
#[component]
pub fn UploadPage(kind: ResourceKind, scope: Scope, id: Option<RecordId>) -> Element {
    let services = use_services();
    let mode = if id.is_some() {
        FormMode::Update
    } else {
        FormMode::Create
    };

    let mut ctl = use_signal(PageController::new);
    let mut form = use_signal(move || upload_form(kind, &upload_template(kind), mode));
    let mut photo = use_signal(|| None::<FileUpload>);
    let mut photo_error = use_signal(|| None::<String>);
    let mut load_error = use_signal(|| None::<String>);

    use_hook({
        let services = services.clone();
        let scope = scope.clone();
        let id = id.clone();
        move || {
            if !ctl.write().should_fetch() {
                return;
            }
            let Some(id) = id else {
                ctl.write().loaded();
                return;
            };
            spawn(async move {
                match services.resource(kind).get(&id).await {
                    Ok(record) => {
                        form.set(upload_form(kind, &record, FormMode::Update));
                        ctl.write().loaded();
                    }
                    Err(err) => {
                        let shown = report_failure(&services, &err, &scope);
                        load_error.set(Some(shown.unwrap_or_else(|| load_failure_message(kind))));
                        ctl.write().load_failed();
                    }
                }
            });
        }
    });

    let pick = move |_| {
        spawn(async move {
            let Some(handle) = rfd::AsyncFileDialog::new()
                .add_filter("Images", &IMAGE_EXTENSIONS)
                .pick_file()
                .await
            else {
                return;
            };
            let bytes = handle.read().await;
            tracing::debug!("Picked {} ({} bytes)", handle.file_name(), bytes.len());
            photo.set(Some(FileUpload::new(handle.file_name(), bytes)));
            photo_error.set(None);
        });
    };

    let submit = {
        let services = services.clone();
        let scope = scope.clone();
        let id = id.clone();
        move |_| {
            let fields = match form.write().submit() {
                Ok(fields) => fields,
                Err(errors) => {
                    tracing::debug!("Upload blocked by {} invalid field(s)", errors.len());
                    return;
                }
            };
            let file = photo.read().clone();
            if file.is_none() && mode == FormMode::Create {
                photo_error.set(Some("Choose a photo".to_string()));
                return;
            }
            if !ctl.write().begin_mutation() {
                return;
            }

            let upload = build_upload(&fields, file);
            let services = services.clone();
            let scope = scope.clone();
            let id = id.clone();
            spawn(async move {
                let client = services.resource(kind);
                let saved = match &id {
                    Some(id) => client.update_multipart(id, upload).await.map(|_| "updated"),
                    None => client.create_multipart_in(&scope, upload).await.map(|_| "created"),
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
    let state = form.read().clone();
    let title = Page::Upload {
        kind,
        scope: scope.clone(),
        id: id.clone(),
    }
    .title();
    let back = return_page(kind, &scope);
    let leave = back.clone();
    let picked_name = photo.read().as_ref().map(|p| p.file_name.clone());
    let submit_label = mode.submit_label();

    rsx! {
        div {
            class: "page",
            h1 { class: r.page_title(), "{title}" }

            if controller.is_loading() {
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
                div {
                    class: r.card(),

                    for field in state.fields().iter().cloned() {
                        TextInput {
                            key: "{field.descriptor.name}",
                            value: state.text(&field.descriptor.name).to_string(),
                            label: field.descriptor.label.clone(),
                            required: field.descriptor.required,
                            input_type: field.descriptor.kind.input_type().to_string(),
                            step: field.descriptor.kind.input_step().map(str::to_string),
                            error: state.error(&field.descriptor.name).map(str::to_string),
                            disabled: controller.is_busy(),
                            on_change: {
                                let name = field.descriptor.name.clone();
                                move |value: String| form.write().set_text(&name, value)
                            },
                        }
                    }

                    FileInput {
                        file_name: picked_name,
                        label: "Choose photo",
                        disabled: controller.is_busy(),
                        on_pick: pick,
                    }
                    if let Some(error) = photo_error() {
                        p { class: r.field_error(), "{error}" }
                    }

                    div {
                        class: "form-actions",
                        button {
                            class: r.button(Tone::Secondary),
                            r#type: "button",
                            disabled: controller.is_busy(),
                            onclick: move |_| navigate(back.clone()),
                            "Cancel"
                        }
                        button {
                            class: r.button(Tone::Primary),
                            r#type: "button",
                            disabled: controller.is_busy(),
                            onclick: submit,
                            if controller.is_busy() { "Uploading..." } else { "{submit_label}" }
                        }
                    }
                }
            }
        }
    }
}

/// Catalogue template without the photo, which is sent as a file part
fn upload_template(kind: ResourceKind) -> Record {
    let mut template = kind.template().unwrap_or_else(|err| {
        tracing::warn!("No template for {}: {}", kind.segment(), err);
        Record::new()
    });
    template.remove("photo");
    template
}

/// Text parts from a validated form payload plus the picked photo
pub fn build_upload(fields: &Record, photo: Option<FileUpload>) -> Upload {
    fields
        .iter()
        .filter(|(name, _)| name.as_str() != "photo")
        .fold(Upload::default(), |upload, (name, value)| {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            upload.field(name.clone(), text)
        })
        .photo(photo)
}

/// Only the catalogue's text fields; never inferred, so `photo` stays out
fn upload_form(kind: ResourceKind, record: &Record, mode: FormMode) -> FormState {
    FormState::from_descriptors(kind.descriptors(), record, mode)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_build_upload_keeps_text_fields_and_photo() {
        let fields = json!({"identification": "ABC-1", "phone": "555"})
            .as_object()
            .cloned()
            .unwrap();
        let photo = FileUpload::new("me.png", vec![1, 2, 3]);
        let upload = build_upload(&fields, Some(photo.clone()));

        assert_eq!(
            upload.fields,
            vec![
                ("identification".to_string(), "ABC-1".to_string()),
                ("phone".to_string(), "555".to_string()),
            ]
        );
        assert_eq!(upload.photo, Some(photo));
    }

    #[test]
    fn test_photo_field_never_sent_as_text() {
        let fields = json!({"photo": "old.png"}).as_object().cloned().unwrap();
        let upload = build_upload(&fields, None);
        assert!(upload.fields.is_empty());
        assert_eq!(upload.photo, None);
    }

    #[test]
    fn test_signature_form_has_no_text_fields() {
        let form = upload_form(
            ResourceKind::DigitalSignatures,
            &json!({"id": 2, "photo": "sig.png"}).as_object().cloned().unwrap(),
            FormMode::Update,
        );
        assert!(form.fields().is_empty());
    }

    #[test]
    fn test_numbers_become_text_parts() {
        let fields = json!({"number": 12}).as_object().cloned().unwrap();
        assert_eq!(
            build_upload(&fields, None).fields,
            vec![("number".to_string(), "12".to_string())]
        );
    }
}
