//! # Generic Form
//!
//! One input per field descriptor, presence validation per field kind, and a
//! typed JSON payload on success. Audit fields never appear, neither as inputs
//! nor in the payload.

use std::collections::BTreeMap;

use dioxus::prelude::*;
use serde_json::{Number, Value};

use sentinel_core::{ConsoleError, FieldDescriptor, FieldKind, FormMode, is_form_hidden};
use sentinel_model::timestamp::{to_backend, to_input};
use sentinel_model::{Record, ResourceKind};

use crate::components::inputs::{Checkbox, TextInput};
use crate::theme::{self, Tone};

/// Field name to message
pub type FieldErrors = BTreeMap<String, String>;

// ============================================================================
// Form State
// ============================================================================

/// Current value of one input
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

/// One rendered field
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub descriptor: FieldDescriptor,
    pub value: FieldValue,
}

/// Values and errors of a generic form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    mode: FormMode,
    fields: Vec<FormField>,
    errors: FieldErrors,
}

impl FormState {
    /// Build the form for explicit descriptors, pre-filled from `template`
    pub fn from_descriptors(
        descriptors: Vec<FieldDescriptor>,
        template: &Record,
        mode: FormMode,
    ) -> Self {
        let fields = descriptors
            .into_iter()
            .filter(|d| !is_form_hidden(&d.name))
            .map(|mut descriptor| {
                // Leaving a secret blank on update keeps the stored one
                if mode == FormMode::Update && descriptor.kind == FieldKind::Secret {
                    descriptor.required = false;
                }
                let value = initial_value(&descriptor, template.get(&descriptor.name), mode);
                FormField { descriptor, value }
            })
            .collect();

        Self {
            mode,
            fields,
            errors: FieldErrors::new(),
        }
    }

    /// Form for a resource; kinds without descriptors fall back to inference
    pub fn for_kind(kind: ResourceKind, template: &Record, mode: FormMode) -> Self {
        let descriptors = kind.descriptors();
        let descriptors = if descriptors.is_empty() {
            infer_descriptors(template)
        } else {
            descriptors
        };
        Self::from_descriptors(descriptors, template, mode)
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    /// Text of a field; empty for flags and unknown names
    pub fn text(&self, name: &str) -> &str {
        match self.field(name).map(|f| &f.value) {
            Some(FieldValue::Text(text)) => text,
            _ => "",
        }
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.field(name).map(|f| &f.value), Some(FieldValue::Flag(true)))
    }

    /// Editing a field clears its error
    pub fn set_text(&mut self, name: &str, text: impl Into<String>) {
        if let Some(field) = self.field_mut(name) {
            field.value = FieldValue::Text(text.into());
            self.errors.remove(name);
        }
    }

    pub fn set_flag(&mut self, name: &str, flag: bool) {
        if let Some(field) = self.field_mut(name) {
            field.value = FieldValue::Flag(flag);
        }
    }

    /// Field-scoped validation errors
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for field in &self.fields {
            if let Some(err) = field_error(field) {
                errors.insert(field.descriptor.name.clone(), err.to_string());
            }
        }
        errors
    }

    /// Validate and build the payload; errors are kept for display on failure
    pub fn submit(&mut self) -> Result<Record, FieldErrors> {
        let mut errors = self.validate();
        let mut payload = Record::new();

        if errors.is_empty() {
            for field in &self.fields {
                match payload_value(field) {
                    Ok(Some(value)) => {
                        payload.insert(field.descriptor.name.clone(), value);
                    }
                    Ok(None) => {}
                    Err(err) => {
                        errors.insert(field.descriptor.name.clone(), err.to_string());
                    }
                }
            }
        }

        if errors.is_empty() {
            self.errors.clear();
            Ok(payload)
        } else {
            self.errors = errors.clone();
            Err(errors)
        }
    }

    fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.descriptor.name == name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.descriptor.name == name)
    }
}

/// Descriptors inferred from the runtime type of each template value
pub fn infer_descriptors(template: &Record) -> Vec<FieldDescriptor> {
    template
        .iter()
        .filter(|(name, _)| !is_form_hidden(name))
        .map(|(name, value)| match value {
            Value::Bool(_) => FieldDescriptor::boolean(name.as_str()),
            Value::Number(_) => FieldDescriptor::number(name.as_str()),
            Value::String(_) => FieldDescriptor::text(name.as_str()),
            _ => FieldDescriptor::text(name.as_str()).optional(),
        })
        .collect()
}

fn initial_value(descriptor: &FieldDescriptor, current: Option<&Value>, mode: FormMode) -> FieldValue {
    if descriptor.kind == FieldKind::Boolean {
        return FieldValue::Flag(matches!(current, Some(Value::Bool(true))));
    }
    if descriptor.kind == FieldKind::Secret && mode == FormMode::Update {
        return FieldValue::Text(String::new());
    }

    let text = match current {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    match descriptor.kind {
        FieldKind::DateTime if !text.is_empty() => FieldValue::Text(to_input(&text)),
        _ => FieldValue::Text(text),
    }
}

fn field_error(field: &FormField) -> Option<ConsoleError> {
    let FieldValue::Text(text) = &field.value else {
        return None;
    };
    let FieldDescriptor { name, label, .. } = &field.descriptor;

    if text.trim().is_empty() {
        return field
            .descriptor
            .required
            .then(|| ConsoleError::field_required(name.as_str(), label.as_str()));
    }
    if field.descriptor.kind == FieldKind::Number && text.trim().parse::<f64>().is_err() {
        return Some(not_a_number(&field.descriptor));
    }
    None
}

fn not_a_number(descriptor: &FieldDescriptor) -> ConsoleError {
    ConsoleError::field_invalid(descriptor.name.as_str(), descriptor.label.as_str(), "must be a number")
}

/// JSON value sent for a field; `None` leaves an optional blank field out
fn payload_value(field: &FormField) -> Result<Option<Value>, ConsoleError> {
    let text = match &field.value {
        FieldValue::Flag(flag) => return Ok(Some(Value::Bool(*flag))),
        FieldValue::Text(text) => text,
    };
    if text.trim().is_empty() {
        return Ok(None);
    }

    let value = match field.descriptor.kind {
        FieldKind::Number => number_value(text.trim()).ok_or_else(|| not_a_number(&field.descriptor))?,
        FieldKind::DateTime => Value::String(to_backend(text).map_err(|_| {
            ConsoleError::field_invalid(
                field.descriptor.name.as_str(),
                field.descriptor.label.as_str(),
                "must be a valid date and time",
            )
        })?),
        FieldKind::Secret => Value::String(text.clone()),
        _ => Value::String(text.trim().to_string()),
    };
    Ok(Some(value))
}

fn number_value(text: &str) -> Option<Value> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::from(n));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

// ============================================================================
// Component
// ============================================================================

#[derive(Props, Clone, PartialEq)]
pub struct GenericFormProps {
    /// Form state, owned by the page
    pub form: Signal<FormState>,

    /// Called with the payload once validation passes
    pub on_submit: EventHandler<Record>,

    #[props(default)]
    pub on_cancel: EventHandler<()>,

    /// Disable the controls while the request runs
    #[props(default = false)]
    pub busy: bool,
}

/// Form over a [`FormState`]
#[component]
pub fn GenericForm(props: GenericFormProps) -> Element {
    let r = theme::current();
    let mut form = props.form;
    let state = form.read().clone();
    let submit_label = state.mode().submit_label();

    let submit = move |_| {
        let result = form.write().submit();
        match result {
            Ok(payload) => props.on_submit.call(payload),
            Err(errors) => tracing::debug!("Form blocked by {} invalid field(s)", errors.len()),
        }
    };

    rsx! {
        div {
            class: r.card(),

            for field in state.fields().iter().cloned() {
                div {
                    key: "{field.descriptor.name}",
                    class: "form-row",
                    match field.value {
                        FieldValue::Flag(checked) => {
                            let name = field.descriptor.name.clone();
                            rsx! {
                                Checkbox {
                                    checked: checked,
                                    label: field.descriptor.label.clone(),
                                    disabled: props.busy,
                                    on_change: move |flag| form.write().set_flag(&name, flag),
                                }
                            }
                        }
                        FieldValue::Text(text) => {
                            let name = field.descriptor.name.clone();
                            rsx! {
                                TextInput {
                                    value: text,
                                    label: field.descriptor.label.clone(),
                                    required: field.descriptor.required,
                                    input_type: field.descriptor.kind.input_type().to_string(),
                                    step: field.descriptor.kind.input_step().map(str::to_string),
                                    error: state.error(&field.descriptor.name).map(str::to_string),
                                    disabled: props.busy,
                                    on_change: move |value: String| form.write().set_text(&name, value),
                                }
                            }
                        }
                    }
                }
            }

            div {
                class: "form-actions",
                button {
                    class: r.button(Tone::Secondary),
                    r#type: "button",
                    disabled: props.busy,
                    onclick: move |_| props.on_cancel.call(()),
                    "Cancel"
                }
                button {
                    class: r.button(Tone::Primary),
                    r#type: "button",
                    disabled: props.busy,
                    onclick: submit,
                    if props.busy { "Saving..." } else { "{submit_label}" }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn names(form: &FormState) -> Vec<&str> {
        form.fields()
            .iter()
            .map(|f| f.descriptor.name.as_str())
            .collect()
    }

    #[test]
    fn test_audit_fields_are_dropped() {
        let template = record(json!({
            "id": 3, "name": "admin", "created_at": "x", "updated_at": "y", "enabled": true
        }));
        let mut form = FormState::from_descriptors(
            infer_descriptors(&template),
            &template,
            FormMode::Update,
        );
        assert_eq!(names(&form), ["name", "enabled"]);

        let payload = form.submit().unwrap();
        assert!(!payload.contains_key("id"));
        assert!(!payload.contains_key("created_at"));
        assert!(!payload.contains_key("updated_at"));
    }

    #[test]
    fn test_explicit_descriptors_ignore_hidden_names() {
        let descriptors = vec![FieldDescriptor::number("id"), FieldDescriptor::text("name")];
        let form = FormState::from_descriptors(descriptors, &Record::new(), FormMode::Create);
        assert_eq!(names(&form), ["name"]);
    }

    #[test]
    fn test_required_fields_block_submit() {
        let mut form = FormState::for_kind(ResourceKind::Roles, &Record::new(), FormMode::Create);
        form.set_text("name", "auditor");

        let errors = form.submit().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["description"], "Description is required");
        assert_eq!(form.error("description"), Some("Description is required"));
    }

    #[test]
    fn test_number_validation() {
        let mut form =
            FormState::for_kind(ResourceKind::Addresses, &Record::new(), FormMode::Create);
        form.set_text("street", "Main");
        form.set_text("number", "12B");
        form.set_text("latitude", "north");
        form.set_text("longitude", "");

        let errors = form.submit().unwrap_err();
        assert_eq!(errors["latitude"], "Latitude must be a number");
        assert_eq!(errors["longitude"], "Longitude is required");
        assert!(!errors.contains_key("number"));
    }

    #[test]
    fn test_payload_is_typed() {
        let mut form =
            FormState::for_kind(ResourceKind::Addresses, &Record::new(), FormMode::Create);
        form.set_text("street", " Main ");
        form.set_text("number", "12");
        form.set_text("latitude", "-1.5");
        form.set_text("longitude", "36");

        let payload = form.submit().unwrap();
        assert_eq!(
            Value::Object(payload),
            json!({"street": "Main", "number": "12", "latitude": -1.5, "longitude": 36})
        );
    }

    #[test]
    fn test_editing_clears_error() {
        let mut form = FormState::for_kind(ResourceKind::Roles, &Record::new(), FormMode::Create);
        assert!(form.submit().is_err());
        form.set_text("name", "x");
        assert_eq!(form.error("name"), None);
        assert!(form.error("description").is_some());
    }

    #[test]
    fn test_secret_is_optional_on_update() {
        let template = record(json!({"id": 1, "name": "Ana", "email": "a@b.c", "password": "hash"}));
        let mut form = FormState::for_kind(ResourceKind::Users, &template, FormMode::Update);
        assert_eq!(form.text("password"), "");
        assert_eq!(form.text("name"), "Ana");

        let payload = form.submit().unwrap();
        assert!(!payload.contains_key("password"));
    }

    #[test]
    fn test_secret_is_required_on_create() {
        let mut form = FormState::for_kind(ResourceKind::Users, &Record::new(), FormMode::Create);
        form.set_text("name", "Ana");
        form.set_text("email", "a@b.c");
        assert_eq!(form.submit().unwrap_err()["password"], "Password is required");
    }

    #[test]
    fn test_datetime_round_trip_through_picker_format() {
        let template = record(json!({"startAt": "2030-05-01 08:30:45", "endAt": null}));
        let mut form = FormState::for_kind(ResourceKind::UserRoles, &template, FormMode::Update);
        assert_eq!(form.text("startAt"), "2030-05-01T08:30:45");

        let payload = form.submit().unwrap();
        assert_eq!(payload["startAt"], json!("2030-05-01 08:30:45"));
        assert!(!payload.contains_key("endAt"));
    }

    #[test]
    fn test_booleans_never_fail() {
        let template = record(json!({"enabled": false}));
        let mut form = FormState::from_descriptors(
            infer_descriptors(&template),
            &template,
            FormMode::Create,
        );
        assert!(form.validate().is_empty());

        form.set_flag("enabled", true);
        assert!(form.flag("enabled"));
        assert_eq!(form.submit().unwrap()["enabled"], json!(true));
    }
}
