//! # Input Components
//!
//! Form inputs used by the generic form and the hand-built pages:
//! - **TextInput**: single-line input of any HTML type
//! - **Select**: dropdown over a list of options
//! - **Checkbox**: boolean field
//! - **FileInput**: native file picker button
//!
//! Class names come from the active renderer.

use dioxus::prelude::*;

use crate::theme::{self, Tone};

// ============================================================================
// Text Input Component
// ============================================================================

/// Properties for TextInput component
#[derive(Props, Clone, PartialEq)]
pub struct TextInputProps {
    /// Input value
    pub value: String,

    /// Label text (optional)
    #[props(default)]
    pub label: Option<String>,

    /// Placeholder text
    #[props(default)]
    pub placeholder: Option<String>,

    /// Error message (shows error state)
    #[props(default)]
    pub error: Option<String>,

    /// Whether the input is required
    #[props(default = false)]
    pub required: bool,

    /// Whether the input is disabled
    #[props(default = false)]
    pub disabled: bool,

    /// Input type (text, email, password, number, datetime-local)
    #[props(default = "text".to_string())]
    pub input_type: String,

    /// Value granularity (`step` attribute)
    #[props(default)]
    pub step: Option<String>,

    /// Change handler
    #[props(default)]
    pub on_change: EventHandler<String>,

    /// Enter key handler
    #[props(default)]
    pub on_enter: EventHandler<()>,
}

/// Single-line text input component
#[component]
pub fn TextInput(props: TextInputProps) -> Element {
    let r = theme::current();

    rsx! {
        div {
            class: "input-group",

            if let Some(label) = &props.label {
                label {
                    class: r.label(),
                    "{label}"
                    if props.required {
                        span { class: "required-mark", "*" }
                    }
                }
            }

            input {
                class: r.input(props.error.is_some()),
                r#type: "{props.input_type}",
                step: props.step.clone(),
                value: "{props.value}",
                placeholder: props.placeholder.as_deref().unwrap_or(""),
                disabled: props.disabled,
                oninput: move |e| props.on_change.call(e.value()),
                onkeydown: move |e| {
                    if e.key() == Key::Enter {
                        props.on_enter.call(());
                    }
                },
            }

            if let Some(error) = &props.error {
                p { class: r.field_error(), "{error}" }
            }
        }
    }
}

// ============================================================================
// Select Component
// ============================================================================

/// A single option for the Select component
#[derive(Clone, PartialEq, Debug)]
pub struct SelectOption {
    /// Option value
    pub value: String,
    /// Display label
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Properties for Select component
#[derive(Props, Clone, PartialEq)]
pub struct SelectProps {
    /// Selected value
    pub value: String,

    /// Available options
    pub options: Vec<SelectOption>,

    /// Label text
    #[props(default)]
    pub label: Option<String>,

    /// Placeholder (shown when no selection)
    #[props(default)]
    pub placeholder: Option<String>,

    /// Error message
    #[props(default)]
    pub error: Option<String>,

    /// Whether disabled
    #[props(default = false)]
    pub disabled: bool,

    /// Change handler
    #[props(default)]
    pub on_change: EventHandler<String>,
}

/// Dropdown select component
#[component]
pub fn Select(props: SelectProps) -> Element {
    let r = theme::current();

    rsx! {
        div {
            class: "input-group",

            if let Some(label) = &props.label {
                label { class: r.label(), "{label}" }
            }

            select {
                class: r.input(props.error.is_some()),
                disabled: props.disabled,
                onchange: move |e| props.on_change.call(e.value()),

                if let Some(placeholder) = &props.placeholder {
                    option {
                        value: "",
                        disabled: true,
                        selected: props.value.is_empty(),
                        "{placeholder}"
                    }
                }

                for option in &props.options {
                    option {
                        key: "{option.value}",
                        value: "{option.value}",
                        selected: props.value == option.value,
                        "{option.label}"
                    }
                }
            }

            if let Some(error) = &props.error {
                p { class: r.field_error(), "{error}" }
            }
        }
    }
}

// ============================================================================
// Checkbox Component
// ============================================================================

/// Properties for Checkbox component
#[derive(Props, Clone, PartialEq)]
pub struct CheckboxProps {
    /// Whether checked
    pub checked: bool,

    /// Label text
    #[props(default)]
    pub label: Option<String>,

    /// Whether disabled
    #[props(default = false)]
    pub disabled: bool,

    /// Change handler
    #[props(default)]
    pub on_change: EventHandler<bool>,
}

/// Checkbox input component
#[component]
pub fn Checkbox(props: CheckboxProps) -> Element {
    let r = theme::current();

    rsx! {
        label {
            class: "checkbox-wrapper",
            input {
                class: r.checkbox(),
                r#type: "checkbox",
                checked: props.checked,
                disabled: props.disabled,
                onchange: move |_| {
                    if !props.disabled {
                        props.on_change.call(!props.checked);
                    }
                },
            }
            if let Some(label) = &props.label {
                span { class: r.label(), "{label}" }
            }
        }
    }
}

// ============================================================================
// File Input Component
// ============================================================================

/// Properties for FileInput component
#[derive(Props, Clone, PartialEq)]
pub struct FileInputProps {
    /// Name of the file picked so far
    #[props(default)]
    pub file_name: Option<String>,

    /// Button label
    #[props(default = "Choose file".to_string())]
    pub label: String,

    #[props(default = false)]
    pub disabled: bool,

    /// Clicked; the caller opens the native dialog
    #[props(default)]
    pub on_pick: EventHandler<()>,
}

/// Button that opens a native file dialog, with the picked file's name
#[component]
pub fn FileInput(props: FileInputProps) -> Element {
    let r = theme::current();
    let shown = props.file_name.clone().unwrap_or_else(|| "No file selected".to_string());

    rsx! {
        div {
            class: "input-group file-input",
            button {
                class: r.button(Tone::Secondary),
                r#type: "button",
                disabled: props.disabled,
                onclick: move |_| props.on_pick.call(()),
                "{props.label}"
            }
            span { class: r.label(), "{shown}" }
        }
    }
}
