//! Visual renderings
//!
//! One `Renderer` interface, three implementations. Components ask for the
//! active renderer once per render and take every class name from it; none of
//! them branch on the variant themselves.

use sentinel_core::UiVariant;

use crate::state::{APP_STATE, StatusLevel};

/// Intent of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Primary,
    Secondary,
    Danger,
    Info,
}

/// Class vocabulary of one visual rendering
pub trait Renderer: Sync {
    // Layout shell
    fn shell(&self) -> &'static str;
    fn header(&self) -> &'static str;
    fn sidebar(&self) -> &'static str;
    fn sidebar_item(&self, active: bool) -> &'static str;
    fn content(&self) -> &'static str;
    fn page_title(&self) -> &'static str;
    fn card(&self) -> &'static str;

    // Controls
    fn button(&self, tone: Tone) -> &'static str;
    fn input(&self, invalid: bool) -> &'static str;
    fn checkbox(&self) -> &'static str;
    fn label(&self) -> &'static str;
    fn field_error(&self) -> &'static str;

    // Table
    fn table(&self) -> &'static str;
    fn table_head(&self) -> &'static str;
    fn table_row(&self) -> &'static str;
    fn table_cell(&self) -> &'static str;
    fn empty_state(&self) -> &'static str;

    // Overlays
    fn backdrop(&self) -> &'static str;
    fn dialog(&self) -> &'static str;
    fn toast(&self, level: StatusLevel) -> &'static str;
    fn spinner(&self) -> &'static str;
}

// ============================================================================
// Tailwind
// ============================================================================

/// Utility-class look (the default)
#[derive(Debug, Clone, Copy, Default)]
pub struct TailwindRenderer;

impl Renderer for TailwindRenderer {
    fn shell(&self) -> &'static str {
        "tw-shell"
    }
    fn header(&self) -> &'static str {
        "tw-header"
    }
    fn sidebar(&self) -> &'static str {
        "tw-sidebar"
    }
    fn sidebar_item(&self, active: bool) -> &'static str {
        if active { "tw-nav-item tw-nav-item-active" } else { "tw-nav-item" }
    }
    fn content(&self) -> &'static str {
        "tw-content"
    }
    fn page_title(&self) -> &'static str {
        "tw-title"
    }
    fn card(&self) -> &'static str {
        "tw-card"
    }

    fn button(&self, tone: Tone) -> &'static str {
        match tone {
            Tone::Primary => "tw-btn tw-btn-primary",
            Tone::Secondary => "tw-btn tw-btn-secondary",
            Tone::Danger => "tw-btn tw-btn-danger",
            Tone::Info => "tw-btn tw-btn-info",
        }
    }
    fn input(&self, invalid: bool) -> &'static str {
        if invalid { "tw-input tw-input-invalid" } else { "tw-input" }
    }
    fn checkbox(&self) -> &'static str {
        "tw-checkbox"
    }
    fn label(&self) -> &'static str {
        "tw-label"
    }
    fn field_error(&self) -> &'static str {
        "tw-field-error"
    }
    fn table(&self) -> &'static str {
        "tw-table"
    }
    fn table_head(&self) -> &'static str {
        "tw-thead"
    }
    fn table_row(&self) -> &'static str {
        "tw-row"
    }
    fn table_cell(&self) -> &'static str {
        "tw-cell"
    }
    fn empty_state(&self) -> &'static str {
        "tw-empty"
    }

    fn backdrop(&self) -> &'static str {
        "tw-backdrop"
    }
    fn dialog(&self) -> &'static str {
        "tw-dialog"
    }
    fn toast(&self, level: StatusLevel) -> &'static str {
        match level {
            StatusLevel::Info => "tw-toast tw-toast-info",
            StatusLevel::Success => "tw-toast tw-toast-success",
            StatusLevel::Warning => "tw-toast tw-toast-warning",
            StatusLevel::Error => "tw-toast tw-toast-error",
        }
    }
    fn spinner(&self) -> &'static str {
        "tw-spinner"
    }
}

// ============================================================================
// Bootstrap
// ============================================================================

/// Bootstrap 5 class names
#[derive(Debug, Clone, Copy, Default)]
pub struct BootstrapRenderer;

impl Renderer for BootstrapRenderer {
    fn shell(&self) -> &'static str {
        "bs-shell"
    }
    fn header(&self) -> &'static str {
        "navbar navbar-dark bg-dark"
    }
    fn sidebar(&self) -> &'static str {
        "nav flex-column bg-light border-end"
    }
    fn sidebar_item(&self, active: bool) -> &'static str {
        if active { "nav-link active" } else { "nav-link" }
    }
    fn content(&self) -> &'static str {
        "container-fluid py-3"
    }
    fn page_title(&self) -> &'static str {
        "h4 mb-3"
    }
    fn card(&self) -> &'static str {
        "card card-body"
    }

    fn button(&self, tone: Tone) -> &'static str {
        match tone {
            Tone::Primary => "btn btn-primary",
            Tone::Secondary => "btn btn-outline-secondary",
            Tone::Danger => "btn btn-danger",
            Tone::Info => "btn btn-info",
        }
    }
    fn input(&self, invalid: bool) -> &'static str {
        if invalid { "form-control is-invalid" } else { "form-control" }
    }
    fn checkbox(&self) -> &'static str {
        "form-check-input"
    }
    fn label(&self) -> &'static str {
        "form-label"
    }
    fn field_error(&self) -> &'static str {
        "invalid-feedback"
    }
    fn table(&self) -> &'static str {
        "table table-striped table-hover"
    }
    fn table_head(&self) -> &'static str {
        "table-dark"
    }
    fn table_row(&self) -> &'static str {
        "bs-row"
    }
    fn table_cell(&self) -> &'static str {
        "align-middle"
    }
    fn empty_state(&self) -> &'static str {
        "alert alert-secondary"
    }

    fn backdrop(&self) -> &'static str {
        "modal-backdrop show"
    }
    fn dialog(&self) -> &'static str {
        "modal-content"
    }
    fn toast(&self, level: StatusLevel) -> &'static str {
        match level {
            StatusLevel::Info => "toast show text-bg-info",
            StatusLevel::Success => "toast show text-bg-success",
            StatusLevel::Warning => "toast show text-bg-warning",
            StatusLevel::Error => "toast show text-bg-danger",
        }
    }
    fn spinner(&self) -> &'static str {
        "spinner-border"
    }
}

// ============================================================================
// Material
// ============================================================================

/// Material Design class names
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialRenderer;

impl Renderer for MaterialRenderer {
    fn shell(&self) -> &'static str {
        "md-shell"
    }
    fn header(&self) -> &'static str {
        "mdc-top-app-bar"
    }
    fn sidebar(&self) -> &'static str {
        "mdc-drawer"
    }
    fn sidebar_item(&self, active: bool) -> &'static str {
        if active {
            "mdc-list-item mdc-list-item--activated"
        } else {
            "mdc-list-item"
        }
    }
    fn content(&self) -> &'static str {
        "md-content"
    }
    fn page_title(&self) -> &'static str {
        "mdc-typography--headline5"
    }
    fn card(&self) -> &'static str {
        "mdc-card"
    }

    fn button(&self, tone: Tone) -> &'static str {
        match tone {
            Tone::Primary => "mdc-button mdc-button--raised",
            Tone::Secondary => "mdc-button mdc-button--outlined",
            Tone::Danger => "mdc-button mdc-button--raised md-danger",
            Tone::Info => "mdc-button",
        }
    }
    fn input(&self, invalid: bool) -> &'static str {
        if invalid {
            "mdc-text-field__input md-invalid"
        } else {
            "mdc-text-field__input"
        }
    }
    fn checkbox(&self) -> &'static str {
        "mdc-checkbox__native-control"
    }
    fn label(&self) -> &'static str {
        "mdc-floating-label"
    }
    fn field_error(&self) -> &'static str {
        "mdc-text-field-helper-text md-error"
    }
    fn table(&self) -> &'static str {
        "mdc-data-table__table"
    }
    fn table_head(&self) -> &'static str {
        "mdc-data-table__header-row"
    }
    fn table_row(&self) -> &'static str {
        "mdc-data-table__row"
    }
    fn table_cell(&self) -> &'static str {
        "mdc-data-table__cell"
    }
    fn empty_state(&self) -> &'static str {
        "md-empty"
    }

    fn backdrop(&self) -> &'static str {
        "mdc-dialog__scrim"
    }
    fn dialog(&self) -> &'static str {
        "mdc-dialog__surface"
    }
    fn toast(&self, level: StatusLevel) -> &'static str {
        match level {
            StatusLevel::Error => "mdc-snackbar__surface md-danger",
            StatusLevel::Warning => "mdc-snackbar__surface md-warning",
            _ => "mdc-snackbar__surface",
        }
    }
    fn spinner(&self) -> &'static str {
        "mdc-circular-progress"
    }
}

// ============================================================================
// Selection
// ============================================================================

static TAILWIND: TailwindRenderer = TailwindRenderer;
static BOOTSTRAP: BootstrapRenderer = BootstrapRenderer;
static MATERIAL: MaterialRenderer = MaterialRenderer;

/// Renderer for a variant
pub fn renderer(variant: UiVariant) -> &'static dyn Renderer {
    match variant {
        UiVariant::Tailwind => &TAILWIND,
        UiVariant::Bootstrap => &BOOTSTRAP,
        UiVariant::Material => &MATERIAL,
    }
}

/// Renderer for the variant currently selected
pub fn current() -> &'static dyn Renderer {
    renderer(APP_STATE.read().ui.variant)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_matches_variant() {
        assert_eq!(renderer(UiVariant::Tailwind).shell(), "tw-shell");
        assert_eq!(renderer(UiVariant::Bootstrap).shell(), "bs-shell");
        assert_eq!(renderer(UiVariant::Material).shell(), "md-shell");
    }

    #[test]
    fn test_variants_differ() {
        let classes: Vec<&str> = UiVariant::ALL
            .iter()
            .map(|v| renderer(*v).button(Tone::Primary))
            .collect();
        assert_ne!(classes[0], classes[1]);
        assert_ne!(classes[1], classes[2]);
    }

    #[test]
    fn test_invalid_input_is_marked() {
        for variant in UiVariant::ALL {
            let r = renderer(variant);
            assert_ne!(r.input(true), r.input(false));
        }
    }
}
