//! # Sentinel UI
//!
//! Dioxus Desktop UI for the Sentinel administration console.
//!
//! ## Features
//!
//! - Federated sign-in; nothing else is reachable without it
//! - Generic list, create and edit pages over every Sentinel resource
//! - Per-user pages: addresses, passwords, profile, sessions, devices, roles
//! - Three interchangeable visual variants picked at runtime
//!

// ============================================================================
// Modules
// ============================================================================

pub mod app;
pub mod components;
pub mod controller;
pub mod pages;
pub mod services;
pub mod state;
pub mod theme;

// ============================================================================
// Re-exports
// ============================================================================

pub use sentinel_client;
pub use sentinel_model;

pub use app::App;
pub use controller::{Outcome, PageController, PageStatus, resolve_failure};
pub use services::Services;
pub use state::{APP_STATE, AppState, Dialog, Page, StatusLevel, Toast, UiState};
pub use theme::{Renderer, Tone};

// ============================================================================
// Constants
// ============================================================================

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = "Sentinel Console";

/// Application display title
pub const TITLE: &str = "Sentinel Console - Security Administration";

/// Styles for all three variants, embedded at build time
const STYLES: &str = include_str!("../../../assets/styles/main.css");

// ============================================================================
// Launch Function
// ============================================================================

/// Launch the desktop console over already-built services
///
/// ```rust,ignore
/// let services = Services::build(ConsoleConfig::load()?)?;
/// sentinel_ui::launch(services);
/// ```
pub fn launch(services: Services) {
    tracing::info!("Starting {} v{}", NAME, VERSION);
    tracing::info!("Backend at {}", services.config.api_url);

    let custom_head = format!(r#"<style type="text/css">{}</style>"#, STYLES);

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(
                    dioxus::desktop::WindowBuilder::new()
                        .with_title(TITLE)
                        .with_resizable(true)
                        .with_inner_size(dioxus::desktop::LogicalSize::new(1280.0, 820.0))
                        .with_min_inner_size(dioxus::desktop::LogicalSize::new(800.0, 600.0)),
                )
                .with_menu(None)
                .with_custom_head(custom_head),
        )
        .with_context(services)
        .launch(App);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_title() {
        assert!(TITLE.starts_with(NAME));
    }

    #[test]
    fn test_styles_cover_every_variant() {
        assert!(STYLES.contains(".tw-shell"));
        assert!(STYLES.contains(".bs-shell"));
        assert!(STYLES.contains(".md-shell"));
    }
}
