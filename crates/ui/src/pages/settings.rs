//! Settings Page
//!
//! Visual variant and layout preferences. Changes apply at once and are
//! written to the local store so the next launch starts the same way.

use dioxus::prelude::*;
use std::str::FromStr;

use sentinel_core::UiVariant;

use crate::components::inputs::{Checkbox, Select, SelectOption};
use crate::services::use_services;
use crate::state::{APP_STATE, Dialog, StatusLevel, notify};
use crate::theme::{self, Tone};

fn variant_options() -> Vec<SelectOption> {
    UiVariant::ALL
        .iter()
        .map(|v| SelectOption::new(v.as_str(), v.display_name()))
        .collect()
}

#[component]
pub fn SettingsPage() -> Element {
    let services = use_services();
    let preferences = services.preferences.clone();
    let sidebar_preferences = services.preferences.clone();

    let r = theme::current();
    let (variant, collapsed) = {
        let state = APP_STATE.read();
        (state.ui.variant, state.ui.sidebar_collapsed)
    };
    let api_url = services.config.api_url.clone();
    let state_dir = services.config.state_dir.display().to_string();

    rsx! {
        div {
            class: "page",
            h1 { class: r.page_title(), "Settings" }

            div {
                class: r.card(),
                h2 { class: r.label(), "Appearance" }
                Select {
                    value: variant.as_str().to_string(),
                    options: variant_options(),
                    label: "Visual style",
                    on_change: move |value: String| {
                        let picked = match UiVariant::from_str(&value) {
                            Ok(picked) => picked,
                            Err(err) => {
                                tracing::warn!("Ignoring variant '{}': {}", value, err);
                                return;
                            }
                        };
                        APP_STATE.write().ui.variant = picked;
                        if let Err(err) = preferences.set_ui_variant(picked) {
                            tracing::error!("Could not save the visual style: {}", err);
                            notify("The visual style could not be saved", StatusLevel::Error);
                        }
                    },
                }
                Checkbox {
                    checked: collapsed,
                    label: "Collapse the sidebar",
                    on_change: move |flag: bool| {
                        APP_STATE.write().ui.sidebar_collapsed = flag;
                        if let Err(err) = sidebar_preferences.set_sidebar_collapsed(flag) {
                            tracing::error!("Could not save the sidebar layout: {}", err);
                            notify("The sidebar layout could not be saved", StatusLevel::Error);
                        }
                    },
                }
            }

            div {
                class: r.card(),
                h2 { class: r.label(), "Connection" }
                dl {
                    class: "settings-list",
                    dt { "Backend" }
                    dd { "{api_url}" }
                    dt { "Local data" }
                    dd { "{state_dir}" }
                }
            }

            div {
                class: "form-actions",
                button {
                    class: r.button(Tone::Secondary),
                    onclick: move |_| APP_STATE.write().ui.show_dialog(Dialog::About),
                    "About"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_variant_options_cover_every_variant() {
        let values: Vec<String> = variant_options().into_iter().map(|o| o.value).collect();
        let expected: Vec<String> = UiVariant::ALL.iter().map(|v| v.as_str().to_string()).collect();
        assert_eq!(values, expected);
    }
}
