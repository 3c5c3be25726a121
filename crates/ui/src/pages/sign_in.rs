//! Sign-in Page
//!
//! Shown while nobody is signed in. Picking a provider starts the device
//! authorization: the page shows the code and the URL to approve it at, then
//! waits. The rest of the console stays unreachable until this succeeds.

use dioxus::prelude::*;

use sentinel_client::{AuthError, DeviceAuthorization, Provider};

use crate::services::use_services;
use crate::state::{APP_STATE, Dialog, StatusLevel, notify};
use crate::theme::{self, Tone};

/// Where the sign-in attempt stands
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SignInPhase {
    #[default]
    Idle,
    /// Requesting a code from the provider
    Starting(Provider),
    /// Waiting for the operator to approve in a browser
    Waiting(DeviceAuthorization),
}

impl SignInPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, SignInPhase::Idle)
    }
}

/// Report a failed attempt; a cancelled one is not an error
fn report_sign_in_error(err: &AuthError) {
    match err {
        AuthError::Cancelled => {
            tracing::info!("Sign-in cancelled");
            notify("Sign-in cancelled", StatusLevel::Info);
        }
        other => {
            tracing::error!("Sign-in failed: {}", other);
            APP_STATE
                .write()
                .ui
                .show_dialog(Dialog::Error(other.user_message()));
        }
    }
}

#[component]
pub fn SignInPage() -> Element {
    let services = use_services();
    let mut phase = use_signal(SignInPhase::default);
    let mut task = use_signal(|| None::<Task>);

    let start = use_callback(move |provider: Provider| {
        let auth = services.auth.clone();
        phase.set(SignInPhase::Starting(provider));
        let handle = spawn(async move {
            let authorization = match auth.begin_sign_in(provider).await {
                Ok(authorization) => authorization,
                Err(err) => {
                    phase.set(SignInPhase::Idle);
                    report_sign_in_error(&err);
                    return;
                }
            };
            tracing::info!(
                "Waiting for {} approval at {}",
                provider,
                authorization.verification_uri
            );
            phase.set(SignInPhase::Waiting(authorization.clone()));

            let result = auth.finish_sign_in(&authorization).await;
            phase.set(SignInPhase::Idle);
            task.set(None);
            match result {
                Ok(state) => APP_STATE.write().reset_session(state),
                Err(err) => report_sign_in_error(&err),
            }
        });
        task.set(Some(handle));
    });

    let cancel = move |_| {
        if let Some(handle) = task.write().take() {
            handle.cancel();
        }
        phase.set(SignInPhase::Idle);
        notify("Sign-in cancelled", StatusLevel::Info);
    };

    let r = theme::current();
    let current = phase.read().clone();
    let idle = current.is_idle();

    rsx! {
        div {
            class: "sign-in",
            div {
                class: r.card(),
                h1 { class: r.page_title(), {crate::NAME} }
                p { class: r.label(), "Sign in with one of your accounts to continue." }

                div {
                    class: "sign-in-providers",
                    for provider in Provider::ALL {
                        button {
                            key: "{provider}",
                            class: r.button(Tone::Primary),
                            disabled: !idle,
                            onclick: move |_| start.call(provider),
                            {format!("Continue with {}", provider.display_name())}
                        }
                    }
                }

                match current {
                    SignInPhase::Idle => rsx! {},
                    SignInPhase::Starting(provider) => rsx! {
                        div {
                            class: "sign-in-status",
                            div { class: r.spinner() }
                            p { {format!("Contacting {}...", provider.display_name())} }
                        }
                    },
                    SignInPhase::Waiting(authorization) => rsx! {
                        div {
                            class: "sign-in-status",
                            p { "Open this address in any browser:" }
                            p { class: "sign-in-uri", "{authorization.verification_uri}" }
                            p { "and enter the code:" }
                            p { class: "sign-in-code", "{authorization.user_code}" }
                            div { class: r.spinner() }
                            button {
                                class: r.button(Tone::Secondary),
                                onclick: cancel,
                                "Cancel"
                            }
                        }
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_defaults_to_idle() {
        assert!(SignInPhase::default().is_idle());
        assert!(!SignInPhase::Starting(Provider::GitHub).is_idle());
    }
}
