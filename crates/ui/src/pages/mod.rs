//! Page Components for Sentinel Console
//!
//! Each page owns its data and a `PageController`, fetches once on mount and
//! talks to the backend through the services in context.
//!
//! ## Available Pages
//!
//! - **ResourceListPage**: generic table of any resource, optionally per user
//! - **ResourceFormPage**: generic create/edit form
//! - **SessionsPage**: sessions of a user, create and revoke
//! - **UploadPage**: multipart create/edit (profiles, digital signatures)
//! - **LinkPage**: assign a role, answer a question, grant a permission
//! - **SignInPage**: device-code sign-in with the three providers
//! - **SettingsPage**: visual variant and layout preferences
//!

pub mod form;
pub mod link;
pub mod list;
pub mod sessions;
pub mod settings;
pub mod sign_in;
pub mod upload;

pub use form::ResourceFormPage;
pub use link::LinkPage;
pub use list::ResourceListPage;
pub use sessions::SessionsPage;
pub use settings::SettingsPage;
pub use sign_in::SignInPage;
pub use upload::UploadPage;

use sentinel_client::{AuthState, RequestError};
use sentinel_model::{RecordId, ResourceKind, Scope};

use crate::controller::{Outcome, resolve_failure};
use crate::services::Services;
use crate::state::{APP_STATE, AppState, Dialog, Page, StatusLevel, capitalize, notify};

// ============================================================================
// Failure handling
// ============================================================================

const SESSION_EXPIRED: &str = "Your session has expired. Please sign in again.";

/// Act on a failed request; returns the message when the page should show it
pub(crate) fn report_failure(services: &Services, err: &RequestError, scope: &Scope) -> Option<String> {
    let outcome = resolve_failure(err, scope);
    let toast = apply_failure(&mut APP_STATE.write(), &outcome, || {
        services.auth.on_unauthorized()
    });
    if let Some((text, level)) = toast {
        notify(text, level);
    }
    match outcome {
        Outcome::Error(message) => Some(message),
        _ => None,
    }
}

/// Apply a failure outcome to the app state; returns the toast to raise
fn apply_failure(
    state: &mut AppState,
    outcome: &Outcome,
    sign_out: impl FnOnce() -> AuthState,
) -> Option<(String, StatusLevel)> {
    match outcome {
        Outcome::SignedOut => {
            state.reset_session(sign_out());
            Some((SESSION_EXPIRED.to_string(), StatusLevel::Warning))
        }
        Outcome::Guidance {
            message,
            navigate_to,
        } => {
            state.ui.show_dialog(Dialog::Guidance {
                message: message.clone(),
                navigate_to: navigate_to.clone(),
            });
            None
        }
        Outcome::Error(message) => Some((message.clone(), StatusLevel::Error)),
    }
}

/// Shown in place of an edit form whose record could not be read
pub(crate) fn load_failure_message(kind: ResourceKind) -> String {
    format!("This {} could not be loaded, so it cannot be edited.", kind.singular())
}

/// "Role created", "Digital signature deleted", ...
pub(crate) fn success_message(kind: ResourceKind, verb: &str) -> String {
    format!("{} {}", capitalize(kind.singular()), verb)
}

// ============================================================================
// Navigation rules
// ============================================================================

/// What a row action leads to
#[derive(Debug, Clone, PartialEq)]
pub enum RowCommand {
    Open(Page),
    Delete(RecordId),
}

/// Resolve a row action of a `kind` list shown in `scope`
pub fn row_command(kind: ResourceKind, scope: &Scope, action: &str, id: RecordId) -> Option<RowCommand> {
    let page = match (kind, action) {
        (_, "delete") => return Some(RowCommand::Delete(id)),
        (ResourceKind::Profiles | ResourceKind::DigitalSignatures, "edit") => Page::Upload {
            kind,
            scope: scope.clone(),
            id: Some(id),
        },
        (_, "edit") => Page::Edit {
            kind,
            id,
            scope: scope.clone(),
        },
        (ResourceKind::Users, "addresses") => Page::owned(ResourceKind::Addresses, id),
        (ResourceKind::Users, "passwords") => Page::owned(ResourceKind::Passwords, id),
        (ResourceKind::Users, "profile") => Page::owned(ResourceKind::Profiles, id),
        (ResourceKind::Users, "devices") => Page::owned(ResourceKind::Devices, id),
        (ResourceKind::Users, "roles") => Page::owned(ResourceKind::UserRoles, id),
        (ResourceKind::Users, "sessions") => Page::Sessions { user: id },
        (ResourceKind::Roles, "grant") => Page::Link {
            kind: ResourceKind::RolePermissions,
            owner: id,
        },
        (ResourceKind::SecurityQuestions, "answers") => Page::List {
            kind: ResourceKind::Answers,
            scope: Scope::Question(id),
        },
        _ => return None,
    };
    Some(RowCommand::Open(page))
}

/// Where the "New" button of a `kind` list in `scope` leads, if anywhere
pub fn create_target(kind: ResourceKind, scope: &Scope) -> Option<Page> {
    match (kind, scope) {
        (ResourceKind::Profiles | ResourceKind::DigitalSignatures, Scope::User(_)) => {
            Some(Page::Upload {
                kind,
                scope: scope.clone(),
                id: None,
            })
        }
        (ResourceKind::UserRoles | ResourceKind::Answers, Scope::User(user)) => Some(Page::Link {
            kind,
            owner: user.clone(),
        }),
        (ResourceKind::Sessions, Scope::User(user)) => Some(Page::Sessions { user: user.clone() }),
        (
            ResourceKind::Addresses | ResourceKind::Passwords | ResourceKind::Devices,
            Scope::User(_),
        ) => Some(Page::Create {
            kind,
            scope: scope.clone(),
        }),
        (
            ResourceKind::Users
            | ResourceKind::Roles
            | ResourceKind::Permissions
            | ResourceKind::SecurityQuestions,
            Scope::All,
        ) => Some(Page::Create {
            kind,
            scope: Scope::All,
        }),
        _ => None,
    }
}

/// Page a form returns to after saving or cancelling
pub fn return_page(kind: ResourceKind, scope: &Scope) -> Page {
    match kind {
        ResourceKind::RolePermissions => Page::list(ResourceKind::Roles),
        _ => Page::List {
            kind,
            scope: scope.list_scope(),
        },
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    use sentinel_client::testing::MockTransport;
    use sentinel_client::{ConsoleConfig, HttpMethod, LocalStore};

    use crate::controller::PageController;

    fn uid() -> RecordId {
        RecordId::from(7)
    }

    fn services_over(mock: &MockTransport) -> Services {
        Services::assemble(
            Arc::new(mock.clone()),
            LocalStore::in_memory(),
            ConsoleConfig::default(),
        )
    }

    fn deletes_sent(mock: &MockTransport) -> usize {
        mock.requests()
            .iter()
            .filter(|request| request.method == HttpMethod::Delete)
            .count()
    }

    #[test]
    fn test_conflict_opens_guidance_toward_its_list() {
        let mut state = AppState::new();
        let err = RequestError::Api {
            status: 400,
            message: Some("User already has an address".into()),
        };
        let outcome = resolve_failure(&err, &Scope::User(uid()));

        let toast = apply_failure(&mut state, &outcome, || unreachable!("not signed out"));
        assert_eq!(toast, None);
        let target = Page::owned(ResourceKind::Addresses, uid());
        match &state.ui.active_dialog {
            Some(Dialog::Guidance {
                message,
                navigate_to,
            }) => {
                assert!(message.contains("already has an address"));
                assert_eq!(navigate_to.as_ref(), Some(&target));
            }
            other => panic!("expected guidance, got {:?}", other),
        }

        state.ui.dismiss_dialog();
        assert_eq!(state.ui.active_page, target);
    }

    #[test]
    fn test_plain_failure_is_toasted_not_dialogued() {
        let mut state = AppState::new();
        let outcome = Outcome::Error("Email is taken".into());
        let toast = apply_failure(&mut state, &outcome, || unreachable!("not signed out"));
        assert_eq!(toast, Some(("Email is taken".to_string(), StatusLevel::Error)));
        assert!(state.ui.active_dialog.is_none());
    }

    #[test]
    fn test_rejected_session_resets_to_sign_in() {
        let mut state = AppState::new();
        state.ui.navigate(Page::Settings);
        let toast = apply_failure(&mut state, &Outcome::SignedOut, || AuthState::Unauthenticated);
        assert_eq!(state.auth, AuthState::Unauthenticated);
        assert_eq!(state.ui.active_page, Page::default());
        assert_eq!(toast, Some((SESSION_EXPIRED.to_string(), StatusLevel::Warning)));
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let mock = MockTransport::new();
        let services = services_over(&mock);
        let mut ctl = PageController::new();
        ctl.loaded();

        ctl.request_delete(RecordId::from(4));
        ctl.cancel_delete();
        if let Some(id) = ctl.confirm_delete() {
            services.resource(ResourceKind::Roles).delete(&id).await.unwrap();
        }

        assert_eq!(deletes_sent(&mock), 0);
    }

    #[tokio::test]
    async fn test_confirmed_delete_sends_exactly_one_request() {
        let mock = MockTransport::new();
        mock.respond(204, "");
        let services = services_over(&mock);
        let mut ctl = PageController::new();
        ctl.loaded();

        ctl.request_delete(RecordId::from(4));
        let id = ctl.confirm_delete().unwrap();
        services.resource(ResourceKind::Roles).delete(&id).await.unwrap();
        ctl.finish_mutation();
        assert_eq!(ctl.confirm_delete(), None);

        assert_eq!(deletes_sent(&mock), 1);
        assert!(mock.last_request().url.ends_with("/api/roles/4"));
    }

    #[test]
    fn test_delete_is_a_command_not_a_page() {
        assert_eq!(
            row_command(ResourceKind::Roles, &Scope::All, "delete", uid()),
            Some(RowCommand::Delete(uid()))
        );
    }

    #[test]
    fn test_user_row_actions() {
        assert_eq!(
            row_command(ResourceKind::Users, &Scope::All, "addresses", uid()),
            Some(RowCommand::Open(Page::owned(ResourceKind::Addresses, uid())))
        );
        assert_eq!(
            row_command(ResourceKind::Users, &Scope::All, "sessions", uid()),
            Some(RowCommand::Open(Page::Sessions { user: uid() }))
        );
        assert_eq!(
            row_command(ResourceKind::Users, &Scope::All, "roles", uid()),
            Some(RowCommand::Open(Page::owned(ResourceKind::UserRoles, uid())))
        );
        assert_eq!(row_command(ResourceKind::Users, &Scope::All, "fly", uid()), None);
    }

    #[test]
    fn test_multipart_edit_goes_to_upload() {
        let scope = Scope::User(RecordId::from(3));
        assert_eq!(
            row_command(ResourceKind::Profiles, &scope, "edit", uid()),
            Some(RowCommand::Open(Page::Upload {
                kind: ResourceKind::Profiles,
                scope,
                id: Some(uid()),
            }))
        );
    }

    #[test]
    fn test_create_targets() {
        let user = Scope::User(uid());
        assert_eq!(
            create_target(ResourceKind::Addresses, &user),
            Some(Page::Create {
                kind: ResourceKind::Addresses,
                scope: user.clone()
            })
        );
        assert_eq!(
            create_target(ResourceKind::UserRoles, &user),
            Some(Page::Link {
                kind: ResourceKind::UserRoles,
                owner: uid()
            })
        );
        assert_eq!(create_target(ResourceKind::Addresses, &Scope::All), None);
        assert_eq!(create_target(ResourceKind::Sessions, &Scope::All), None);
        assert_eq!(
            create_target(ResourceKind::Roles, &Scope::All),
            Some(Page::Create {
                kind: ResourceKind::Roles,
                scope: Scope::All
            })
        );
    }

    #[test]
    fn test_return_page_lists_in_owner_scope() {
        let scope = Scope::UserRole {
            user: uid(),
            role: RecordId::from(1),
        };
        assert_eq!(
            return_page(ResourceKind::UserRoles, &scope),
            Page::owned(ResourceKind::UserRoles, uid())
        );
        assert_eq!(
            return_page(ResourceKind::RolePermissions, &Scope::All),
            Page::list(ResourceKind::Roles)
        );
    }

    #[test]
    fn test_load_failure_message_names_the_record() {
        assert_eq!(
            load_failure_message(ResourceKind::Profiles),
            "This profile could not be loaded, so it cannot be edited."
        );
    }

    #[test]
    fn test_success_message() {
        assert_eq!(
            success_message(ResourceKind::DigitalSignatures, "deleted"),
            "Digital signature deleted"
        );
    }
}
