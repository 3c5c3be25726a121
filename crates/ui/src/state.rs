//! Application State Management for Sentinel Console
//!
//! Centralized state using Dioxus 0.7 Signals: the auth state, the current
//! page, the active dialog and the toast queue. Page data (records, form
//! values) lives in the pages themselves and is re-fetched on every visit.

use dioxus::prelude::*;
use std::time::Duration;
use uuid::Uuid;

use sentinel_client::AuthState;
use sentinel_core::UiVariant;
use sentinel_model::{RecordId, ResourceKind, Scope};

/// How long a toast stays on screen
pub const TOAST_TTL: Duration = Duration::from_secs(4);

// ============================================================================
// Page Navigation
// ============================================================================

/// Console pages
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Page {
    /// Table of one resource, optionally under a parent
    List { kind: ResourceKind, scope: Scope },
    /// Generic create form
    Create { kind: ResourceKind, scope: Scope },
    /// Generic edit form
    Edit {
        kind: ResourceKind,
        id: RecordId,
        scope: Scope,
    },
    /// Sessions of a user, with create and revoke
    Sessions { user: RecordId },
    /// Multipart record (profile, digital signature): created under a user,
    /// or edited by id
    Upload {
        kind: ResourceKind,
        scope: Scope,
        id: Option<RecordId>,
    },
    /// Join record between an owner and a picked target
    /// (user → role, user → question, role → permission)
    Link { kind: ResourceKind, owner: RecordId },
    /// Preferences
    Settings,
}

impl Default for Page {
    fn default() -> Self {
        Page::list(ResourceKind::Users)
    }
}

impl Page {
    /// Top-level list of a resource
    pub fn list(kind: ResourceKind) -> Self {
        Page::List {
            kind,
            scope: Scope::All,
        }
    }

    /// List of a resource owned by `user`
    pub fn owned(kind: ResourceKind, user: RecordId) -> Self {
        Page::List {
            kind,
            scope: Scope::User(user),
        }
    }

    /// Entries shown in the sidebar, in order
    pub fn sidebar() -> Vec<Page> {
        vec![
            Page::list(ResourceKind::Users),
            Page::list(ResourceKind::Roles),
            Page::list(ResourceKind::Permissions),
            Page::list(ResourceKind::UserRoles),
            Page::list(ResourceKind::SecurityQuestions),
            Page::list(ResourceKind::Answers),
            Page::list(ResourceKind::Devices),
            Page::list(ResourceKind::DigitalSignatures),
            Page::Settings,
        ]
    }

    /// Resource the page works on, if any
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            Page::List { kind, .. }
            | Page::Create { kind, .. }
            | Page::Edit { kind, .. }
            | Page::Upload { kind, .. }
            | Page::Link { kind, .. } => Some(*kind),
            Page::Sessions { .. } => Some(ResourceKind::Sessions),
            Page::Settings => None,
        }
    }

    /// Sidebar entry this page belongs under
    pub fn section(&self) -> Page {
        match self {
            Page::Settings => Page::Settings,
            Page::List {
                kind,
                scope: Scope::All,
            } if Page::sidebar().contains(&Page::list(*kind)) => Page::list(*kind),
            Page::Link {
                kind: ResourceKind::RolePermissions,
                ..
            } => Page::list(ResourceKind::Roles),
            _ => Page::list(ResourceKind::Users),
        }
    }

    /// Heading shown above the page
    pub fn title(&self) -> String {
        match self {
            Page::List {
                kind,
                scope: Scope::All,
            } => kind.display_name().to_string(),
            Page::List {
                kind,
                scope: Scope::User(user),
            } => format!("{} of user {}", kind.display_name(), user),
            Page::List { kind, scope } => format!("{} {}", kind.display_name(), scope),
            Page::Create { kind, .. } => format!("New {}", kind.singular()),
            Page::Edit { kind, id, .. } => format!("Edit {} {}", kind.singular(), id),
            Page::Sessions { user } => format!("Sessions of user {}", user),
            Page::Upload {
                kind,
                id: Some(id),
                ..
            } => format!("Edit {} {}", kind.singular(), id),
            Page::Upload { kind, scope, .. } => match scope.user() {
                Some(user) => format!("{} of user {}", capitalize(kind.singular()), user),
                None => format!("New {}", kind.singular()),
            },
            Page::Link { kind, owner } => match kind {
                ResourceKind::RolePermissions => format!("Grant a permission to role {}", owner),
                ResourceKind::Answers => format!("Answer a question for user {}", owner),
                _ => format!("Assign a role to user {}", owner),
            },
            Page::Settings => "Settings".to_string(),
        }
    }

    /// Icon for the sidebar
    pub fn icon(&self) -> &'static str {
        match self.kind() {
            Some(ResourceKind::Users) => "👤",
            Some(ResourceKind::Roles) => "🛡️",
            Some(ResourceKind::Permissions) => "🔑",
            Some(ResourceKind::UserRoles) => "🔗",
            Some(ResourceKind::SecurityQuestions) => "❓",
            Some(ResourceKind::Answers) => "💬",
            Some(ResourceKind::Devices) => "💻",
            Some(ResourceKind::DigitalSignatures) => "✍️",
            Some(_) => "📄",
            None => "🔧",
        }
    }

    /// Label in the sidebar
    pub fn nav_label(&self) -> String {
        match self {
            Page::Settings => "Settings".to_string(),
            Page::List {
                kind: ResourceKind::UserRoles,
                ..
            } => "User roles".to_string(),
            Page::List {
                kind: ResourceKind::SecurityQuestions,
                ..
            } => "Security questions".to_string(),
            Page::List {
                kind: ResourceKind::DigitalSignatures,
                ..
            } => "Digital signatures".to_string(),
            other => other
                .kind()
                .map(|k| k.display_name().to_string())
                .unwrap_or_default(),
        }
    }
}

pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Dialogs and Toasts
// ============================================================================

/// Global modal dialogs
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    /// Recoverable domain conflict: explain, then go to the related list
    Guidance {
        message: String,
        navigate_to: Option<Page>,
    },
    /// Sign-in failure that needs the operator's attention
    Error(String),
    About,
}

/// Status message severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient notification
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub text: String,
    pub level: StatusLevel,
}

// ============================================================================
// UI State
// ============================================================================

/// General UI state
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    /// Whether the sidebar is collapsed
    pub sidebar_collapsed: bool,
    /// Currently active page
    pub active_page: Page,
    /// Active dialog (if any)
    pub active_dialog: Option<Dialog>,
    /// Visible toasts, oldest first
    pub toasts: Vec<Toast>,
    /// Visual rendering in use
    pub variant: UiVariant,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_collapsed: false,
            active_page: Page::default(),
            active_dialog: None,
            toasts: Vec::new(),
            variant: UiVariant::default(),
        }
    }
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigate to a page; any open dialog is closed
    pub fn navigate(&mut self, page: Page) {
        tracing::info!("Navigating to {}", page.title());
        self.active_page = page;
        self.active_dialog = None;
    }

    pub fn show_dialog(&mut self, dialog: Dialog) {
        self.active_dialog = Some(dialog);
    }

    pub fn close_dialog(&mut self) {
        self.active_dialog = None;
    }

    /// Close the active dialog however it was dismissed; guidance always
    /// moves on to its related list
    pub fn dismiss_dialog(&mut self) {
        if let Some(Dialog::Guidance {
            navigate_to: Some(page),
            ..
        }) = self.active_dialog.take()
        {
            self.navigate(page);
        }
    }

    /// Queue a toast and return its id
    pub fn push_toast(&mut self, text: impl Into<String>, level: StatusLevel) -> Uuid {
        let id = Uuid::new_v4();
        self.toasts.push(Toast {
            id,
            text: text.into(),
            level,
        });
        id
    }

    pub fn dismiss_toast(&mut self, id: Uuid) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Main application state container
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Who is signed in; the only copy of it in the UI
    pub auth: AuthState,
    /// UI state
    pub ui: UiState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything tied to the previous operator
    pub fn reset_session(&mut self, auth: AuthState) {
        self.auth = auth;
        self.ui.active_page = Page::default();
        self.ui.active_dialog = None;
    }
}

/// Global application state signal
pub static APP_STATE: GlobalSignal<AppState> = Signal::global(AppState::new);

/// Show a toast that dismisses itself after [`TOAST_TTL`]
pub fn notify(text: impl Into<String>, level: StatusLevel) {
    let id = APP_STATE.write().ui.push_toast(text, level);
    spawn(async move {
        tokio::time::sleep(TOAST_TTL).await;
        APP_STATE.write().ui.dismiss_toast(id);
    });
}

/// Navigate from an event handler
pub fn navigate(page: Page) {
    APP_STATE.write().ui.navigate(page);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_is_users() {
        assert_eq!(Page::default(), Page::list(ResourceKind::Users));
    }

    #[test]
    fn test_sidebar_order() {
        let labels: Vec<String> = Page::sidebar().iter().map(Page::nav_label).collect();
        assert_eq!(
            labels,
            vec![
                "Users",
                "Roles",
                "Permissions",
                "User roles",
                "Security questions",
                "Answers",
                "Devices",
                "Digital signatures",
                "Settings",
            ]
        );
    }

    #[test]
    fn test_section_of_nested_pages() {
        let user = RecordId::from(3);
        assert_eq!(
            Page::owned(ResourceKind::Addresses, user.clone()).section(),
            Page::list(ResourceKind::Users)
        );
        assert_eq!(
            Page::Link {
                kind: ResourceKind::RolePermissions,
                owner: user
            }
            .section(),
            Page::list(ResourceKind::Roles)
        );
        assert_eq!(
            Page::list(ResourceKind::Devices).section(),
            Page::list(ResourceKind::Devices)
        );
    }

    #[test]
    fn test_titles() {
        let user = RecordId::from(7);
        assert_eq!(
            Page::owned(ResourceKind::Addresses, user.clone()).title(),
            "Addresses of user 7"
        );
        assert_eq!(
            Page::Create {
                kind: ResourceKind::Roles,
                scope: Scope::All
            }
            .title(),
            "New role"
        );
        assert_eq!(
            Page::Upload {
                kind: ResourceKind::Profiles,
                scope: Scope::User(user),
                id: None,
            }
            .title(),
            "Profile of user 7"
        );
        assert_eq!(
            Page::Upload {
                kind: ResourceKind::DigitalSignatures,
                scope: Scope::All,
                id: Some(RecordId::from(2)),
            }
            .title(),
            "Edit digital signature 2"
        );
    }

    #[test]
    fn test_ui_state_navigation_closes_dialog() {
        let mut ui = UiState::new();
        ui.show_dialog(Dialog::About);
        ui.navigate(Page::Settings);
        assert_eq!(ui.active_page, Page::Settings);
        assert!(ui.active_dialog.is_none());
    }

    #[test]
    fn test_dismissing_guidance_moves_to_its_list() {
        let target = Page::list(ResourceKind::Roles);
        let mut ui = UiState::new();
        ui.show_dialog(Dialog::Guidance {
            message: "Role is still assigned".to_string(),
            navigate_to: Some(target.clone()),
        });
        ui.dismiss_dialog();
        assert_eq!(ui.active_page, target);
        assert!(ui.active_dialog.is_none());
    }

    #[test]
    fn test_dismissing_other_dialogs_stays_put() {
        let mut ui = UiState::new();
        ui.navigate(Page::Settings);
        ui.show_dialog(Dialog::Guidance {
            message: "Nothing to do".to_string(),
            navigate_to: None,
        });
        ui.dismiss_dialog();
        assert_eq!(ui.active_page, Page::Settings);
        assert!(ui.active_dialog.is_none());

        ui.show_dialog(Dialog::Error("boom".to_string()));
        ui.dismiss_dialog();
        assert_eq!(ui.active_page, Page::Settings);
        assert!(ui.active_dialog.is_none());
    }

    #[test]
    fn test_toasts() {
        let mut ui = UiState::new();
        let first = ui.push_toast("Saved", StatusLevel::Success);
        ui.push_toast("Oops", StatusLevel::Error);
        assert_eq!(ui.toasts.len(), 2);
        ui.dismiss_toast(first);
        assert_eq!(ui.toasts.len(), 1);
        assert_eq!(ui.toasts[0].text, "Oops");
    }

    #[test]
    fn test_reset_session() {
        let mut state = AppState::new();
        state.ui.navigate(Page::Settings);
        state.reset_session(AuthState::Unauthenticated);
        assert_eq!(state.ui.active_page, Page::default());
        assert_eq!(state.auth, AuthState::Unauthenticated);
    }
}
