//! Page controller
//!
//! Pure page state shared by every resource page: the load/mutate status, the
//! one-shot fetch guard and the pending delete confirmation. Pages keep one in a
//! signal and do the I/O themselves.

use sentinel_client::RequestError;
use sentinel_model::{RecordId, Scope};

use crate::state::Page;

/// Where a page stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageStatus {
    #[default]
    Loading,
    Ready,
    Mutating,
    /// The record behind the page could not be read; nothing may be saved
    Failed,
}

/// What the page should do about a failed request
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Recoverable domain conflict: show guidance, then move to the related list
    Guidance {
        message: String,
        navigate_to: Option<Page>,
    },
    /// Stay on the page and show the message
    Error(String),
    /// The backend rejected the session
    SignedOut,
}

/// State machine behind a resource page
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageController {
    status: PageStatus,
    fetched: bool,
    pending_delete: Option<RecordId>,
}

impl PageController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> PageStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == PageStatus::Loading
    }

    pub fn is_busy(&self) -> bool {
        self.status == PageStatus::Mutating
    }

    pub fn is_failed(&self) -> bool {
        self.status == PageStatus::Failed
    }

    /// True exactly once per mount, however often the page re-renders
    pub fn should_fetch(&mut self) -> bool {
        if self.fetched {
            return false;
        }
        self.fetched = true;
        self.status = PageStatus::Loading;
        true
    }

    /// Data arrived (or the fetch failed); the page is usable again
    pub fn loaded(&mut self) {
        self.status = PageStatus::Ready;
    }

    pub fn load_failed(&mut self) {
        self.status = PageStatus::Failed;
    }

    /// Enter `Mutating`; false when a mutation is already running or the
    /// load failed
    pub fn begin_mutation(&mut self) -> bool {
        if matches!(self.status, PageStatus::Mutating | PageStatus::Failed) {
            return false;
        }
        self.status = PageStatus::Mutating;
        true
    }

    pub fn finish_mutation(&mut self) {
        self.status = PageStatus::Ready;
    }

    /// Arm the fetch guard again so the list is re-read
    pub fn refresh(&mut self) {
        self.fetched = false;
    }

    // ========================================================================
    // Delete confirmation
    // ========================================================================

    pub fn request_delete(&mut self, id: RecordId) {
        self.pending_delete = Some(id);
    }

    pub fn pending_delete(&self) -> Option<&RecordId> {
        self.pending_delete.as_ref()
    }

    /// The id to delete, only when a request is pending
    pub fn confirm_delete(&mut self) -> Option<RecordId> {
        let id = self.pending_delete.take()?;
        self.status = PageStatus::Mutating;
        Some(id)
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }
}

/// Classify a failed request made in `scope`
pub fn resolve_failure(err: &RequestError, scope: &Scope) -> Outcome {
    if err.is_unauthorized() {
        return Outcome::SignedOut;
    }

    if let Some(conflict) = err.conflict() {
        tracing::warn!("Domain conflict: {}", conflict.resource);
        let navigate_to = conflict.kind.map(|kind| match scope.user() {
            Some(user) if kind.is_user_owned() => Page::owned(kind, user.clone()),
            _ => Page::list(kind),
        });
        return Outcome::Guidance {
            message: conflict.guidance(),
            navigate_to,
        };
    }

    tracing::error!("Request failed: {}", err);
    Outcome::Error(err.user_message())
}

// ============================================================================
// Tests
// ============================================================================
