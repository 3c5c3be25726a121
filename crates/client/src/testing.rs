//! In-process transport for tests
//!
//! Available to other crates through the `testing` feature.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::{RequestError, RequestResult};
use crate::transport::{HttpRequest, HttpResponse, Transport};

#[cfg(test)]
use crate::storage::{LocalStore, keys};

/// Records every request and replays queued responses in order
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<RequestResult<HttpResponse>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: impl Into<String>) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(&self, error: RequestError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> RequestResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RequestError::Network("no canned response".into())))
    }
}

/// A store holding a stale session whose file can no longer be written
///
/// Keep the returned directory alive for the duration of the test.
#[cfg(test)]
pub(crate) fn unwritable_store() -> (tempfile::TempDir, LocalStore) {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state");
    let store = LocalStore::open(state.join("storage.json")).unwrap();
    store.set(keys::REFRESH_TOKEN, "old").unwrap();
    store.set(keys::TOKEN, "stale").unwrap();

    // A plain file where the state directory was
    std::fs::remove_dir_all(&state).unwrap();
    std::fs::write(&state, "").unwrap();
    (dir, store)
}
