//! Bearer token and user projection, as persisted in the local store

use sentinel_core::ConsoleResult;
use sentinel_model::ClientUser;

use crate::identity::IdentitySession;
use crate::storage::{LocalStore, keys};

/// View of the local store holding the signed-in identity
#[derive(Debug, Clone)]
pub struct AuthStore {
    store: LocalStore,
}

impl AuthStore {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(keys::TOKEN).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(keys::REFRESH_TOKEN).filter(|t| !t.is_empty())
    }

    /// Stored user projection; an unreadable entry counts as absent
    pub fn user(&self) -> Option<ClientUser> {
        let text = self.store.get(keys::USER)?;
        match serde_json::from_str(&text) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Discarding unreadable stored user: {}", e);
                None
            }
        }
    }

    /// Both a token and a user are stored
    pub fn is_signed_in(&self) -> bool {
        self.token().is_some() && self.user().is_some()
    }

    /// Persist a freshly signed-in session; token and user land together or not at all
    pub fn persist(&self, session: &IdentitySession) -> ConsoleResult<()> {
        let mut set = vec![
            (keys::USER, serde_json::to_string(&session.user)?),
            (keys::TOKEN, session.id_token.clone()),
        ];
        let mut remove = Vec::new();
        match &session.refresh_token {
            Some(refresh) => set.push((keys::REFRESH_TOKEN, refresh.clone())),
            None => remove.push(keys::REFRESH_TOKEN),
        }
        self.store.update(&set, &remove)
    }

    /// Forget the identity; preferences are kept
    pub fn clear(&self) -> ConsoleResult<()> {
        self.store
            .remove_all(&[keys::TOKEN, keys::USER, keys::REFRESH_TOKEN])
    }
}

// ============================================================================
// Tests
// ============================================================================
