//! Service wiring
//!
//! Everything the pages talk to, built once at startup and handed to the
//! Dioxus root as context.

use std::sync::Arc;

use dioxus::prelude::*;

use sentinel_client::{
    ApiClient, AuthContext, AuthStore, ConsoleConfig, FirebaseIdentity, LocalStore, Preferences,
    ReqwestTransport, ResourceClient, Transport,
};
use sentinel_core::{ConsoleError, ConsoleResult};
use sentinel_model::ResourceKind;

/// Shared handles to the backend, the identity provider and local state
#[derive(Clone)]
pub struct Services {
    pub api: ApiClient,
    pub auth: AuthContext,
    pub preferences: Preferences,
    pub config: ConsoleConfig,
}

impl Services {
    /// Build the production services from a loaded configuration
    pub fn build(config: ConsoleConfig) -> ConsoleResult<Self> {
        let transport: Arc<dyn Transport> = Arc::new(
            ReqwestTransport::new(config.http_timeout())
                .map_err(|err| ConsoleError::internal(format!("HTTP client: {}", err)))?,
        );
        let store = LocalStore::open(config.store_path())?;
        tracing::info!("Local state at {}", config.store_path().display());

        Ok(Self::assemble(transport, store, config))
    }

    /// Wire services over an explicit transport and store
    pub fn assemble(transport: Arc<dyn Transport>, store: LocalStore, config: ConsoleConfig) -> Self {
        let auth_store = AuthStore::new(store.clone());
        let identity = Arc::new(FirebaseIdentity::from_config(transport.clone(), &config));

        Self {
            api: ApiClient::new(transport, config.api_url.clone(), auth_store.clone()),
            auth: AuthContext::new(auth_store, identity),
            preferences: Preferences::new(store),
            config,
        }
    }

    /// Resource Client for one kind
    pub fn resource(&self, kind: ResourceKind) -> ResourceClient {
        ResourceClient::new(self.api.clone(), kind)
    }
}

/// Services provided to the component tree
pub fn use_services() -> Services {
    use_context::<Services>()
}
