//! # Sentinel Client
//!
//! Everything the console needs to talk to the outside world:
//!
//! - **Config**: layered `ConsoleConfig` (defaults, TOML file, environment)
//! - **Storage**: the persisted key/value `LocalStore` and the `AuthStore` view on it
//! - **Transport**: the `Transport` seam and its `reqwest` implementation
//! - **Api**: `ApiClient` (bearer header, 401 sign-out) and per-resource `ResourceClient`
//! - **Identity**: federated sign-in through the device-authorization flow
//! - **Auth**: `AuthContext`, the single owner of the signed-in state
//!

pub mod api;
pub mod auth;
pub mod auth_store;
pub mod config;
pub mod error;
pub mod identity;
pub mod resource_client;
pub mod storage;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api::ApiClient;
pub use auth::{AuthContext, AuthState};
pub use auth_store::AuthStore;
pub use config::{ConsoleConfig, OAuthSettings};
pub use error::{AuthError, AuthResult, RequestError, RequestResult, extract_message};
pub use identity::{
    DeviceAuthorization, IdentityProvider, IdentitySession, Provider, firebase::FirebaseIdentity,
};
pub use resource_client::{
    FileUpload, ResourceClient, Upload, UserWithRoles, create_user_with_roles,
};
pub use storage::{LocalStore, Preferences};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, MultipartPart, RequestBody, ReqwestTransport, Transport,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
