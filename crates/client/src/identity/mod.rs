//! Federated identity
//!
//! Sign-in goes through one of three providers. On the desktop the browser
//! popup becomes the OAuth 2.0 device-authorization flow: `begin` returns a
//! short code and a verification URL, the operator approves in any browser,
//! and `complete` waits for the approval and exchanges it for an identity
//! session whose ID token doubles as the backend bearer token.

pub mod firebase;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use sentinel_core::ConsoleError;
use sentinel_model::ClientUser;

use crate::error::AuthResult;

// ============================================================================
// Provider
// ============================================================================

/// Supported sign-in providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    GitHub,
    Microsoft,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Google, Provider::GitHub, Provider::Microsoft];

    /// Identity Toolkit provider id
    pub fn provider_id(&self) -> &'static str {
        match self {
            Provider::Google => "google.com",
            Provider::GitHub => "github.com",
            Provider::Microsoft => "microsoft.com",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Google => "Google",
            Provider::GitHub => "GitHub",
            Provider::Microsoft => "Microsoft",
        }
    }

    /// Human name for an Identity Toolkit sign-in method
    pub fn describe_method(method: &str) -> String {
        Self::ALL
            .into_iter()
            .find(|p| p.provider_id() == method)
            .map(|p| p.display_name().to_string())
            .unwrap_or_else(|| match method {
                "password" => "Email and password".to_string(),
                other => other.to_string(),
            })
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Provider {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" | "google.com" => Ok(Provider::Google),
            "github" | "github.com" => Ok(Provider::GitHub),
            "microsoft" | "microsoft.com" => Ok(Provider::Microsoft),
            other => Err(ConsoleError::validation(format!(
                "unknown sign-in provider '{}'",
                other
            ))),
        }
    }
}

// ============================================================================
// Session values
// ============================================================================

/// A pending device authorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAuthorization {
    pub provider: Provider,
    pub device_code: String,
    /// Code the operator types at `verification_uri`
    pub user_code: String,
    pub verification_uri: String,
    /// Seconds until the codes expire
    pub expires_in: u64,
    /// Minimum seconds between polls
    pub interval: u64,
}

/// A signed-in identity
#[derive(Clone, PartialEq)]
pub struct IdentitySession {
    pub user: ClientUser,
    /// Sent to the backend as the bearer token
    pub id_token: String,
    pub refresh_token: Option<String>,
    /// Seconds the ID token stays valid
    pub expires_in: u64,
}

impl fmt::Debug for IdentitySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentitySession")
            .field("user", &self.user)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Provider trait
// ============================================================================

/// The identity service the console signs in with
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange a stored refresh token for a fresh session
    async fn restore(&self, refresh_token: &str) -> AuthResult<IdentitySession>;

    /// Start a device authorization with `provider`
    async fn begin(&self, provider: Provider) -> AuthResult<DeviceAuthorization>;

    /// Wait for the operator's approval and sign in
    async fn complete(&self, authorization: &DeviceAuthorization) -> AuthResult<IdentitySession>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_ids() {
        assert_eq!(Provider::Google.provider_id(), "google.com");
        assert_eq!(Provider::GitHub.to_string(), "GitHub");
        assert_eq!("microsoft.com".parse::<Provider>().unwrap(), Provider::Microsoft);
        assert!("okta".parse::<Provider>().is_err());
    }

    #[test]
    fn test_describe_method() {
        assert_eq!(Provider::describe_method("github.com"), "GitHub");
        assert_eq!(Provider::describe_method("password"), "Email and password");
        assert_eq!(Provider::describe_method("apple.com"), "apple.com");
    }

    #[test]
    fn test_session_debug_hides_tokens() {
        let session = IdentitySession {
            user: ClientUser::default(),
            id_token: "id-secret".into(),
            refresh_token: Some("refresh-secret".into()),
            expires_in: 3600,
        };
        let text = format!("{:?}", session);
        assert!(!text.contains("secret"));
    }
}
