//! Error types for backend and identity requests
//!
//! `RequestError` is what every Resource Client call fails with; it keeps the
//! HTTP status and the backend's own message so callers can show it verbatim
//! or recognise domain conflicts. `AuthError` covers the identity provider.

use sentinel_core::ConsoleError;
use sentinel_model::{DomainConflict, detect_conflict};
use serde_json::Value;
use thiserror::Error;

use crate::identity::Provider;

// ============================================================================
// Request Errors
// ============================================================================

/// Errors that can occur when talking to the backend
#[derive(Debug, Error)]
pub enum RequestError {
    /// No response was received (connection refused, DNS, TLS, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The request timed out
    #[error("Request timed out")]
    Timeout,

    /// The server answered 401; the local session has been cleared
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// The server returned an error response (4xx or 5xx)
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body, if any
        message: Option<String>,
    },

    /// Failed to deserialise the response body
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The request could not be built locally
    #[error(transparent)]
    Local(#[from] ConsoleError),
}

impl RequestError {
    /// Create an `Api` error from a status code and raw body
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::Api {
            status,
            message: extract_message(body),
        }
    }

    /// HTTP status, when a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    /// Backend-provided message, when present
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            Self::Unauthorized { message } => Some(message),
            _ => None,
        }
    }

    /// Whether this is an "unauthorized" (401) error
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Whether this is a "not found" (404) error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Whether no response was received at all
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }

    /// Domain conflict encoded in the backend message, if any
    pub fn conflict(&self) -> Option<DomainConflict> {
        self.backend_message().and_then(detect_conflict)
    }

    /// Whether the backend rejected the request with an "already has" conflict
    pub fn is_conflict(&self) -> bool {
        self.conflict().is_some()
    }

    /// Get the user-facing error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            Self::Timeout => "The server took too long to answer. Please try again.".to_string(),
            Self::Unauthorized { .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            Self::Api { status, message } => match message {
                Some(message) => message.clone(),
                None => format!("The server returned an unexpected error ({}).", status),
            },
            Self::Parse(_) => "Received an unexpected response from the server.".to_string(),
            Self::Local(err) => err.to_string(),
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Result type alias for backend requests
pub type RequestResult<T> = Result<T, RequestError>;

/// Pull the backend's message out of an error body
///
/// JSON bodies are searched for `error`, then `message`, then `detail`
/// (nested `{"error": {"message": ..}}` objects are followed). Any other
/// non-empty body is used as-is.
pub fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value) => message_from_value(&value),
        Err(_) => Some(body.to_string()),
    }
}

fn message_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(map) => ["error", "message", "detail"]
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(message_from_value),
        _ => None,
    }
}

// ============================================================================
// Auth Errors
// ============================================================================

/// Errors raised while signing in or restoring a session
#[derive(Debug, Error)]
pub enum AuthError {
    /// The identity is already registered under another provider
    #[error("Account {email} already exists with a different sign-in method")]
    AccountExistsWithDifferentProvider { email: String, providers: Vec<String> },

    /// The provider has no client id / API key configured
    #[error("{0} sign-in is not configured")]
    NotConfigured(Provider),

    /// The operator declined the authorization request
    #[error("Sign-in was denied")]
    Cancelled,

    /// The device code expired before the operator approved it
    #[error("The sign-in code expired")]
    Expired,

    /// The identity provider rejected the request
    #[error("Identity provider error: {0}")]
    Provider(String),

    /// Transport failure talking to the identity provider
    #[error("Identity request failed: {0}")]
    Request(#[from] RequestError),

    /// Persisting the session failed
    #[error("Failed to store session: {0}")]
    Storage(#[from] ConsoleError),
}

impl AuthError {
    /// Get the user-facing error message
    pub fn user_message(&self) -> String {
        match self {
            Self::AccountExistsWithDifferentProvider { email, providers } if providers.is_empty() => {
                format!(
                    "The account {} already exists with a different sign-in method.",
                    email
                )
            }
            Self::AccountExistsWithDifferentProvider { email, providers } => format!(
                "The account {} is already registered with: {}. Sign in with that provider.",
                email,
                providers.join(", ")
            ),
            Self::NotConfigured(provider) => format!(
                "{} sign-in is not configured for this console.",
                provider.display_name()
            ),
            Self::Cancelled => "Sign-in was cancelled.".to_string(),
            Self::Expired => "The sign-in code expired. Start again.".to_string(),
            Self::Provider(message) => message.clone(),
            Self::Request(err) => err.user_message(),
            Self::Storage(err) => err.to_string(),
        }
    }
}

/// Result type alias for identity operations
pub type AuthResult<T> = Result<T, AuthError>;

// ============================================================================
// Tests
// ============================================================================
