//! Console configuration
//!
//! Layered, in order: built-in defaults, an optional TOML file
//! (`$HOME/.config/sentinel-console/config.toml`, or `SENTINEL_CONFIG`), and
//! environment variables. A `.env` file in the working directory is loaded
//! into the environment first.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use sentinel_core::{ConsoleError, ConsoleResult, UiVariant, Validatable};

/// Application directory under `$HOME/.config`
pub const APP_DIR: &str = "sentinel-console";

/// Default backend base URL
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

// ============================================================================
// Configuration Types
// ============================================================================

/// OAuth client registrations used by the device-authorization flow
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthSettings {
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub github_client_id: Option<String>,
    pub microsoft_client_id: Option<String>,
    /// Azure AD tenant (`common`, `organizations`, or a tenant id)
    pub microsoft_tenant: String,
}

/// Complete console configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Backend base URL, without trailing slash
    pub api_url: String,
    /// Directory holding the local store
    pub state_dir: PathBuf,
    /// Variant used when none has been persisted yet
    pub ui_variant: Option<UiVariant>,
    /// Overall HTTP timeout; `None` keeps the client default
    pub http_timeout_secs: Option<u64>,
    /// Firebase Web API key for the Identity Toolkit
    pub firebase_api_key: Option<String>,
    /// OAuth client registrations
    pub oauth: OAuthSettings,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            state_dir: default_state_dir(),
            ui_variant: None,
            http_timeout_secs: None,
            firebase_api_key: None,
            oauth: OAuthSettings {
                microsoft_tenant: "common".to_string(),
                ..OAuthSettings::default()
            },
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from file and environment
    pub fn load() -> ConsoleResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let path = std::env::var("SENTINEL_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> ConsoleResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ConsoleError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
            .map_err(|e| ConsoleError::config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> ConsoleResult<Self> {
        let mut config: Self =
            toml::from_str(text).map_err(|e| ConsoleError::config(e.to_string()))?;
        if config.oauth.microsoft_tenant.is_empty() {
            config.oauth.microsoft_tenant = "common".to_string();
        }
        Ok(config)
    }

    /// Apply environment-style overrides from a lookup function
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConsoleResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("SENTINEL_API_URL") {
            self.api_url = url;
        }
        if let Some(dir) = get("SENTINEL_STATE_DIR") {
            self.state_dir = PathBuf::from(dir);
        }
        if let Some(variant) = get("SENTINEL_UI_VARIANT") {
            self.ui_variant = Some(variant.parse()?);
        }
        if let Some(secs) = get("SENTINEL_HTTP_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                ConsoleError::config(format!("SENTINEL_HTTP_TIMEOUT_SECS must be a number, got '{}'", secs))
            })?;
            self.http_timeout_secs = Some(secs);
        }

        if let Some(key) = get("FIREBASE_API_KEY") {
            self.firebase_api_key = Some(key);
        }
        if let Some(id) = get("GOOGLE_CLIENT_ID") {
            self.oauth.google_client_id = Some(id);
        }
        if let Some(secret) = get("GOOGLE_CLIENT_SECRET") {
            self.oauth.google_client_secret = Some(secret);
        }
        if let Some(id) = get("GITHUB_CLIENT_ID") {
            self.oauth.github_client_id = Some(id);
        }
        if let Some(id) = get("MICROSOFT_CLIENT_ID") {
            self.oauth.microsoft_client_id = Some(id);
        }
        if let Some(tenant) = get("MICROSOFT_TENANT") {
            self.oauth.microsoft_tenant = tenant;
        }

        self.api_url = self.api_url.trim().trim_end_matches('/').to_string();
        Ok(())
    }

    /// Path of the local store file
    pub fn store_path(&self) -> PathBuf {
        self.state_dir.join("storage.json")
    }

    /// HTTP timeout, when configured
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }
}

impl Validatable for ConsoleConfig {
    fn validate(&self) -> ConsoleResult<()> {
        if self.api_url.trim().is_empty() {
            return Err(ConsoleError::MissingConfig("SENTINEL_API_URL".into()));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConsoleError::config(format!(
                "API URL must start with http:// or https://, got '{}'",
                self.api_url
            )));
        }
        if self.http_timeout_secs == Some(0) {
            return Err(ConsoleError::config("HTTP timeout must be at least one second"));
        }
        Ok(())
    }
}

// ============================================================================
// Paths
// ============================================================================

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()
        .map(PathBuf::from)
}

/// `$HOME/.config/sentinel-console`, or `./.sentinel-console` without a home
pub fn default_state_dir() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(".config").join(APP_DIR),
        None => PathBuf::from(format!(".{}", APP_DIR)),
    }
}

/// `$HOME/.config/sentinel-console/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".config").join(APP_DIR).join("config.toml"))
}

// ============================================================================
// Tests
// ============================================================================
