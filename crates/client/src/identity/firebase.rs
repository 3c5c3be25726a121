//! Firebase Authentication over REST
//!
//! The OAuth leg runs as a device-authorization grant against the provider
//! itself; the resulting provider tokens are then exchanged at the Identity
//! Toolkit (`accounts:signInWithIdp`) for a Firebase ID token.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use sentinel_model::ClientUser;

use super::{DeviceAuthorization, IdentityProvider, IdentitySession, Provider};
use crate::config::{ConsoleConfig, OAuthSettings};
use crate::error::{AuthError, AuthResult, RequestError, extract_message};
use crate::transport::{HttpRequest, HttpResponse, Transport};

const IDENTITY_TOOLKIT: &str = "https://identitytoolkit.googleapis.com/v1";
const SECURE_TOKEN: &str = "https://securetoken.googleapis.com/v1/token";
const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Where the Identity Toolkit redirects; unused by the REST flow but required
const REQUEST_URI: &str = "http://localhost";

/// Added to the poll interval on `slow_down`
const SLOW_DOWN_STEP: u64 = 5;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    device_code: String,
    user_code: String,
    // Google answers with `verification_url`
    #[serde(alias = "verification_url")]
    verification_uri: String,
    #[serde(default = "default_expiry")]
    expires_in: u64,
    #[serde(default = "default_interval")]
    interval: u64,
}

fn default_expiry() -> u64 {
    900
}

fn default_interval() -> u64 {
    5
}

#[derive(Debug, Deserialize)]
struct ProviderTokens {
    access_token: Option<String>,
    id_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct IdpSignIn {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
    id_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<Value>,
    need_confirmation: bool,
    verified_provider: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AuthUri {
    signin_methods: Vec<String>,
    all_providers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RefreshedToken {
    id_token: String,
    refresh_token: Option<String>,
    expires_in: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LookupUser {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Lookup {
    users: Vec<LookupUser>,
}

/// Firebase answers `expiresIn` as a string of seconds
fn seconds(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::String(s)) => s.parse().unwrap_or(3600),
        Some(Value::Number(n)) => n.as_u64().unwrap_or(3600),
        _ => 3600,
    }
}

fn decode<T: serde::de::DeserializeOwned>(response: &HttpResponse) -> AuthResult<T> {
    serde_json::from_str(&response.body)
        .map_err(|e| AuthError::Request(RequestError::Parse(e.to_string())))
}

fn provider_failure(response: &HttpResponse) -> AuthError {
    AuthError::Provider(
        extract_message(&response.body)
            .unwrap_or_else(|| format!("identity service answered {}", response.status)),
    )
}

/// `application/x-www-form-urlencoded` text for `postBody`
fn form_encode(pairs: &[(&str, &str)]) -> AuthResult<String> {
    let url = reqwest::Url::parse_with_params("http://localhost/", pairs)
        .map_err(|e| AuthError::Provider(e.to_string()))?;
    Ok(url.query().unwrap_or_default().to_string())
}

// ============================================================================
// FirebaseIdentity
// ============================================================================

/// Firebase-backed identity provider
pub struct FirebaseIdentity {
    transport: Arc<dyn Transport>,
    api_key: Option<String>,
    oauth: OAuthSettings,
}

impl FirebaseIdentity {
    pub fn new(transport: Arc<dyn Transport>, api_key: Option<String>, oauth: OAuthSettings) -> Self {
        Self {
            transport,
            api_key,
            oauth,
        }
    }

    pub fn from_config(transport: Arc<dyn Transport>, config: &ConsoleConfig) -> Self {
        Self::new(transport, config.firebase_api_key.clone(), config.oauth.clone())
    }

    fn api_key(&self, provider: Provider) -> AuthResult<&str> {
        self.api_key
            .as_deref()
            .ok_or(AuthError::NotConfigured(provider))
    }

    fn client_id(&self, provider: Provider) -> AuthResult<&str> {
        let id = match provider {
            Provider::Google => self.oauth.google_client_id.as_deref(),
            Provider::GitHub => self.oauth.github_client_id.as_deref(),
            Provider::Microsoft => self.oauth.microsoft_client_id.as_deref(),
        };
        id.ok_or(AuthError::NotConfigured(provider))
    }

    fn device_code_url(&self, provider: Provider) -> String {
        match provider {
            Provider::Google => "https://oauth2.googleapis.com/device/code".to_string(),
            Provider::GitHub => "https://github.com/login/device/code".to_string(),
            Provider::Microsoft => format!(
                "https://login.microsoftonline.com/{}/oauth2/v2.0/devicecode",
                self.oauth.microsoft_tenant
            ),
        }
    }

    fn token_url(&self, provider: Provider) -> String {
        match provider {
            Provider::Google => "https://oauth2.googleapis.com/token".to_string(),
            Provider::GitHub => "https://github.com/login/oauth/access_token".to_string(),
            Provider::Microsoft => format!(
                "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
                self.oauth.microsoft_tenant
            ),
        }
    }

    fn scope(provider: Provider) -> &'static str {
        match provider {
            Provider::Google => "openid email profile",
            Provider::GitHub => "read:user user:email",
            Provider::Microsoft => "openid email profile offline_access",
        }
    }

    // ========================================================================
    // Device flow
    // ========================================================================

    /// One poll of the provider's token endpoint
    ///
    /// `Ok(None)` means the operator has not approved yet.
    async fn poll_once(
        &self,
        authorization: &DeviceAuthorization,
        interval: &mut u64,
    ) -> AuthResult<Option<ProviderTokens>> {
        let provider = authorization.provider;
        let mut form = vec![
            ("client_id", self.client_id(provider)?.to_string()),
            ("device_code", authorization.device_code.clone()),
            ("grant_type", DEVICE_CODE_GRANT.to_string()),
        ];
        if provider == Provider::Google {
            if let Some(secret) = &self.oauth.google_client_secret {
                form.push(("client_secret", secret.clone()));
            }
        }

        let request = HttpRequest::post(self.token_url(provider))
            .header("Accept", "application/json")
            .form(form);
        let response = self.transport.send(request).await?;

        // GitHub reports pending grants with a 200, the others with a 4xx
        let body: Value = serde_json::from_str(&response.body).unwrap_or(Value::Null);
        if let Some(code) = body.get("error").and_then(Value::as_str) {
            return match code {
                "authorization_pending" => Ok(None),
                "slow_down" => {
                    *interval += SLOW_DOWN_STEP;
                    Ok(None)
                }
                "access_denied" => Err(AuthError::Cancelled),
                "expired_token" => Err(AuthError::Expired),
                other => Err(AuthError::Provider(
                    body.get("error_description")
                        .and_then(Value::as_str)
                        .unwrap_or(other)
                        .to_string(),
                )),
            };
        }
        if !response.is_success() {
            return Err(provider_failure(&response));
        }

        let tokens: ProviderTokens = decode(&response)?;
        if tokens.access_token.is_none() && tokens.id_token.is_none() {
            return Err(AuthError::Provider(format!(
                "{} returned no token",
                provider.display_name()
            )));
        }
        Ok(Some(tokens))
    }

    // ========================================================================
    // Identity Toolkit
    // ========================================================================

    async fn sign_in_with_idp(&self, provider: Provider, tokens: &ProviderTokens) -> AuthResult<IdentitySession> {
        let key = self.api_key(provider)?;

        let mut pairs: Vec<(&str, &str)> = Vec::new();
        if let Some(id_token) = &tokens.id_token {
            pairs.push(("id_token", id_token.as_str()));
        }
        if let Some(access_token) = &tokens.access_token {
            pairs.push(("access_token", access_token.as_str()));
        }
        pairs.push(("providerId", provider.provider_id()));

        let request = HttpRequest::post(format!("{}/accounts:signInWithIdp?key={}", IDENTITY_TOOLKIT, key))
            .json(json!({
                "postBody": form_encode(&pairs)?,
                "requestUri": REQUEST_URI,
                "returnIdpCredential": true,
                "returnSecureToken": true,
            }));
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(provider_failure(&response));
        }

        let sign_in: IdpSignIn = decode(&response)?;
        if sign_in.need_confirmation {
            let email = sign_in.email.clone().unwrap_or_default();
            let mut providers = self.sign_in_methods(key, &email).await;
            if providers.is_empty() {
                providers = sign_in.verified_provider.clone();
            }
            tracing::warn!(
                "{} sign-in collides with an existing account",
                provider.display_name()
            );
            return Err(AuthError::AccountExistsWithDifferentProvider {
                email,
                providers: providers
                    .iter()
                    .map(|m| Provider::describe_method(m))
                    .collect(),
            });
        }

        let id_token = sign_in
            .id_token
            .ok_or_else(|| AuthError::Provider("sign-in returned no ID token".into()))?;
        Ok(IdentitySession {
            user: ClientUser {
                uid: sign_in.local_id,
                email: sign_in.email,
                display_name: sign_in.display_name,
                photo_url: sign_in.photo_url,
            },
            id_token,
            refresh_token: sign_in.refresh_token,
            expires_in: seconds(sign_in.expires_in.as_ref()),
        })
    }

    /// Sign-in methods already on file for `email`; empty when unknown
    async fn sign_in_methods(&self, key: &str, email: &str) -> Vec<String> {
        if email.is_empty() {
            return Vec::new();
        }
        let request = HttpRequest::post(format!("{}/accounts:createAuthUri?key={}", IDENTITY_TOOLKIT, key))
            .json(json!({ "identifier": email, "continueUri": REQUEST_URI }));

        match self.transport.send(request).await {
            Ok(response) if response.is_success() => match decode::<AuthUri>(&response) {
                Ok(uri) if !uri.signin_methods.is_empty() => uri.signin_methods,
                Ok(uri) => uri.all_providers,
                Err(_) => Vec::new(),
            },
            Ok(response) => {
                tracing::debug!("createAuthUri answered {}", response.status);
                Vec::new()
            }
            Err(err) => {
                tracing::debug!("createAuthUri failed: {}", err);
                Vec::new()
            }
        }
    }

    async fn lookup(&self, key: &str, id_token: &str) -> AuthResult<ClientUser> {
        let request = HttpRequest::post(format!("{}/accounts:lookup?key={}", IDENTITY_TOOLKIT, key))
            .json(json!({ "idToken": id_token }));
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(provider_failure(&response));
        }

        let lookup: Lookup = decode(&response)?;
        let user = lookup
            .users
            .into_iter()
            .next()
            .ok_or_else(|| AuthError::Provider("account no longer exists".into()))?;
        Ok(ClientUser {
            uid: user.local_id,
            email: user.email,
            display_name: user.display_name,
            photo_url: user.photo_url,
        })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    async fn restore(&self, refresh_token: &str) -> AuthResult<IdentitySession> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AuthError::Provider("Firebase API key is not configured".into()))?;

        let request = HttpRequest::post(format!("{}?key={}", SECURE_TOKEN, key)).form([
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ]);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(provider_failure(&response));
        }

        let refreshed: RefreshedToken = decode(&response)?;
        let user = self.lookup(key, &refreshed.id_token).await?;
        Ok(IdentitySession {
            user,
            expires_in: seconds(refreshed.expires_in.as_ref()),
            refresh_token: refreshed
                .refresh_token
                .or_else(|| Some(refresh_token.to_string())),
            id_token: refreshed.id_token,
        })
    }

    async fn begin(&self, provider: Provider) -> AuthResult<DeviceAuthorization> {
        self.api_key(provider)?;
        let client_id = self.client_id(provider)?;

        let request = HttpRequest::post(self.device_code_url(provider))
            .header("Accept", "application/json")
            .form([("client_id", client_id), ("scope", Self::scope(provider))]);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(provider_failure(&response));
        }

        let device: DeviceCodeResponse = decode(&response)?;
        tracing::info!("Started {} device sign-in", provider.display_name());
        Ok(DeviceAuthorization {
            provider,
            device_code: device.device_code,
            user_code: device.user_code,
            verification_uri: device.verification_uri,
            expires_in: device.expires_in,
            interval: device.interval,
        })
    }

    async fn complete(&self, authorization: &DeviceAuthorization) -> AuthResult<IdentitySession> {
        let deadline = Instant::now() + Duration::from_secs(authorization.expires_in);
        let mut interval = authorization.interval;

        let tokens = loop {
            if interval > 0 {
                tokio::time::sleep(Duration::from_secs(interval)).await;
            }
            if Instant::now() >= deadline {
                return Err(AuthError::Expired);
            }
            if let Some(tokens) = self.poll_once(authorization, &mut interval).await? {
                break tokens;
            }
        };

        let session = self.sign_in_with_idp(authorization.provider, &tokens).await?;
        tracing::info!(
            "Signed in with {} as {}",
            authorization.provider.display_name(),
            session.user.greeting_name()
        );
        Ok(session)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use crate::transport::RequestBody;

    fn identity(mock: &MockTransport) -> FirebaseIdentity {
        FirebaseIdentity::new(
            Arc::new(mock.clone()),
            Some("web-key".into()),
            OAuthSettings {
                google_client_id: Some("g-client".into()),
                google_client_secret: Some("g-secret".into()),
                github_client_id: Some("gh-client".into()),
                microsoft_client_id: None,
                microsoft_tenant: "common".into(),
            },
        )
    }

    fn authorization(provider: Provider) -> DeviceAuthorization {
        DeviceAuthorization {
            provider,
            device_code: "dev-code".into(),
            user_code: "ABCD-EFGH".into(),
            verification_uri: "https://example.com/device".into(),
            expires_in: 600,
            interval: 1,
        }
    }

    const SIGNED_IN: &str = r#"{
        "localId": "uid-1",
        "email": "ana@example.com",
        "displayName": "Ana",
        "photoUrl": "https://example.com/ana.png",
        "idToken": "firebase-id-token",
        "refreshToken": "firebase-refresh",
        "expiresIn": "3600"
    }"#;

    #[tokio::test]
    async fn test_begin_google_reads_verification_url() {
        let mock = MockTransport::new();
        mock.respond(
            200,
            r#"{"device_code": "d", "user_code": "U-1", "verification_url": "https://www.google.com/device", "expires_in": 1800, "interval": 5}"#,
        );

        let auth = identity(&mock).begin(Provider::Google).await.unwrap();
        assert_eq!(auth.user_code, "U-1");
        assert_eq!(auth.verification_uri, "https://www.google.com/device");
        assert_eq!(auth.interval, 5);
        assert_eq!(
            mock.last_request().url,
            "https://oauth2.googleapis.com/device/code"
        );
    }

    #[tokio::test]
    async fn test_begin_unconfigured_provider() {
        let mock = MockTransport::new();
        let err = identity(&mock).begin(Provider::Microsoft).await.unwrap_err();
        assert!(matches!(err, AuthError::NotConfigured(Provider::Microsoft)));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_polls_until_approved() {
        let mock = MockTransport::new();
        mock.respond(428, r#"{"error": "authorization_pending"}"#);
        mock.respond(400, r#"{"error": "slow_down"}"#);
        mock.respond(200, r#"{"access_token": "ya29", "id_token": "google-id"}"#);
        mock.respond(200, SIGNED_IN);

        let session = identity(&mock)
            .complete(&authorization(Provider::Google))
            .await
            .unwrap();
        assert_eq!(session.id_token, "firebase-id-token");
        assert_eq!(session.refresh_token.as_deref(), Some("firebase-refresh"));
        assert_eq!(session.user.display_name.as_deref(), Some("Ana"));
        assert_eq!(session.expires_in, 3600);

        let requests = mock.requests();
        assert_eq!(requests.len(), 4);
        let RequestBody::Json(body) = &requests[3].body else {
            panic!("expected JSON body");
        };
        let post_body = body["postBody"].as_str().unwrap();
        assert!(post_body.contains("id_token=google-id"));
        assert!(post_body.contains("providerId=google.com"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_denied() {
        let mock = MockTransport::new();
        mock.respond(200, r#"{"error": "access_denied"}"#);
        let err = identity(&mock)
            .complete(&authorization(Provider::GitHub))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_expired_code() {
        let mock = MockTransport::new();
        mock.respond(400, r#"{"error": "expired_token"}"#);
        let err = identity(&mock)
            .complete(&authorization(Provider::Google))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Expired));
    }

    #[tokio::test(start_paused = true)]
    async fn test_collision_names_existing_methods() {
        let mock = MockTransport::new();
        mock.respond(200, r#"{"access_token": "gho_x"}"#);
        mock.respond(
            200,
            r#"{"localId": "", "email": "ana@example.com", "needConfirmation": true, "verifiedProvider": ["google.com"]}"#,
        );
        mock.respond(200, r#"{"signinMethods": ["google.com"], "registered": true}"#);

        let err = identity(&mock)
            .complete(&authorization(Provider::GitHub))
            .await
            .unwrap_err();
        match &err {
            AuthError::AccountExistsWithDifferentProvider { email, providers } => {
                assert_eq!(email, "ana@example.com");
                assert_eq!(providers, &vec!["Google".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(
            err.user_message(),
            "The account ana@example.com is already registered with: Google. Sign in with that provider."
        );
    }

    #[tokio::test]
    async fn test_restore_refreshes_and_looks_up() {
        let mock = MockTransport::new();
        mock.respond(
            200,
            r#"{"id_token": "fresh-id", "refresh_token": "fresh-refresh", "expires_in": "3600", "user_id": "uid-1"}"#,
        );
        mock.respond(
            200,
            r#"{"users": [{"localId": "uid-1", "email": "ana@example.com"}]}"#,
        );

        let session = identity(&mock).restore("old-refresh").await.unwrap();
        assert_eq!(session.id_token, "fresh-id");
        assert_eq!(session.refresh_token.as_deref(), Some("fresh-refresh"));
        assert_eq!(session.user.uid, "uid-1");
        assert!(mock.requests()[0].url.starts_with(SECURE_TOKEN));
    }

    #[tokio::test]
    async fn test_restore_rejected() {
        let mock = MockTransport::new();
        mock.respond(400, r#"{"error": {"code": 400, "message": "TOKEN_EXPIRED"}}"#);
        let err = identity(&mock).restore("old").await.unwrap_err();
        assert!(matches!(err, AuthError::Provider(ref m) if m == "TOKEN_EXPIRED"));
    }

    #[test]
    fn test_form_encode_escapes() {
        let encoded = form_encode(&[("id_token", "a+b/c="), ("providerId", "google.com")]).unwrap();
        assert_eq!(encoded, "id_token=a%2Bb%2Fc%3D&providerId=google.com");
    }
}
