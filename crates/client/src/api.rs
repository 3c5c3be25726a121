//! Backend API client
//!
//! Adds the bearer token from the auth store to every request, strips audit
//! fields from outgoing payloads, and turns a `401` into a local sign-out.

use serde_json::Value;
use std::sync::Arc;

use sentinel_model::{Record, without_audit_fields};

use crate::auth_store::AuthStore;
use crate::error::{RequestError, RequestResult, extract_message};
use crate::transport::{HttpMethod, HttpRequest, MultipartPart, RequestBody, Transport};

/// Shared client for the security backend
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    auth: AuthStore,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>, auth: AuthStore) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    /// Absolute URL for an `/api/...` path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // Verbs
    // ========================================================================

    pub async fn get(&self, path: &str) -> RequestResult<Value> {
        self.send(HttpMethod::Get, path, RequestBody::Empty).await
    }

    pub async fn post(&self, path: &str, payload: &Record) -> RequestResult<Value> {
        self.send(HttpMethod::Post, path, json_body(payload)).await
    }

    pub async fn put(&self, path: &str, payload: &Record) -> RequestResult<Value> {
        self.send(HttpMethod::Put, path, json_body(payload)).await
    }

    pub async fn delete(&self, path: &str) -> RequestResult<Value> {
        self.send(HttpMethod::Delete, path, RequestBody::Empty).await
    }

    pub async fn post_multipart(&self, path: &str, parts: Vec<MultipartPart>) -> RequestResult<Value> {
        self.send(HttpMethod::Post, path, RequestBody::Multipart(parts))
            .await
    }

    pub async fn put_multipart(&self, path: &str, parts: Vec<MultipartPart>) -> RequestResult<Value> {
        self.send(HttpMethod::Put, path, RequestBody::Multipart(parts))
            .await
    }

    /// Send one request and decode the JSON answer
    pub async fn send(&self, method: HttpMethod, path: &str, body: RequestBody) -> RequestResult<Value> {
        let mut request = HttpRequest::new(method, self.url(path))
            .header("Accept", "application/json")
            .bearer(self.auth.token());
        request.body = body;

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!("{} {} -> {}", method, path, err);
                return Err(err);
            }
        };
        tracing::debug!("{} {} -> {}", method, path, response.status);

        if response.status == 401 {
            tracing::warn!("{} {} was rejected as unauthorized; signing out", method, path);
            if let Err(err) = self.auth.clear() {
                tracing::error!("Could not clear stored session: {}", err);
            }
            return Err(RequestError::Unauthorized {
                message: extract_message(&response.body)
                    .unwrap_or_else(|| "Unauthorized".to_string()),
            });
        }

        if !response.is_success() {
            return Err(RequestError::from_response(response.status, &response.body));
        }

        response.json()
    }
}

fn json_body(payload: &Record) -> RequestBody {
    RequestBody::Json(Value::Object(without_audit_fields(payload)))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentitySession;
    use crate::storage::LocalStore;
    use crate::testing::{MockTransport, unwritable_store};
    use sentinel_model::ClientUser;
    use serde_json::json;

    fn signed_in_client(mock: &MockTransport) -> ApiClient {
        let auth = AuthStore::new(LocalStore::in_memory());
        auth.persist(&IdentitySession {
            user: ClientUser {
                uid: "u1".into(),
                ..ClientUser::default()
            },
            id_token: "tok-1".into(),
            refresh_token: None,
            expires_in: 3600,
        })
        .unwrap();
        ApiClient::new(Arc::new(mock.clone()), "http://backend:5000/", auth)
    }

    #[tokio::test]
    async fn test_bearer_header_and_url() {
        let mock = MockTransport::new();
        mock.respond(200, "[]");
        let api = signed_in_client(&mock);

        api.get("/api/users").await.unwrap();
        let request = mock.last_request();
        assert_eq!(request.url, "http://backend:5000/api/users");
        assert_eq!(request.bearer.as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn test_payload_strips_audit_fields() {
        let mock = MockTransport::new();
        mock.respond(201, r#"{"id": 9}"#);
        let api = signed_in_client(&mock);

        let payload = json!({"id": 3, "name": "admin", "created_at": "x", "updated_at": "y"});
        let created = api
            .post("/api/roles", payload.as_object().unwrap())
            .await
            .unwrap();
        assert_eq!(created, json!({"id": 9}));
        assert_eq!(
            mock.last_request().body,
            RequestBody::Json(json!({"name": "admin"}))
        );
    }

    #[tokio::test]
    async fn test_unauthorized_signs_out() {
        let mock = MockTransport::new();
        mock.respond(401, r#"{"message": "Token expired"}"#);
        mock.respond(200, "[]");
        let api = signed_in_client(&mock);

        let err = api.get("/api/users").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.backend_message(), Some("Token expired"));
        assert!(!api.auth().is_signed_in());

        // Later requests go out without a bearer
        api.get("/api/users").await.unwrap();
        assert_eq!(mock.last_request().bearer, None);
    }

    #[tokio::test]
    async fn test_unauthorized_wins_over_store_failure() {
        let mock = MockTransport::new();
        mock.respond(401, r#"{"message": "Token expired"}"#);
        let (_dir, store) = unwritable_store();
        let api = ApiClient::new(Arc::new(mock.clone()), "http://backend:5000", AuthStore::new(store));
        assert_eq!(api.auth().token().as_deref(), Some("stale"));

        let err = api.get("/api/users").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(api.auth().token(), None);
    }

    #[tokio::test]
    async fn test_api_error_keeps_status_and_message() {
        let mock = MockTransport::new();
        mock.respond(409, r#"{"error": "User already has a password"}"#);
        let api = signed_in_client(&mock);

        let err = api.post("/api/passwords/user/1", &Record::new()).await.unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert!(err.is_conflict());
        assert!(api.auth().is_signed_in());
    }

    #[tokio::test]
    async fn test_transport_failure_passes_through() {
        let mock = MockTransport::new();
        mock.fail(RequestError::Network("refused".into()));
        let api = signed_in_client(&mock);

        let err = api.delete("/api/roles/1").await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_empty_body_is_null() {
        let mock = MockTransport::new();
        mock.respond(204, "");
        let api = signed_in_client(&mock);
        assert_eq!(api.delete("/api/roles/1").await.unwrap(), Value::Null);
    }
}
