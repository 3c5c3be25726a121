//! HTTP transport seam
//!
//! `ApiClient` and the identity provider describe requests as plain values and
//! hand them to a `Transport`. Production code sends them with `reqwest`;
//! tests swap in an in-process mock.

use async_trait::async_trait;
use reqwest::multipart;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use crate::error::{RequestError, RequestResult};

// ============================================================================
// Request / Response values
// ============================================================================

/// HTTP verbs the console uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One part of a `multipart/form-data` body
#[derive(Debug, Clone, PartialEq)]
pub enum MultipartPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        bytes: Vec<u8>,
        mime: Option<String>,
    },
}

impl MultipartPart {
    pub fn name(&self) -> &str {
        match self {
            MultipartPart::Text { name, .. } | MultipartPart::File { name, .. } => name,
        }
    }
}

/// Request body
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    /// `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
    Multipart(Vec<MultipartPart>),
}

/// A request ready to be sent
#[derive(Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Sent as `Authorization: Bearer <token>` when present
    pub bearer: Option<String>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            bearer: None,
            body: RequestBody::Empty,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }

    pub fn json(mut self, value: Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = RequestBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn multipart(mut self, parts: Vec<MultipartPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }
}

// Tokens stay out of logs and panic messages
impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

/// A received response, whatever its status
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON; an empty body is `null`
    pub fn json(&self) -> RequestResult<Value> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body).map_err(|e| RequestError::Parse(e.to_string()))
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Sends requests; only fails when no response was received
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> RequestResult<HttpResponse>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport; `timeout` of `None` keeps reqwest's default
    pub fn new(timeout: Option<Duration>) -> RequestResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            "sentinel-console/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    fn multipart_form(parts: Vec<MultipartPart>) -> RequestResult<multipart::Form> {
        let mut form = multipart::Form::new();
        for part in parts {
            form = match part {
                MultipartPart::Text { name, value } => form.text(name, value),
                MultipartPart::File {
                    name,
                    file_name,
                    bytes,
                    mime,
                } => {
                    let mut file = multipart::Part::bytes(bytes).file_name(file_name);
                    if let Some(mime) = mime {
                        file = file.mime_str(&mime)?;
                    }
                    form.part(name, file)
                }
            };
        }
        Ok(form)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> RequestResult<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            bearer,
            body,
        } = request;

        let mut builder = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Form(pairs) => builder.form(&pairs),
            RequestBody::Multipart(parts) => builder.multipart(Self::multipart_form(parts)?),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let request = HttpRequest::post("http://x/api/users")
            .header("Accept", "application/json")
            .bearer(Some("tok".into()))
            .json(json!({"name": "Ana"}));

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.bearer.as_deref(), Some("tok"));
        assert_eq!(request.body, RequestBody::Json(json!({"name": "Ana"})));
    }

    #[test]
    fn test_debug_redacts_bearer() {
        let request = HttpRequest::get("http://x").bearer(Some("secret-token".into()));
        let text = format!("{:?}", request);
        assert!(!text.contains("secret-token"));
        assert!(text.contains("<redacted>"));
    }

    #[test]
    fn test_response_json() {
        assert_eq!(HttpResponse::new(204, "").json().unwrap(), Value::Null);
        assert_eq!(
            HttpResponse::new(200, r#"{"id": 1}"#).json().unwrap(),
            json!({"id": 1})
        );
        assert!(matches!(
            HttpResponse::new(200, "<html>").json(),
            Err(RequestError::Parse(_))
        ));
    }

    #[test]
    fn test_success_range() {
        assert!(HttpResponse::new(201, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
        assert!(!HttpResponse::new(404, "").is_success());
    }

    #[test]
    fn test_multipart_form_builds() {
        let parts = vec![
            MultipartPart::Text {
                name: "phone".into(),
                value: "555".into(),
            },
            MultipartPart::File {
                name: "photo".into(),
                file_name: "me.png".into(),
                bytes: vec![1, 2, 3],
                mime: Some("image/png".into()),
            },
        ];
        assert_eq!(parts[1].name(), "photo");
        assert!(ReqwestTransport::multipart_form(parts).is_ok());
    }
}
