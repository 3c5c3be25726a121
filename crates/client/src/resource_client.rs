//! Per-resource CRUD client
//!
//! A thin, stateless mapping from `ResourceKind` operations to REST calls.
//! No retries and no caching: every call goes to the network.

use serde_json::Value;

use sentinel_model::{Record, RecordId, ResourceKind, Scope, record_id, records_from_value};

use crate::api::ApiClient;
use crate::error::{RequestError, RequestResult};
use crate::transport::MultipartPart;

/// CRUD operations for one resource kind
#[derive(Clone)]
pub struct ResourceClient {
    api: ApiClient,
    kind: ResourceKind,
}

impl ResourceClient {
    pub fn new(api: ApiClient, kind: ResourceKind) -> Self {
        Self { api, kind }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// `GET /api/<r>`
    pub async fn list(&self) -> RequestResult<Vec<Record>> {
        self.list_in(&Scope::All).await
    }

    /// List in a parent scope (`/api/<r>/user/{uid}`, ...)
    ///
    /// Satellites that answer with a single object come back as one record.
    pub async fn list_in(&self, scope: &Scope) -> RequestResult<Vec<Record>> {
        let path = self.kind.list_path(scope)?;
        Ok(records_from_value(self.api.get(&path).await?))
    }

    /// `GET /api/<r>/{id}`
    pub async fn get(&self, id: &RecordId) -> RequestResult<Record> {
        let value = self.api.get(&self.kind.item_path(id)).await?;
        into_record(value)
    }

    /// `POST /api/<r>`
    pub async fn create(&self, payload: &Record) -> RequestResult<Value> {
        self.create_in(&Scope::All, payload).await
    }

    /// Create in a parent scope
    pub async fn create_in(&self, scope: &Scope, payload: &Record) -> RequestResult<Value> {
        let path = self.kind.create_path(scope)?;
        self.api.post(&path, payload).await
    }

    /// `PUT /api/<r>/{id}`
    pub async fn update(&self, id: &RecordId, payload: &Record) -> RequestResult<Value> {
        self.api.put(&self.kind.item_path(id), payload).await
    }

    /// `DELETE /api/<r>/{id}`
    pub async fn delete(&self, id: &RecordId) -> RequestResult<()> {
        self.api.delete(&self.kind.item_path(id)).await?;
        Ok(())
    }

    /// Multipart create in a parent scope (profiles, signatures)
    pub async fn create_multipart_in(&self, scope: &Scope, upload: Upload) -> RequestResult<Value> {
        let path = self.kind.create_path(scope)?;
        self.api.post_multipart(&path, upload.into_parts()).await
    }

    /// Multipart `PUT /api/<r>/{id}`
    pub async fn update_multipart(&self, id: &RecordId, upload: Upload) -> RequestResult<Value> {
        self.api
            .put_multipart(&self.kind.item_path(id), upload.into_parts())
            .await
    }
}

fn into_record(value: Value) -> RequestResult<Record> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(RequestError::Parse(format!(
            "expected an object, got {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Multipart uploads
// ============================================================================

/// A picked file
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl FileUpload {
    /// Guess the MIME type from the file extension
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = file_name
            .rsplit_once('.')
            .and_then(|(_, ext)| match ext.to_ascii_lowercase().as_str() {
                "png" => Some("image/png"),
                "jpg" | "jpeg" => Some("image/jpeg"),
                "gif" => Some("image/gif"),
                "webp" => Some("image/webp"),
                "svg" => Some("image/svg+xml"),
                _ => None,
            })
            .map(str::to_string);
        Self {
            file_name,
            bytes,
            mime,
        }
    }
}

/// Text fields plus an optional `photo` file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Upload {
    pub fields: Vec<(String, String)>,
    pub photo: Option<FileUpload>,
}

impl Upload {
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn photo(mut self, photo: Option<FileUpload>) -> Self {
        self.photo = photo;
        self
    }

    /// Blank text fields are left out
    pub fn into_parts(self) -> Vec<MultipartPart> {
        let mut parts: Vec<MultipartPart> = self
            .fields
            .into_iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(name, value)| MultipartPart::Text { name, value })
            .collect();

        if let Some(photo) = self.photo {
            parts.push(MultipartPart::File {
                name: "photo".to_string(),
                file_name: photo.file_name,
                bytes: photo.bytes,
                mime: photo.mime,
            });
        }
        parts
    }
}

// ============================================================================
// Composite operations
// ============================================================================

/// Result of creating a user and assigning roles
#[derive(Debug, Clone, PartialEq)]
pub struct UserWithRoles {
    pub user: Record,
    pub assigned: Vec<Value>,
    /// Roles whose assignment the backend rejected
    pub failed: Vec<RecordId>,
}

/// Create a user, then assign each role
///
/// A failed assignment is logged and skipped; only the user creation itself
/// can fail the whole operation.
pub async fn create_user_with_roles(
    api: &ApiClient,
    user: &Record,
    roles: &[RecordId],
) -> RequestResult<UserWithRoles> {
    let created = ResourceClient::new(api.clone(), ResourceKind::Users)
        .create(user)
        .await?;
    let created = into_record(created)?;
    let Some(user_id) = record_id(&created) else {
        return Err(RequestError::Parse("created user has no id".into()));
    };

    tracing::info!("Created user {}", user_id);

    let assignments = ResourceClient::new(api.clone(), ResourceKind::UserRoles);
    let mut assigned = Vec::new();
    let mut failed = Vec::new();
    for role in roles {
        let scope = Scope::UserRole {
            user: user_id.clone(),
            role: role.clone(),
        };
        match assignments.create_in(&scope, &Record::new()).await {
            Ok(relation) => assigned.push(relation),
            Err(err) => {
                tracing::warn!("Could not assign role {} to user {}: {}", role, user_id, err);
                failed.push(role.clone());
            }
        }
    }

    Ok(UserWithRoles {
        user: created,
        assigned,
        failed,
    })
}

// ============================================================================
// Tests
// ============================================================================
