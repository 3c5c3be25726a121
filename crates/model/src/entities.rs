//! Typed entities mirrored from the backend
//!
//! Every entity converts to and from the untyped `Record` the generic views
//! use, and declares the form fields an operator may edit.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use sentinel_core::{ConsoleError, ConsoleResult, FieldDescriptor};

use crate::record::{Record, RecordId};
use crate::resource::ResourceKind;

// ============================================================================
// Entity Trait
// ============================================================================

/// A backend entity with a typed shape
pub trait Entity: Serialize + DeserializeOwned + Default {
    /// Resource this entity belongs to
    const KIND: ResourceKind;

    /// Identifier, once the server assigned one
    fn id(&self) -> Option<&RecordId>;

    /// Editable fields in form order
    fn descriptors() -> Vec<FieldDescriptor>;

    /// Convert into an untyped record
    fn to_record(&self) -> ConsoleResult<Record> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(ConsoleError::invalid_record(
                Self::KIND.segment(),
                "entity did not serialize to an object",
            )),
        }
    }

    /// Build from an untyped record
    fn from_record(record: &Record) -> ConsoleResult<Self> {
        serde_json::from_value(Value::Object(record.clone()))
            .map_err(|e| ConsoleError::invalid_record(Self::KIND.segment(), e.to_string()))
    }
}

macro_rules! entity_id {
    () => {
        fn id(&self) -> Option<&RecordId> {
            self.id.as_ref()
        }
    };
}

// ============================================================================
// Users and Access Control
// ============================================================================

/// Minimal projection of the signed-in operator
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClientUser {
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        rename = "displayName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl ClientUser {
    /// Name to greet the operator with
    pub fn greeting_name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.uid)
    }
}

/// Backend user account
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Write-only
    #[serde(default)]
    pub password: String,
}

impl Entity for User {
    const KIND: ResourceKind = ResourceKind::Users;
    entity_id!();

    fn descriptors() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::text("name"),
            FieldDescriptor::email("email"),
            FieldDescriptor::secret("password"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Role {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Entity for Role {
    const KIND: ResourceKind = ResourceKind::Roles;
    entity_id!();

    fn descriptors() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::text("name"),
            FieldDescriptor::text("description"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Permission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// URL pattern the permission guards
    #[serde(default)]
    pub url: String,
    /// HTTP method
    #[serde(default)]
    pub method: String,
}

impl Entity for Permission {
    const KIND: ResourceKind = ResourceKind::Permissions;
    entity_id!();

    fn descriptors() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::text("url").with_label("URL"),
            FieldDescriptor::text("method"),
        ]
    }
}

/// Time-bounded grant of a role to a user
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserRole {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "startAt", default)]
    pub start_at: Option<String>,
    #[serde(rename = "endAt", default)]
    pub end_at: Option<String>,
}

impl Entity for UserRole {
    const KIND: ResourceKind = ResourceKind::UserRoles;
    entity_id!();

    fn descriptors() -> Vec<FieldDescriptor> {
        validity_window()
    }
}

/// Time-bounded grant of a permission to a role
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RolePermission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "startAt", default)]
    pub start_at: Option<String>,
    #[serde(rename = "endAt", default)]
    pub end_at: Option<String>,
}

impl Entity for RolePermission {
    const KIND: ResourceKind = ResourceKind::RolePermissions;
    entity_id!();

    fn descriptors() -> Vec<FieldDescriptor> {
        validity_window()
    }
}

fn validity_window() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::datetime("startAt")
            .optional()
            .with_label("Starts at"),
        FieldDescriptor::datetime("endAt")
            .optional()
            .with_label("Ends at"),
    ]
}

// ============================================================================
// User Satellites
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Entity for Address {
    const KIND: ResourceKind = ResourceKind::Addresses;
    entity_id!();

    fn descriptors() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::text("street"),
            FieldDescriptor::text("number"),
            FieldDescriptor::number("latitude"),
            FieldDescriptor::number("longitude"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Password {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "startAt", default)]
    pub start_at: Option<String>,
    #[serde(rename = "endAt", default)]
    pub end_at: Option<String>,
}

impl Entity for Password {
    const KIND: ResourceKind = ResourceKind::Passwords;
    entity_id!();

    fn descriptors() -> Vec<FieldDescriptor> {
        let mut fields = vec![FieldDescriptor::secret("content").with_label("Password")];
        fields.extend(validity_window());
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Device {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub operating_system: String,
}

impl Entity for Device {
    const KIND: ResourceKind = ResourceKind::Devices;
    entity_id!();

    fn descriptors() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::text("name"),
            FieldDescriptor::text("ip").with_label("IP address"),
            FieldDescriptor::text("operating_system"),
        ]
    }
}

/// Operator-facing profile; the photo travels as a multipart file part
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub identification: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub photo: Option<String>,
}

impl Entity for Profile {
    const KIND: ResourceKind = ResourceKind::Profiles;
    entity_id!();

    fn descriptors() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::text("identification").optional(),
            FieldDescriptor::text("phone").optional(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DigitalSignature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl Entity for DigitalSignature {
    const KIND: ResourceKind = ResourceKind::DigitalSignatures;
    entity_id!();

    fn descriptors() -> Vec<FieldDescriptor> {
        Vec::new()
    }
}

/// Login session of a user
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub token: String,
    /// `YYYY-MM-DD HH:mm:ss`
    #[serde(default)]
    pub expiration: String,
    #[serde(rename = "FACode", default)]
    pub fa_code: String,
    #[serde(default)]
    pub state: String,
}

impl Entity for Session {
    const KIND: ResourceKind = ResourceKind::Sessions;
    entity_id!();

    fn descriptors() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::datetime("expiration"),
            FieldDescriptor::text("FACode")
                .optional()
                .with_label("2FA code"),
        ]
    }
}

// ============================================================================
// Security Questions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SecurityQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Entity for SecurityQuestion {
    const KIND: ResourceKind = ResourceKind::SecurityQuestions;
    entity_id!();

    fn descriptors() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::text("name").with_label("Question"),
            FieldDescriptor::text("description"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub content: String,
}

impl Entity for Answer {
    const KIND: ResourceKind = ResourceKind::Answers;
    entity_id!();

    fn descriptors() -> Vec<FieldDescriptor> {
        vec![FieldDescriptor::text("content").with_label("Answer")]
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_user_from_backend_record() {
        let record = json!({
            "id": 3,
            "name": "Ana",
            "email": "ana@example.com",
            "created_at": "2024-05-01 10:00:00"
        });
        let Value::Object(record) = record else {
            unreachable!()
        };
        let user = User::from_record(&record).unwrap();
        assert_eq!(user.id, Some(RecordId::from(3)));
        assert_eq!(user.name, "Ana");
        assert_eq!(user.password, "");
    }

    #[test]
    fn test_new_entity_record_has_no_id() {
        let role = Role {
            id: None,
            name: "auditor".into(),
            description: "Read-only".into(),
        };
        let record = role.to_record().unwrap();
        assert!(!record.contains_key("id"));
        assert_eq!(record["name"], json!("auditor"));
    }

    #[test]
    fn test_session_uses_backend_field_names() {
        let session = Session {
            fa_code: "123456".into(),
            expiration: "2030-01-01 08:00:00".into(),
            ..Session::default()
        };
        let record = session.to_record().unwrap();
        assert_eq!(record["FACode"], json!("123456"));
        assert!(record.contains_key("expiration"));
    }

    #[test]
    fn test_user_role_string_id() {
        let Value::Object(record) = json!({"id": "ur-17", "startAt": "2024-01-01 00:00:00", "endAt": null})
        else {
            unreachable!()
        };
        let assignment = UserRole::from_record(&record).unwrap();
        assert_eq!(assignment.id(), Some(&RecordId::from("ur-17")));
        assert_eq!(assignment.end_at, None);
    }

    #[test]
    fn test_invalid_record_names_resource() {
        let Value::Object(record) = json!({"name": 12}) else {
            unreachable!()
        };
        let err = Role::from_record(&record).unwrap_err();
        assert!(err.to_string().contains("roles"));
    }

    #[test]
    fn test_client_user_serde_names() {
        let user = ClientUser {
            uid: "abc".into(),
            email: Some("ops@example.com".into()),
            display_name: Some("Ops".into()),
            photo_url: None,
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["displayName"], json!("Ops"));
        assert!(value.get("photoURL").is_none());
        assert_eq!(user.greeting_name(), "Ops");
    }

    #[test]
    fn test_address_template_numbers_blank() {
        let record = Address::default().to_record().unwrap();
        assert_eq!(record["latitude"], Value::Null);
    }
}
