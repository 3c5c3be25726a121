//! Untyped records exchanged with the backend
//!
//! The generic table and form work on JSON objects whose key order follows
//! the server response. Identifiers are numeric for most resources and
//! strings for assignments and sessions, so `RecordId` accepts both.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use sentinel_core::{ConsoleError, ConsoleResult, is_form_hidden};

/// A backend record: field name to JSON value, in server order
pub type Record = Map<String, Value>;

// ============================================================================
// Record Identifier
// ============================================================================

/// Identifier of a backend record (numeric or opaque string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the identifier from a JSON value
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self(n.to_string())),
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.trim().to_string())),
            _ => None,
        }
    }

    /// JSON form of the identifier; numeric ids stay numbers
    pub fn to_value(&self) -> Value {
        match self.0.parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(self.0.clone()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        RecordId::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom("expected a numeric or string identifier"))
    }
}

// ============================================================================
// Record Helpers
// ============================================================================

/// Identifier of a record, if it has one
pub fn record_id(record: &Record) -> Option<RecordId> {
    record.get("id").and_then(RecordId::from_value)
}

/// Identifier of a record, or an error naming the resource
pub fn require_id(record: &Record, resource: &str) -> ConsoleResult<RecordId> {
    record_id(record).ok_or_else(|| ConsoleError::MissingIdentifier(resource.to_string()))
}

/// Remove the audit fields the server owns (`id`, `created_at`, `updated_at`)
pub fn strip_audit_fields(record: &mut Record) {
    record.retain(|key, _| !is_form_hidden(key));
}

/// Copy of a record without audit fields
pub fn without_audit_fields(record: &Record) -> Record {
    let mut copy = record.clone();
    strip_audit_fields(&mut copy);
    copy
}

/// Display text of a field, empty when missing or null
pub fn field_text(record: &Record, name: &str) -> String {
    match record.get(name) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Normalise a response body into a list of records
///
/// Collections come back as arrays, but per-user satellites (profile,
/// signature) come back as a single object.
pub fn records_from_value(value: Value) -> Vec<Record> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        Value::Object(map) => vec![map],
        _ => Vec::new(),
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

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_record_id_from_number_and_string() {
        assert_eq!(RecordId::from_value(&json!(7)), Some(RecordId::from(7)));
        assert_eq!(
            RecordId::from_value(&json!("a1b2")),
            Some(RecordId::from("a1b2"))
        );
        assert_eq!(RecordId::from_value(&json!("  ")), None);
        assert_eq!(RecordId::from_value(&Value::Null), None);
    }

    #[test]
    fn test_record_id_serializes_numbers_as_numbers() {
        assert_eq!(serde_json::to_value(RecordId::from(12)).unwrap(), json!(12));
        assert_eq!(
            serde_json::to_value(RecordId::from("ab-1")).unwrap(),
            json!("ab-1")
        );
        let parsed: RecordId = serde_json::from_value(json!(5)).unwrap();
        assert_eq!(parsed.as_str(), "5");
    }

    #[test]
    fn test_strip_audit_fields() {
        let mut r = record(json!({
            "id": 1,
            "name": "admin",
            "created_at": "2024-01-01",
            "updated_at": "2024-01-02",
            "password": "secret"
        }));
        strip_audit_fields(&mut r);
        let keys: Vec<&str> = r.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "password"]);
    }

    #[test]
    fn test_require_id() {
        let r = record(json!({"id": 3, "name": "x"}));
        assert_eq!(require_id(&r, "roles").unwrap(), RecordId::from(3));

        let r = record(json!({"name": "x"}));
        let err = require_id(&r, "roles").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_field_text() {
        let r = record(json!({"name": "Ana", "age": 30, "note": null}));
        assert_eq!(field_text(&r, "name"), "Ana");
        assert_eq!(field_text(&r, "age"), "30");
        assert_eq!(field_text(&r, "note"), "");
        assert_eq!(field_text(&r, "missing"), "");
    }

    #[test]
    fn test_records_from_value_shapes() {
        assert_eq!(records_from_value(json!([{"id": 1}, 4, {"id": 2}])).len(), 2);
        assert_eq!(records_from_value(json!({"id": 1})).len(), 1);
        assert!(records_from_value(Value::Null).is_empty());
    }
}
