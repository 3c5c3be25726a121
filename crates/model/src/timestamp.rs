//! Date-time values exchanged with the backend
//!
//! Pickers produce `YYYY-MM-DDTHH:mm:ss` (older ones drop the seconds); the backend
//! stores `YYYY-MM-DD HH:mm:ss`. Session expirations must lie in the future
//! at submission time.

use chrono::{Local, NaiveDateTime};
use serde_json::Value;

use sentinel_core::{ConsoleError, ConsoleResult};

use crate::record::Record;

/// Format the backend expects
pub const BACKEND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of a `datetime-local` input value
pub const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const ACCEPTED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a picker or backend value into a local date-time
pub fn parse_local(value: &str) -> ConsoleResult<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConsoleError::InvalidExpiration("a date and time is required".into()));
    }

    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.with_timezone(&Local).naive_local())
        })
        .ok_or_else(|| ConsoleError::InvalidExpiration(format!("'{}' is not a date and time", value)))
}

/// `YYYY-MM-DD HH:mm:ss`
pub fn format_backend(value: &NaiveDateTime) -> String {
    value.format(BACKEND_FORMAT).to_string()
}

/// Convert a picker value into the backend format
pub fn to_backend(value: &str) -> ConsoleResult<String> {
    parse_local(value).map(|dt| format_backend(&dt))
}

/// Convert a stored value into what a `datetime-local` input accepts
///
/// Unparseable values are returned unchanged so the operator can see them.
pub fn to_input(value: &str) -> String {
    match parse_local(value) {
        Ok(dt) => dt.format(INPUT_FORMAT).to_string(),
        Err(_) => value.to_string(),
    }
}

// ============================================================================
// Session Expiration
// ============================================================================

/// Validate a picker value as a future expiration relative to `now`
pub fn validate_expiration(value: &str, now: NaiveDateTime) -> ConsoleResult<NaiveDateTime> {
    let expiration = parse_local(value)?;
    if expiration <= now {
        return Err(ConsoleError::InvalidExpiration(
            "expiration must be in the future".into(),
        ));
    }
    Ok(expiration)
}

/// Build the create-session payload: `{expiration, FACode?}`
///
/// Rejects past or malformed expirations before anything reaches the network.
pub fn session_payload(expiration: &str, fa_code: &str, now: NaiveDateTime) -> ConsoleResult<Record> {
    let expiration = validate_expiration(expiration, now)?;

    let mut payload = Record::new();
    payload.insert(
        "expiration".into(),
        Value::String(format_backend(&expiration)),
    );
    let fa_code = fa_code.trim();
    if !fa_code.is_empty() {
        payload.insert("FACode".into(), Value::String(fa_code.to_string()));
    }
    Ok(payload)
}

/// Current wall-clock time in local time
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_picker_value() {
        let dt = parse_local("2025-06-15T13:45").unwrap();
        assert_eq!(format_backend(&dt), "2025-06-15 13:45:00");
    }

    #[test]
    fn test_parse_value_with_seconds() {
        assert_eq!(to_backend("2025-06-15T13:45:30").unwrap(), "2025-06-15 13:45:30");
        assert_eq!(to_backend("2025-06-15 13:45:30").unwrap(), "2025-06-15 13:45:30");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_local("tomorrow").is_err());
        assert!(parse_local("   ").is_err());
    }

    #[test]
    fn test_to_input() {
        assert_eq!(to_input("2025-06-15 13:45:30"), "2025-06-15T13:45:30");
        assert_eq!(to_input("2025-06-15 13:45"), "2025-06-15T13:45:00");
        assert_eq!(to_input("not a date"), "not a date");
    }

    #[test]
    fn test_expiration_in_past_rejected() {
        let err = validate_expiration("2025-06-15T11:59", noon()).unwrap_err();
        assert!(err.is_validation());

        let err = validate_expiration("2025-06-15T12:00", noon()).unwrap_err();
        assert!(err.to_string().contains("future"));
    }

    #[test]
    fn test_session_payload_future() {
        let payload = session_payload("2025-06-16T09:30", " 4321 ", noon()).unwrap();
        assert_eq!(payload["expiration"], "2025-06-16 09:30:00");
        assert_eq!(payload["FACode"], "4321");
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn test_session_payload_without_code() {
        let payload = session_payload("2025-06-16T09:30", "", noon()).unwrap();
        assert!(!payload.contains_key("FACode"));
    }

    #[test]
    fn test_session_payload_format_matches_pattern() {
        let payload = session_payload("2026-01-02T03:04", "", noon()).unwrap();
        let text = payload["expiration"].as_str().unwrap();
        assert_eq!(text.len(), "YYYY-MM-DD HH:mm:ss".len());
        assert!(NaiveDateTime::parse_from_str(text, BACKEND_FORMAT).is_ok());
    }
}
