//! Domain conflicts reported by the backend
//!
//! Some satellites are limited to one active record per user. The backend
//! rejects a second one with a message such as "User already has an address";
//! the console turns that into guidance instead of a generic failure.

use crate::resource::ResourceKind;

/// A recognised "already has a/an <resource>" rejection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainConflict {
    /// Resource named by the backend, lowercase (`address`, `password`)
    pub resource: String,
    /// Matching resource kind, when the name is one the console knows
    pub kind: Option<ResourceKind>,
}

impl DomainConflict {
    /// Guidance shown to the operator
    pub fn guidance(&self) -> String {
        format!(
            "This user already has {} {}. Review or update the existing one instead of creating another.",
            article(&self.resource),
            self.resource
        )
    }
}

/// Detect an "already has a/an <resource>" message (case-insensitive)
pub fn detect_conflict(message: &str) -> Option<DomainConflict> {
    let lower = message.to_lowercase();
    let start = lower.find("already has ")? + "already has ".len();
    let rest = &lower[start..];

    let rest = rest
        .strip_prefix("an ")
        .or_else(|| rest.strip_prefix("a "))?;

    let resource: String = rest
        .split(|c: char| !(c.is_alphanumeric() || c == ' ' || c == '-' || c == '_'))
        .next()
        .unwrap_or("")
        .trim()
        .to_string();

    if resource.is_empty() {
        return None;
    }

    let kind = ResourceKind::from_singular(&resource);
    Some(DomainConflict { resource, kind })
}

fn article(word: &str) -> &'static str {
    match word.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_address_conflict() {
        let conflict = detect_conflict("User already has an address").unwrap();
        assert_eq!(conflict.resource, "address");
        assert_eq!(conflict.kind, Some(ResourceKind::Addresses));
    }

    #[test]
    fn test_detect_password_conflict_inside_longer_message() {
        let conflict = detect_conflict("Error 400: User already has a password.").unwrap();
        assert_eq!(conflict.resource, "password");
        assert_eq!(conflict.kind, Some(ResourceKind::Passwords));
    }

    #[test]
    fn test_detect_unknown_resource_still_conflict() {
        let conflict = detect_conflict("User already has a pet").unwrap();
        assert_eq!(conflict.resource, "pet");
        assert_eq!(conflict.kind, None);
    }

    #[test]
    fn test_no_conflict() {
        assert!(detect_conflict("Internal server error").is_none());
        assert!(detect_conflict("already has").is_none());
        assert!(detect_conflict("User already has an ").is_none());
    }

    #[test]
    fn test_guidance_text() {
        let conflict = detect_conflict("User already has an address").unwrap();
        assert!(conflict.guidance().starts_with("This user already has an address."));
    }
}
