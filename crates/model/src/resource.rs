//! Resource catalogue
//!
//! Every backend resource the console manages, with its REST segment,
//! display names, explicit field descriptors and the endpoint shapes it
//! supports. The generic pages are driven entirely from this table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use sentinel_core::{ConsoleError, ConsoleResult, FieldDescriptor};

use crate::entities::{
    Address, Answer, Device, DigitalSignature, Entity, Password, Permission, Profile, Role,
    RolePermission, SecurityQuestion, Session, User, UserRole,
};
use crate::record::{Record, RecordId};

/// API prefix shared by every resource
pub const API_PREFIX: &str = "/api";

// ============================================================================
// Resource Kind
// ============================================================================

/// A backend resource managed by the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Users,
    Roles,
    Permissions,
    UserRoles,
    RolePermissions,
    Addresses,
    Passwords,
    Devices,
    Profiles,
    DigitalSignatures,
    Sessions,
    SecurityQuestions,
    Answers,
}

impl ResourceKind {
    /// All resource kinds
    pub const ALL: [ResourceKind; 13] = [
        ResourceKind::Users,
        ResourceKind::Roles,
        ResourceKind::Permissions,
        ResourceKind::UserRoles,
        ResourceKind::RolePermissions,
        ResourceKind::Addresses,
        ResourceKind::Passwords,
        ResourceKind::Devices,
        ResourceKind::Profiles,
        ResourceKind::DigitalSignatures,
        ResourceKind::Sessions,
        ResourceKind::SecurityQuestions,
        ResourceKind::Answers,
    ];

    /// REST path segment (`/api/<segment>`)
    pub fn segment(&self) -> &'static str {
        match self {
            ResourceKind::Users => "users",
            ResourceKind::Roles => "roles",
            ResourceKind::Permissions => "permissions",
            ResourceKind::UserRoles => "user-roles",
            ResourceKind::RolePermissions => "role-permissions",
            ResourceKind::Addresses => "addresses",
            ResourceKind::Passwords => "passwords",
            ResourceKind::Devices => "devices",
            ResourceKind::Profiles => "profiles",
            ResourceKind::DigitalSignatures => "digital-signatures",
            ResourceKind::Sessions => "sessions",
            ResourceKind::SecurityQuestions => "security-questions",
            ResourceKind::Answers => "answers",
        }
    }

    /// Lowercase singular noun, as the backend uses it in messages
    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Users => "user",
            ResourceKind::Roles => "role",
            ResourceKind::Permissions => "permission",
            ResourceKind::UserRoles => "user role",
            ResourceKind::RolePermissions => "role permission",
            ResourceKind::Addresses => "address",
            ResourceKind::Passwords => "password",
            ResourceKind::Devices => "device",
            ResourceKind::Profiles => "profile",
            ResourceKind::DigitalSignatures => "digital signature",
            ResourceKind::Sessions => "session",
            ResourceKind::SecurityQuestions => "security question",
            ResourceKind::Answers => "answer",
        }
    }

    /// Plural title shown in headers and the sidebar
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceKind::Users => "Users",
            ResourceKind::Roles => "Roles",
            ResourceKind::Permissions => "Permissions",
            ResourceKind::UserRoles => "User Roles",
            ResourceKind::RolePermissions => "Role Permissions",
            ResourceKind::Addresses => "Addresses",
            ResourceKind::Passwords => "Passwords",
            ResourceKind::Devices => "Devices",
            ResourceKind::Profiles => "Profiles",
            ResourceKind::DigitalSignatures => "Digital Signatures",
            ResourceKind::Sessions => "Sessions",
            ResourceKind::SecurityQuestions => "Security Questions",
            ResourceKind::Answers => "Answers",
        }
    }

    /// Resolve a kind from its singular noun (`address`, `digital signature`)
    pub fn from_singular(noun: &str) -> Option<Self> {
        let noun = noun.trim().to_lowercase().replace(['-', '_'], " ");
        Self::ALL.into_iter().find(|kind| kind.singular() == noun)
    }

    /// Explicit form fields for this resource
    pub fn descriptors(&self) -> Vec<FieldDescriptor> {
        match self {
            ResourceKind::Users => User::descriptors(),
            ResourceKind::Roles => Role::descriptors(),
            ResourceKind::Permissions => Permission::descriptors(),
            ResourceKind::UserRoles => UserRole::descriptors(),
            ResourceKind::RolePermissions => RolePermission::descriptors(),
            ResourceKind::Addresses => Address::descriptors(),
            ResourceKind::Passwords => Password::descriptors(),
            ResourceKind::Devices => Device::descriptors(),
            ResourceKind::Profiles => Profile::descriptors(),
            ResourceKind::DigitalSignatures => DigitalSignature::descriptors(),
            ResourceKind::Sessions => Session::descriptors(),
            ResourceKind::SecurityQuestions => SecurityQuestion::descriptors(),
            ResourceKind::Answers => Answer::descriptors(),
        }
    }

    /// Blank template record built from the typed entity's defaults
    pub fn template(&self) -> ConsoleResult<Record> {
        match self {
            ResourceKind::Users => User::default().to_record(),
            ResourceKind::Roles => Role::default().to_record(),
            ResourceKind::Permissions => Permission::default().to_record(),
            ResourceKind::UserRoles => UserRole::default().to_record(),
            ResourceKind::RolePermissions => RolePermission::default().to_record(),
            ResourceKind::Addresses => Address::default().to_record(),
            ResourceKind::Passwords => Password::default().to_record(),
            ResourceKind::Devices => Device::default().to_record(),
            ResourceKind::Profiles => Profile::default().to_record(),
            ResourceKind::DigitalSignatures => DigitalSignature::default().to_record(),
            ResourceKind::Sessions => Session::default().to_record(),
            ResourceKind::SecurityQuestions => SecurityQuestion::default().to_record(),
            ResourceKind::Answers => Answer::default().to_record(),
        }
    }

    /// Explicit table columns; `None` means infer from the records
    pub fn columns(&self) -> Option<Vec<String>> {
        let columns: &[&str] = match self {
            ResourceKind::Sessions => &["id", "token", "expiration", "FACode", "state", "created_at"],
            ResourceKind::UserRoles | ResourceKind::RolePermissions => &["id", "startAt", "endAt"],
            _ => return None,
        };
        Some(columns.iter().map(|c| c.to_string()).collect())
    }

    /// Whether records of this kind hang off a user
    pub fn is_user_owned(&self) -> bool {
        matches!(
            self,
            ResourceKind::Addresses
                | ResourceKind::Passwords
                | ResourceKind::Devices
                | ResourceKind::Profiles
                | ResourceKind::DigitalSignatures
                | ResourceKind::Sessions
                | ResourceKind::UserRoles
                | ResourceKind::Answers
        )
    }

    /// Whether create/update are sent as `multipart/form-data`
    pub fn uses_multipart(&self) -> bool {
        matches!(self, ResourceKind::Profiles | ResourceKind::DigitalSignatures)
    }

    // ========================================================================
    // Endpoint paths
    // ========================================================================

    /// `/api/<segment>`
    pub fn collection_path(&self) -> String {
        format!("{}/{}", API_PREFIX, self.segment())
    }

    /// `/api/<segment>/<id>`
    pub fn item_path(&self, id: &RecordId) -> String {
        format!("{}/{}", self.collection_path(), id)
    }

    /// Path listing records of this kind in a scope
    pub fn list_path(&self, scope: &Scope) -> ConsoleResult<String> {
        match (self, scope) {
            (_, Scope::All) => Ok(self.collection_path()),
            (ResourceKind::Addresses, Scope::User(uid)) => {
                Ok(format!("{}/users/{}/addresses", API_PREFIX, uid))
            }
            (kind, Scope::User(uid)) if kind.is_user_owned() => {
                Ok(format!("{}/user/{}", kind.collection_path(), uid))
            }
            (ResourceKind::Answers, Scope::Question(qid)) => {
                Ok(format!("{}/question/{}", self.collection_path(), qid))
            }
            _ => Err(self.unsupported(scope)),
        }
    }

    /// Path creating a record of this kind in a scope
    pub fn create_path(&self, scope: &Scope) -> ConsoleResult<String> {
        match (self, scope) {
            (
                ResourceKind::Users
                | ResourceKind::Roles
                | ResourceKind::Permissions
                | ResourceKind::SecurityQuestions,
                Scope::All,
            ) => Ok(self.collection_path()),
            (ResourceKind::Answers, Scope::UserQuestion { user, question }) => Ok(format!(
                "{}/user/{}/question/{}",
                self.collection_path(),
                user,
                question
            )),
            (ResourceKind::UserRoles, Scope::UserRole { user, role }) => Ok(format!(
                "{}/user/{}/role/{}",
                self.collection_path(),
                user,
                role
            )),
            (ResourceKind::RolePermissions, Scope::RolePermission { role, permission }) => {
                Ok(format!(
                    "{}/role/{}/permission/{}",
                    self.collection_path(),
                    role,
                    permission
                ))
            }
            (ResourceKind::Answers | ResourceKind::UserRoles, Scope::User(_)) => {
                Err(self.unsupported(scope))
            }
            (_, Scope::User(_)) => self.list_path(scope),
            _ => Err(self.unsupported(scope)),
        }
    }

    fn unsupported(&self, scope: &Scope) -> ConsoleError {
        ConsoleError::unsupported_scope(self.segment(), scope.to_string())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ResourceKind {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.segment() == s)
            .ok_or_else(|| ConsoleError::UnknownResource(s.to_string()))
    }
}

// ============================================================================
// Scope
// ============================================================================

/// Parent context a request is made in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// The whole collection
    #[default]
    All,
    /// Records owned by one user
    User(RecordId),
    /// Answers to one security question
    Question(RecordId),
    /// Answer of a user to a question
    UserQuestion { user: RecordId, question: RecordId },
    /// Assignment of a role to a user
    UserRole { user: RecordId, role: RecordId },
    /// Grant of a permission to a role
    RolePermission { role: RecordId, permission: RecordId },
}

impl Scope {
    /// Owning user, when the scope has one
    pub fn user(&self) -> Option<&RecordId> {
        match self {
            Scope::User(user) | Scope::UserQuestion { user, .. } | Scope::UserRole { user, .. } => {
                Some(user)
            }
            _ => None,
        }
    }

    /// Scope to list the same records after a mutation in this scope
    pub fn list_scope(&self) -> Scope {
        match self.user() {
            Some(user) => Scope::User(user.clone()),
            None => Scope::All,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => write!(f, "as a collection"),
            Scope::User(user) => write!(f, "per user {}", user),
            Scope::Question(question) => write!(f, "per question {}", question),
            Scope::UserQuestion { user, question } => {
                write!(f, "for user {} and question {}", user, question)
            }
            Scope::UserRole { user, role } => write!(f, "for user {} and role {}", user, role),
            Scope::RolePermission { role, permission } => {
                write!(f, "for role {} and permission {}", role, permission)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn uid() -> RecordId {
        RecordId::from(4)
    }

    #[test]
    fn test_segments_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.segment().parse::<ResourceKind>().unwrap(), kind);
        }
        assert!("widgets".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_from_singular() {
        assert_eq!(
            ResourceKind::from_singular("Address"),
            Some(ResourceKind::Addresses)
        );
        assert_eq!(
            ResourceKind::from_singular("digital-signature"),
            Some(ResourceKind::DigitalSignatures)
        );
        assert_eq!(ResourceKind::from_singular("pet"), None);
    }

    #[test]
    fn test_standard_paths() {
        assert_eq!(ResourceKind::Roles.collection_path(), "/api/roles");
        assert_eq!(
            ResourceKind::Roles.item_path(&RecordId::from(9)),
            "/api/roles/9"
        );
        assert_eq!(
            ResourceKind::SecurityQuestions.create_path(&Scope::All).unwrap(),
            "/api/security-questions"
        );
    }

    #[test]
    fn test_user_scoped_paths() {
        let scope = Scope::User(uid());
        assert_eq!(
            ResourceKind::Addresses.list_path(&scope).unwrap(),
            "/api/users/4/addresses"
        );
        assert_eq!(
            ResourceKind::Addresses.create_path(&scope).unwrap(),
            "/api/users/4/addresses"
        );
        assert_eq!(
            ResourceKind::Passwords.create_path(&scope).unwrap(),
            "/api/passwords/user/4"
        );
        assert_eq!(
            ResourceKind::Sessions.list_path(&scope).unwrap(),
            "/api/sessions/user/4"
        );
        assert_eq!(
            ResourceKind::UserRoles.list_path(&scope).unwrap(),
            "/api/user-roles/user/4"
        );
    }

    #[test]
    fn test_assignment_paths() {
        let scope = Scope::UserRole {
            user: uid(),
            role: RecordId::from(2),
        };
        assert_eq!(
            ResourceKind::UserRoles.create_path(&scope).unwrap(),
            "/api/user-roles/user/4/role/2"
        );

        let scope = Scope::RolePermission {
            role: RecordId::from(2),
            permission: RecordId::from(8),
        };
        assert_eq!(
            ResourceKind::RolePermissions.create_path(&scope).unwrap(),
            "/api/role-permissions/role/2/permission/8"
        );

        let scope = Scope::UserQuestion {
            user: uid(),
            question: RecordId::from(3),
        };
        assert_eq!(
            ResourceKind::Answers.create_path(&scope).unwrap(),
            "/api/answers/user/4/question/3"
        );
        assert_eq!(
            ResourceKind::Answers
                .list_path(&Scope::Question(RecordId::from(3)))
                .unwrap(),
            "/api/answers/question/3"
        );
    }

    #[test]
    fn test_unsupported_scopes() {
        assert!(ResourceKind::Roles.list_path(&Scope::User(uid())).is_err());
        assert!(ResourceKind::Addresses.create_path(&Scope::All).is_err());
        assert!(ResourceKind::UserRoles.create_path(&Scope::User(uid())).is_err());
        let err = ResourceKind::Users
            .list_path(&Scope::Question(RecordId::from(1)))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_scope_user_and_list_scope() {
        let scope = Scope::UserRole {
            user: uid(),
            role: RecordId::from(2),
        };
        assert_eq!(scope.user(), Some(&uid()));
        assert_eq!(scope.list_scope(), Scope::User(uid()));
        assert_eq!(Scope::All.list_scope(), Scope::All);
    }

    #[test]
    fn test_descriptors_never_include_audit_fields() {
        for kind in ResourceKind::ALL {
            for descriptor in kind.descriptors() {
                assert!(
                    !sentinel_core::is_form_hidden(&descriptor.name),
                    "{} exposes {}",
                    kind,
                    descriptor.name
                );
            }
        }
    }

    #[test]
    fn test_templates_cover_descriptors() {
        for kind in ResourceKind::ALL {
            let template = kind.template().unwrap();
            for descriptor in kind.descriptors() {
                assert!(
                    template.contains_key(&descriptor.name),
                    "{} template lacks {}",
                    kind,
                    descriptor.name
                );
            }
        }
    }

    #[test]
    fn test_explicit_columns() {
        let cols = ResourceKind::Sessions.columns().unwrap();
        assert_eq!(cols[3], "FACode");
        assert!(ResourceKind::Users.columns().is_none());
    }
}
