//! Account roles.
//!
//! The API stores the role as a free-form string. Only `admin` carries meaning
//! on this side (it unlocks the admin dashboard); every other value is kept
//! verbatim so a record round-trips unchanged.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Role attached to a user account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Administrator with access to the admin dashboard.
    Admin,
    /// Regular registered user.
    #[default]
    User,
    /// Any other role string issued by the API.
    Other(String),
}

impl Role {
    /// Returns the role as it appears on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Other(role) => role,
        }
    }

    /// Returns `true` for the administrator role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "admin" => Self::Admin,
            "user" => Self::User,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(role) => role,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_roles() {
        assert_eq!(Role::from("admin"), Role::Admin);
        assert_eq!(Role::from("user"), Role::User);
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
    }

    #[test]
    fn test_role_matching_is_exact() {
        // "Admin" is not the admin role; comparison is case-sensitive.
        let role = Role::from("Admin");
        assert_eq!(role, Role::Other("Admin".to_string()));
        assert!(!role.is_admin());
    }

    #[test]
    fn test_unknown_role_roundtrip() {
        let role: Role = serde_json::from_str("\"researcher\"").unwrap();
        assert_eq!(role.as_str(), "researcher");
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"researcher\"");
    }

    #[test]
    fn test_admin_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }
}
