//! User record as returned by the identity endpoint.

use serde::{Deserialize, Serialize};

use crate::{Email, Role, UserId};

/// A user account as the API describes it.
///
/// This is what `/api/auth/login` returns under `user`, what `/api/auth/me`
/// returns as its body, and what the admin user listing returns per entry.
/// Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Document id. Some endpoints send `_id`, others `id`.
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Email,
    /// Account role, absent for accounts created before roles existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Creation timestamp as sent by the API (ISO-8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl UserRecord {
    /// Create a record with only the fields a sign-in form needs.
    #[must_use]
    pub const fn new(name: String, email: Email) -> Self {
        Self {
            id: None,
            name,
            email,
            role: None,
            phone: None,
            created_at: None,
        }
    }

    /// Set the role.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Returns `true` when the record carries the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.as_ref().is_some_and(Role::is_admin)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_me_response() {
        let user: UserRecord =
            serde_json::from_str(r#"{"name":"Asha","email":"a@x.com","role":"admin"}"#).unwrap();
        assert_eq!(user.name, "Asha");
        assert_eq!(user.email.as_str(), "a@x.com");
        assert!(user.is_admin());
        assert!(user.id.is_none());
    }

    #[test]
    fn test_deserialize_mongo_id_and_extra_fields() {
        let user: UserRecord = serde_json::from_str(
            r#"{"_id":"u1","name":"Bo","email":"b@x.com","createdAt":"2025-04-01T10:00:00Z","__v":0}"#,
        )
        .unwrap();
        assert_eq!(user.id, Some(UserId::new("u1")));
        assert_eq!(user.created_at.as_deref(), Some("2025-04-01T10:00:00Z"));
        assert!(!user.is_admin());
    }

    #[test]
    fn test_missing_role_is_not_admin() {
        let user = UserRecord::new("Bo".to_string(), Email::parse("b@x.com").unwrap());
        assert!(!user.is_admin());
        assert!(user.with_role(Role::Admin).is_admin());
    }
}
