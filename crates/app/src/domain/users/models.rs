//! User models.

use jiff::Timestamp;
use lienzo::{addresses::AddressBook, ids::UserId};
use serde::{Deserialize, Serialize};

/// Access level stored on the profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Shopper
    #[default]
    User,
    /// Dashboard administrator
    Admin,
}

/// Profile document stored in the users collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: UserId,
    pub email: Option<String>,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub addresses: AddressBook,
    pub created_at: Timestamp,
}

impl UserProfile {
    /// A new shopper profile with no saved addresses.
    pub fn new(uid: UserId, email: Option<String>, name: impl Into<String>) -> Self {
        Self {
            uid,
            email,
            name: name.into(),
            role: Role::User,
            photo_url: None,
            phone: None,
            addresses: AddressBook::default(),
            created_at: Timestamp::now(),
        }
    }

    /// Whether the profile may use the admin dashboard.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn profiles_without_role_default_to_user() -> TestResult {
        let profile: UserProfile = serde_json::from_str(
            r#"{"uid":"u1","email":"a@example.com","name":"Asha","createdAt":"2025-01-01T00:00:00Z"}"#,
        )?;

        assert_eq!(profile.role, Role::User);
        assert!(profile.addresses.is_empty());
        assert!(!profile.is_admin());

        Ok(())
    }
}
