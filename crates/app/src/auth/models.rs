//! Auth data models.

use lienzo::ids::UserId;

use crate::domain::users::UserProfile;

/// Signed-in account as reported by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub uid: UserId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl Principal {
    /// Profile used when the users collection has no document for this account.
    pub fn fallback_profile(&self, default_name: &str) -> UserProfile {
        let name = self
            .display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(default_name);

        let mut profile = UserProfile::new(self.uid.clone(), self.email.clone(), name);
        profile.photo_url.clone_from(&self.photo_url);

        profile
    }
}
