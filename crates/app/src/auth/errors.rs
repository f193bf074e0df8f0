//! Auth errors.

use thiserror::Error;

use crate::database::DatabaseError;

/// Failures reported by the authentication provider or while loading a profile.
///
/// The display text is what the sign-in forms show.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredential,

    #[error("Email already in use")]
    EmailAlreadyInUse,

    #[error("Sign in was cancelled")]
    PopupClosed,

    #[error("You must be signed in")]
    NotSignedIn,

    /// Any other provider failure, carrying the provider's own message.
    #[error("{0}")]
    Provider(String),

    #[error("{0}")]
    Database(#[from] DatabaseError),
}

impl AuthError {
    /// Text shown in the form's error field.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
