//! Authentication provider seam.

use async_trait::async_trait;
use mockall::automock;
use tokio::sync::mpsc::Receiver;

use crate::auth::{AuthError, Principal};

/// Hosted authentication provider.
#[automock]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Email and password sign-in.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Principal, AuthError>;

    /// Create an email and password account and sign it in.
    async fn create_account(&self, email: &str, password: &str) -> Result<Principal, AuthError>;

    /// Set the account's display name.
    async fn update_display_name(&self, principal: &Principal, name: &str)
    -> Result<(), AuthError>;

    /// Federated sign-in through a popup. `None` when the popup produced no account.
    async fn sign_in_with_popup(&self) -> Result<Option<Principal>, AuthError>;

    /// Result of a redirect-based federated sign-in, if one is pending.
    async fn redirect_result(&self) -> Result<Option<Principal>, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Account restored from the provider's own persistence.
    fn current_principal(&self) -> Option<Principal>;

    /// Session changes: `Some` on sign-in, `None` on sign-out.
    fn subscribe(&self) -> Receiver<Option<Principal>>;
}
