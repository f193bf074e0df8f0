//! Authentication session
//!
//! Holds the signed-in account and its profile for the lifetime of a client
//! session. Every operation clears the previous error, and a failed operation
//! leaves its message in [`AuthSession::error`].

use std::sync::Arc;

use tokio::sync::mpsc::Receiver;
use tracing::{error, info};

use crate::{
    auth::{AuthError, AuthProvider, Principal},
    domain::users::{UserProfile, UsersRepository},
};

/// Name given to federated accounts that carry no display name.
pub const FEDERATED_FALLBACK_NAME: &str = "Google User";

/// Name given to password accounts whose profile document is missing.
pub const PASSWORD_FALLBACK_NAME: &str = "User";

pub struct AuthSession {
    provider: Arc<dyn AuthProvider>,
    users: Arc<dyn UsersRepository>,
    principal: Option<Principal>,
    profile: Option<UserProfile>,
    is_loading: bool,
    error: Option<String>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("principal", &self.principal)
            .field("profile", &self.profile)
            .field("is_loading", &self.is_loading)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl AuthSession {
    pub fn new(provider: Arc<dyn AuthProvider>, users: Arc<dyn UsersRepository>) -> Self {
        Self {
            provider,
            users,
            principal: None,
            profile: None,
            is_loading: false,
            error: None,
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a profile with the admin role is signed in.
    pub fn is_admin(&self) -> bool {
        self.profile.as_ref().is_some_and(UserProfile::is_admin)
    }

    /// Email and password sign-in.
    ///
    /// # Errors
    ///
    /// Returns the provider or database failure; its message is also kept in
    /// [`Self::error`].
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        self.start();

        let result = self.password_sign_in(email, password).await;

        self.finish(result)
    }

    /// Create an account, name it and store a shopper profile.
    ///
    /// # Errors
    ///
    /// Returns the provider or database failure; its message is also kept in
    /// [`Self::error`].
    pub async fn sign_up(&mut self, email: &str, password: &str, name: &str) -> Result<(), AuthError> {
        self.start();

        let result = self.create_account(email, password, name).await;

        self.finish(result)
    }

    /// Federated sign-in through a popup, creating a profile on first use.
    ///
    /// # Errors
    ///
    /// Returns the provider or database failure; its message is also kept in
    /// [`Self::error`].
    pub async fn sign_in_federated(&mut self) -> Result<(), AuthError> {
        self.start();

        let result = match self.provider.sign_in_with_popup().await {
            Ok(Some(principal)) => self.establish_federated(principal).await,
            Ok(None) => Ok(()),
            Err(error) => Err(error),
        };

        self.finish(result)
    }

    /// Finish a redirect-based federated sign-in. Returns whether one was pending.
    ///
    /// # Errors
    ///
    /// Returns the provider or database failure; its message is also kept in
    /// [`Self::error`].
    pub async fn complete_redirect(&mut self) -> Result<bool, AuthError> {
        self.start();

        let result = match self.provider.redirect_result().await {
            Ok(Some(principal)) => self.establish_federated(principal).await.map(|()| true),
            Ok(None) => Ok(false),
            Err(error) => Err(error),
        };

        self.finish(result)
    }

    /// Sign out and forget the profile.
    ///
    /// # Errors
    ///
    /// Returns the provider failure; the session is left signed in.
    pub async fn sign_out(&mut self) -> Result<(), AuthError> {
        if let Err(error) = self.provider.sign_out().await {
            return Err(self.record(error));
        }

        info!("signed out");

        self.principal = None;
        self.profile = None;

        Ok(())
    }

    /// Merge `profile` into the stored document and keep it as the current profile.
    ///
    /// # Errors
    ///
    /// Returns the database failure; the current profile is unchanged.
    pub async fn update_profile(&mut self, profile: UserProfile) -> Result<(), AuthError> {
        if let Err(error) = self.users.merge_profile(profile.clone()).await {
            return Err(self.record(error.into()));
        }

        self.profile = Some(profile);

        Ok(())
    }

    /// Re-establish a session the provider persisted from an earlier visit.
    ///
    /// # Errors
    ///
    /// Returns the database failure while loading the profile.
    pub async fn restore(&mut self) -> Result<(), AuthError> {
        let principal = self.provider.current_principal();

        self.session_changed(principal).await
    }

    /// Handle one session change from the provider.
    ///
    /// A signed-in account loads its profile document, which may be missing; a
    /// sign-out clears both.
    ///
    /// # Errors
    ///
    /// Returns the database failure while loading the profile.
    pub async fn session_changed(&mut self, principal: Option<Principal>) -> Result<(), AuthError> {
        self.is_loading = true;

        let result = match principal {
            Some(principal) => match self.users.get_profile(&principal.uid).await {
                Ok(profile) => {
                    self.principal = Some(principal);
                    self.profile = profile;
                    Ok(())
                }
                Err(error) => Err(AuthError::from(error)),
            },
            None => {
                self.principal = None;
                self.profile = None;
                Ok(())
            }
        };

        self.is_loading = false;

        result.map_err(|error| self.record(error))
    }

    /// Apply session changes in arrival order until the subscription closes.
    ///
    /// Returns the number of changes applied. A change whose profile fails to
    /// load is recorded in [`Self::error`] and does not stop the loop.
    pub async fn follow(&mut self, mut receiver: Receiver<Option<Principal>>) -> usize {
        let mut applied = 0;

        while let Some(principal) = receiver.recv().await {
            // The failure is already recorded on the session.
            if self.session_changed(principal).await.is_ok() {
                applied += 1;
            }
        }

        applied
    }

    async fn password_sign_in(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        let principal = self.provider.sign_in_with_password(email, password).await?;

        let profile = match self.users.get_profile(&principal.uid).await? {
            Some(profile) => profile,
            None => principal.fallback_profile(PASSWORD_FALLBACK_NAME),
        };

        info!(uid = %principal.uid, "signed in");

        self.principal = Some(principal);
        self.profile = Some(profile);

        Ok(())
    }

    async fn create_account(&mut self, email: &str, password: &str, name: &str) -> Result<(), AuthError> {
        let principal = self.provider.create_account(email, password).await?;

        self.provider.update_display_name(&principal, name).await?;

        let profile = UserProfile::new(principal.uid.clone(), Some(email.to_string()), name);

        self.users.set_profile(profile.clone()).await?;

        info!(uid = %principal.uid, "created account");

        self.principal = Some(principal);
        self.profile = Some(profile);

        Ok(())
    }

    async fn establish_federated(&mut self, principal: Principal) -> Result<(), AuthError> {
        let profile = match self.users.get_profile(&principal.uid).await? {
            Some(profile) => profile,
            None => {
                let profile = principal.fallback_profile(FEDERATED_FALLBACK_NAME);

                self.users.set_profile(profile.clone()).await?;

                profile
            }
        };

        info!(uid = %principal.uid, "signed in with federated provider");

        self.principal = Some(principal);
        self.profile = Some(profile);

        Ok(())
    }

    fn start(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    fn finish<T>(&mut self, result: Result<T, AuthError>) -> Result<T, AuthError> {
        self.is_loading = false;

        result.map_err(|error| self.record(error))
    }

    fn record(&mut self, failure: AuthError) -> AuthError {
        error!(error = %failure, "authentication operation failed");

        self.error = Some(failure.user_message());

        failure
    }
}
