//! Users repository.

use async_trait::async_trait;
use lienzo::{addresses::Address, ids::UserId};
use mockall::automock;

use crate::{database::DatabaseError, domain::users::models::UserProfile};

/// Access to the users collection.
#[automock]
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Load a profile, `None` when the user has no profile document yet.
    async fn get_profile(&self, uid: &UserId) -> Result<Option<UserProfile>, DatabaseError>;

    /// Create or overwrite a profile document.
    async fn set_profile(&self, profile: UserProfile) -> Result<(), DatabaseError>;

    /// Merge the given profile into the stored document.
    async fn merge_profile(&self, profile: UserProfile) -> Result<(), DatabaseError>;

    /// Replace the saved address list.
    async fn set_addresses(
        &self,
        uid: &UserId,
        addresses: Vec<Address>,
    ) -> Result<(), DatabaseError>;
}
