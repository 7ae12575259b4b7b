use async_trait::async_trait;

use super::profile::UserProfile;
use super::username::{Username, UsernameReservation};
use crate::shared::{DomainError, UserId};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, profile: &UserProfile) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError>;
}

#[async_trait]
pub trait UsernameRepository: Send + Sync {
    async fn find(&self, username: &Username) -> Result<Option<UsernameReservation>, DomainError>;

    /// Reserve `reservation`, release `previous` and store the profile in one
    /// atomic write. A concurrent claim of the same name fails with
    /// `DomainError::UsernameTaken`.
    async fn claim(
        &self,
        reservation: &UsernameReservation,
        previous: Option<&Username>,
        profile: &UserProfile,
    ) -> Result<(), DomainError>;
}
