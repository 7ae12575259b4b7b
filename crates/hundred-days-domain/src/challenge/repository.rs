use async_trait::async_trait;

use super::aggregate::Challenge;
use crate::shared::{ChallengeId, DomainError, UserId};

/// Owner-scoped challenge storage. Every read and delete names the owner so a
/// user can never see or touch another user's documents.
#[async_trait]
pub trait ChallengeRepository: Send + Sync {
    async fn save(&self, challenge: &Challenge) -> Result<(), DomainError>;

    /// Write title and archive state only, leaving the check-in counters as
    /// stored. Fails with `ChallengeNotFound` when the owner holds no such challenge.
    async fn update_metadata(&self, challenge: &Challenge) -> Result<(), DomainError>;

    async fn find_by_id(
        &self,
        owner_id: &UserId,
        id: &ChallengeId,
    ) -> Result<Option<Challenge>, DomainError>;

    /// All challenges of the owner, oldest first
    async fn find_all_by_owner(&self, owner_id: &UserId) -> Result<Vec<Challenge>, DomainError>;

    /// Challenges that are neither archived nor completed
    async fn count_active(&self, owner_id: &UserId) -> Result<u32, DomainError>;

    async fn delete(&self, owner_id: &UserId, id: &ChallengeId) -> Result<(), DomainError>;
}
