use async_trait::async_trait;
use chrono::NaiveDate;

use super::record::CheckInRecord;
use crate::challenge::Challenge;
use crate::shared::{ChallengeId, DomainError, UserId};

/// What a `record` call ended up writing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInWrite {
    Recorded,
    /// A check-in for that date was already stored; nothing was written
    AlreadyRecorded,
}

#[async_trait]
pub trait CheckInRepository: Send + Sync {
    /// Persist the new record together with the challenge counters it produced.
    /// Both writes commit or neither does. The counters are only written when
    /// the stored challenge still holds the check-in total the caller loaded;
    /// otherwise the call fails with `DomainError::Conflict`.
    async fn record(
        &self,
        challenge: &Challenge,
        record: &CheckInRecord,
    ) -> Result<CheckInWrite, DomainError>;

    /// Records of a challenge ordered by day number
    async fn find_by_challenge(
        &self,
        challenge_id: &ChallengeId,
    ) -> Result<Vec<CheckInRecord>, DomainError>;

    async fn find_by_challenge_on(
        &self,
        challenge_id: &ChallengeId,
        date: NaiveDate,
    ) -> Result<Option<CheckInRecord>, DomainError>;

    /// Records of a challenge within `[start, end]`
    async fn find_in_range(
        &self,
        challenge_id: &ChallengeId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CheckInRecord>, DomainError>;

    /// Total check-ins across every challenge of the owner
    async fn count_by_owner(&self, owner_id: &UserId) -> Result<u32, DomainError>;
}
