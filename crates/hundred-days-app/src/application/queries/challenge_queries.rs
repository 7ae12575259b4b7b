use std::sync::Arc;

use crate::application::dtos::{ChallengeDetailDto, ChallengeDto, CheckInDto};
use crate::application::services::SessionService;
use hundred_days_domain::challenge::ChallengeRepository;
use hundred_days_domain::check_in::CheckInRepository;
use hundred_days_domain::shared::{ChallengeId, Clock, DomainError};

/// Read side for challenge lists and detail screens. Reads work offline.
pub struct ChallengeQueryService {
    challenge_repo: Arc<dyn ChallengeRepository>,
    check_in_repo: Arc<dyn CheckInRepository>,
    session: Arc<SessionService>,
    clock: Arc<dyn Clock>,
}

impl ChallengeQueryService {
    pub fn new(
        challenge_repo: Arc<dyn ChallengeRepository>,
        check_in_repo: Arc<dyn CheckInRepository>,
        session: Arc<SessionService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            challenge_repo,
            check_in_repo,
            session,
            clock,
        }
    }

    async fn list(&self, archived: bool) -> Result<Vec<ChallengeDto>, DomainError> {
        let owner_id = self.session.require_user().await?;
        let today = self.clock.today();

        Ok(self
            .challenge_repo
            .find_all_by_owner(&owner_id)
            .await?
            .iter()
            .filter(|c| c.is_archived() == archived)
            .map(|c| ChallengeDto::from_challenge(c, today))
            .collect())
    }

    /// Non-archived challenges, oldest first
    pub async fn list_active(&self) -> Result<Vec<ChallengeDto>, DomainError> {
        self.list(false).await
    }

    pub async fn list_archived(&self) -> Result<Vec<ChallengeDto>, DomainError> {
        self.list(true).await
    }

    pub async fn get_detail(&self, challenge_id: &str) -> Result<ChallengeDetailDto, DomainError> {
        let owner_id = self.session.require_user().await?;
        let id = ChallengeId::from_string(challenge_id);

        let challenge = self
            .challenge_repo
            .find_by_id(&owner_id, &id)
            .await?
            .ok_or_else(|| DomainError::ChallengeNotFound(challenge_id.to_string()))?;

        let check_ins = self
            .check_in_repo
            .find_by_challenge(&id)
            .await?
            .iter()
            .map(CheckInDto::from)
            .collect();

        Ok(ChallengeDetailDto {
            challenge: ChallengeDto::from_challenge(&challenge, self.clock.today()),
            check_ins,
        })
    }
}
