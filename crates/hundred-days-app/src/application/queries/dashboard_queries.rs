use log::debug;
use std::sync::Arc;

use crate::application::dtos::StreakOverviewDto;
use crate::application::services::SessionService;
use hundred_days_domain::challenge::ChallengeRepository;
use hundred_days_domain::shared::{Clock, DomainError};
use hundred_days_domain::streak::StreakOverview;

pub struct DashboardQueryService {
    challenge_repo: Arc<dyn ChallengeRepository>,
    session: Arc<SessionService>,
    clock: Arc<dyn Clock>,
}

impl DashboardQueryService {
    pub fn new(
        challenge_repo: Arc<dyn ChallengeRepository>,
        session: Arc<SessionService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            challenge_repo,
            session,
            clock,
        }
    }

    pub async fn overview(&self) -> Result<StreakOverviewDto, DomainError> {
        let owner_id = self.session.require_user().await?;
        let challenges = self.challenge_repo.find_all_by_owner(&owner_id).await?;
        let overview = StreakOverview::compute(&challenges, self.clock.today());

        debug!(
            "[streak] overview owner={} max_streak={} urgent={:?}",
            owner_id,
            overview.max_streak,
            overview.most_urgent.as_ref().map(|u| u.title.as_str())
        );

        Ok(overview.into())
    }
}
