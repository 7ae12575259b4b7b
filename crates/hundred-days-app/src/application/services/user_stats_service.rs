use log::{info, warn};
use std::sync::Arc;

use hundred_days_domain::challenge::ChallengeRepository;
use hundred_days_domain::check_in::CheckInRepository;
use hundred_days_domain::shared::{Clock, DomainError, UserId};
use hundred_days_domain::user::{UserRepository, UserStats};

/// Keeps the aggregate statistics on the user document in line with the
/// user's challenges
pub struct UserStatsService {
    challenge_repo: Arc<dyn ChallengeRepository>,
    check_in_repo: Arc<dyn CheckInRepository>,
    user_repo: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl UserStatsService {
    pub fn new(
        challenge_repo: Arc<dyn ChallengeRepository>,
        check_in_repo: Arc<dyn CheckInRepository>,
        user_repo: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            challenge_repo,
            check_in_repo,
            user_repo,
            clock,
        }
    }

    /// Recompute and store the owner's stats. Returns `None` if the owner
    /// has no profile yet.
    pub async fn refresh(&self, owner_id: &UserId) -> Result<Option<UserStats>, DomainError> {
        let mut profile = match self.user_repo.find_by_id(owner_id).await? {
            Some(profile) => profile,
            None => {
                warn!("[stats] no profile for {}, skipping refresh", owner_id);
                return Ok(None);
            }
        };

        let challenges = self.challenge_repo.find_all_by_owner(owner_id).await?;
        let total_check_ins = self.check_in_repo.count_by_owner(owner_id).await?;
        let stats = UserStats::compute(&challenges, total_check_ins, profile.stats());

        if &stats != profile.stats() {
            profile.update_stats(stats.clone(), self.clock.now());
            self.user_repo.save(&profile).await?;
            info!(
                "[stats] {} total_check_ins={} longest_streak={} active={}",
                owner_id, stats.total_check_ins, stats.longest_streak, stats.active_challenges
            );
        }

        Ok(Some(stats))
    }
}
