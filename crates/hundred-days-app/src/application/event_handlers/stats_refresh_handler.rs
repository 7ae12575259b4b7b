use async_trait::async_trait;
use log::{error, info};
use std::sync::Arc;

use crate::application::services::UserStatsService;
use hundred_days_domain::events::challenge_events::*;
use hundred_days_domain::events::EventHandler;
use hundred_days_domain::shared::{DomainError, UserId};

/// Recomputes the user's aggregate stats whenever a challenge or check-in
/// changes. Keeps command handlers unaware of the stats document.
#[derive(Clone)]
pub struct StatsRefreshEventHandler {
    stats: Arc<UserStatsService>,
}

impl StatsRefreshEventHandler {
    pub fn new(stats: Arc<UserStatsService>) -> Self {
        Self { stats }
    }

    async fn refresh(&self, owner_id: &UserId) -> Result<(), DomainError> {
        self.stats.refresh(owner_id).await.map_err(|e| {
            error!("[stats] refresh for {} failed: {}", owner_id, e);
            e
        })?;
        Ok(())
    }
}

#[async_trait]
impl EventHandler<CheckInRecorded> for StatsRefreshEventHandler {
    async fn handle(&self, event: &CheckInRecorded) -> Result<(), DomainError> {
        info!(
            "Handling CheckInRecorded event for challenge: {} (day {})",
            event.challenge_id, event.day_number
        );
        self.refresh(&event.owner_id).await
    }
}

#[async_trait]
impl EventHandler<ChallengeCreated> for StatsRefreshEventHandler {
    async fn handle(&self, event: &ChallengeCreated) -> Result<(), DomainError> {
        info!("Handling ChallengeCreated event for challenge: {}", event.challenge_id);
        self.refresh(&event.owner_id).await
    }
}

#[async_trait]
impl EventHandler<ChallengeUpdated> for StatsRefreshEventHandler {
    async fn handle(&self, event: &ChallengeUpdated) -> Result<(), DomainError> {
        // Renames do not move any number
        if event.archived.is_none() {
            return Ok(());
        }
        info!("Handling ChallengeUpdated event for challenge: {}", event.challenge_id);
        self.refresh(&event.owner_id).await
    }
}

#[async_trait]
impl EventHandler<ChallengeDeleted> for StatsRefreshEventHandler {
    async fn handle(&self, event: &ChallengeDeleted) -> Result<(), DomainError> {
        info!("Handling ChallengeDeleted event for challenge: {}", event.challenge_id);
        self.refresh(&event.owner_id).await
    }
}
