use async_trait::async_trait;
use chrono::Utc;
use log::info;
use std::sync::Arc;

use super::load_owned;
use crate::application::commands::challenge_commands::*;
use crate::application::commands::command_context::CommandContext;
use crate::application::commands::command_handler::CommandHandler;
use crate::application::services::SubscriptionService;
use hundred_days_domain::challenge::{Challenge, ChallengeRepository};
use hundred_days_domain::events::challenge_events::ChallengeUpdated;
use hundred_days_domain::shared::DomainError;

fn updated_event(
    challenge: &Challenge,
    title: Option<String>,
    archived: Option<bool>,
) -> ChallengeUpdated {
    ChallengeUpdated {
        challenge_id: challenge.id().clone(),
        owner_id: challenge.owner_id().clone(),
        title,
        archived,
        occurred_at: Utc::now(),
    }
}

/// Rename challenge command handler
pub struct RenameChallengeCommandHandler {
    challenge_repo: Arc<dyn ChallengeRepository>,
    ctx: Arc<CommandContext>,
}

impl RenameChallengeCommandHandler {
    pub fn new(challenge_repo: Arc<dyn ChallengeRepository>, ctx: Arc<CommandContext>) -> Self {
        Self {
            challenge_repo,
            ctx,
        }
    }
}

#[async_trait]
impl CommandHandler<RenameChallengeCommand> for RenameChallengeCommandHandler {
    type Result = ();

    async fn handle(&self, cmd: RenameChallengeCommand) -> Result<Self::Result, DomainError> {
        info!("Handling RenameChallengeCommand for: {}", cmd.challenge_id);

        let owner_id = self.ctx.begin_write().await?;
        let mut challenge =
            load_owned(self.challenge_repo.as_ref(), &owner_id, &cmd.challenge_id).await?;

        challenge.rename(&cmd.title, self.ctx.clock.now())?;
        self.challenge_repo.update_metadata(&challenge).await?;

        let event = updated_event(&challenge, Some(challenge.title().to_string()), None);
        self.ctx.publish(event).await?;
        self.ctx.refresh_store().await;

        Ok(())
    }
}

/// Archive challenge command handler
pub struct ArchiveChallengeCommandHandler {
    challenge_repo: Arc<dyn ChallengeRepository>,
    ctx: Arc<CommandContext>,
}

impl ArchiveChallengeCommandHandler {
    pub fn new(challenge_repo: Arc<dyn ChallengeRepository>, ctx: Arc<CommandContext>) -> Self {
        Self {
            challenge_repo,
            ctx,
        }
    }
}

#[async_trait]
impl CommandHandler<ArchiveChallengeCommand> for ArchiveChallengeCommandHandler {
    type Result = ();

    async fn handle(&self, cmd: ArchiveChallengeCommand) -> Result<Self::Result, DomainError> {
        info!("Handling ArchiveChallengeCommand for: {}", cmd.challenge_id);

        let owner_id = self.ctx.begin_write().await?;
        let mut challenge =
            load_owned(self.challenge_repo.as_ref(), &owner_id, &cmd.challenge_id).await?;

        if challenge.is_archived() {
            return Ok(());
        }

        challenge.archive(self.ctx.clock.now());
        self.challenge_repo.update_metadata(&challenge).await?;
        info!("[challenge] archived '{}'", challenge.title());

        self.ctx
            .publish(updated_event(&challenge, None, Some(true)))
            .await?;
        self.ctx.refresh_store().await;

        Ok(())
    }
}

/// Unarchive challenge command handler. Bringing a challenge back counts
/// against the free active-challenge limit.
pub struct UnarchiveChallengeCommandHandler {
    challenge_repo: Arc<dyn ChallengeRepository>,
    subscription: Arc<SubscriptionService>,
    ctx: Arc<CommandContext>,
}

impl UnarchiveChallengeCommandHandler {
    pub fn new(
        challenge_repo: Arc<dyn ChallengeRepository>,
        subscription: Arc<SubscriptionService>,
        ctx: Arc<CommandContext>,
    ) -> Self {
        Self {
            challenge_repo,
            subscription,
            ctx,
        }
    }
}

#[async_trait]
impl CommandHandler<UnarchiveChallengeCommand> for UnarchiveChallengeCommandHandler {
    type Result = ();

    async fn handle(&self, cmd: UnarchiveChallengeCommand) -> Result<Self::Result, DomainError> {
        info!("Handling UnarchiveChallengeCommand for: {}", cmd.challenge_id);

        let owner_id = self.ctx.begin_write().await?;
        let mut challenge =
            load_owned(self.challenge_repo.as_ref(), &owner_id, &cmd.challenge_id).await?;

        if !challenge.is_archived() {
            return Ok(());
        }

        // Completed challenges never count as active
        if !challenge.is_completed() {
            let active = self.challenge_repo.count_active(&owner_id).await?;
            self.subscription.require_challenge_slot(active)?;
        }

        challenge.unarchive(self.ctx.clock.now());
        self.challenge_repo.update_metadata(&challenge).await?;
        info!("[challenge] restored '{}' from archive", challenge.title());

        self.ctx
            .publish(updated_event(&challenge, None, Some(false)))
            .await?;
        self.ctx.refresh_store().await;

        Ok(())
    }
}
