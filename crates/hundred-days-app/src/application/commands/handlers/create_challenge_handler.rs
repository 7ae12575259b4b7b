use async_trait::async_trait;
use chrono::Utc;
use log::info;
use std::sync::Arc;

use crate::application::commands::challenge_commands::*;
use crate::application::commands::command_context::CommandContext;
use crate::application::commands::command_handler::CommandHandler;
use crate::application::services::SubscriptionService;
use hundred_days_domain::challenge::{Challenge, ChallengeRepository};
use hundred_days_domain::events::challenge_events::ChallengeCreated;
use hundred_days_domain::shared::DomainError;

/// Create challenge command handler
pub struct CreateChallengeCommandHandler {
    challenge_repo: Arc<dyn ChallengeRepository>,
    subscription: Arc<SubscriptionService>,
    ctx: Arc<CommandContext>,
}

impl CreateChallengeCommandHandler {
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
impl CommandHandler<CreateChallengeCommand> for CreateChallengeCommandHandler {
    type Result = CreateChallengeResult;

    async fn handle(&self, cmd: CreateChallengeCommand) -> Result<Self::Result, DomainError> {
        info!("Handling CreateChallengeCommand: {}", cmd.title);

        // 1. Online and signed in
        let owner_id = self.ctx.begin_write().await?;

        // 2. Free accounts are capped on active challenges
        let active = self.challenge_repo.count_active(&owner_id).await?;
        self.subscription.require_challenge_slot(active)?;

        // 3. Create and save aggregate
        let challenge = Challenge::new(owner_id, &cmd.title, cmd.is_timed, self.ctx.clock.now())?;
        self.challenge_repo.save(&challenge).await?;

        info!(
            "[challenge] created '{}' ({}) timed={}",
            challenge.title(),
            challenge.id(),
            challenge.is_timed()
        );

        // 4. Publish domain event
        let event = ChallengeCreated {
            challenge_id: challenge.id().clone(),
            owner_id: challenge.owner_id().clone(),
            title: challenge.title().to_string(),
            is_timed: challenge.is_timed(),
            occurred_at: Utc::now(),
        };
        self.ctx.publish(event).await?;

        // 5. Refresh board
        self.ctx.refresh_store().await;

        Ok(CreateChallengeResult {
            challenge_id: challenge.id().to_string(),
        })
    }
}
