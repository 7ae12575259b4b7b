use async_trait::async_trait;
use chrono::Utc;
use log::info;
use std::sync::Arc;

use super::load_owned;
use crate::application::commands::challenge_commands::*;
use crate::application::commands::command_context::CommandContext;
use crate::application::commands::command_handler::CommandHandler;
use hundred_days_domain::challenge::ChallengeRepository;
use hundred_days_domain::events::challenge_events::ChallengeDeleted;
use hundred_days_domain::shared::DomainError;

/// Delete challenge command handler
pub struct DeleteChallengeCommandHandler {
    challenge_repo: Arc<dyn ChallengeRepository>,
    ctx: Arc<CommandContext>,
}

impl DeleteChallengeCommandHandler {
    pub fn new(challenge_repo: Arc<dyn ChallengeRepository>, ctx: Arc<CommandContext>) -> Self {
        Self {
            challenge_repo,
            ctx,
        }
    }
}

#[async_trait]
impl CommandHandler<DeleteChallengeCommand> for DeleteChallengeCommandHandler {
    type Result = ();

    async fn handle(&self, cmd: DeleteChallengeCommand) -> Result<Self::Result, DomainError> {
        info!("Handling DeleteChallengeCommand for: {}", cmd.challenge_id);

        if !cmd.confirmed {
            return Err(DomainError::Validation(
                "Deleting a challenge is permanent and must be confirmed".to_string(),
            ));
        }

        let owner_id = self.ctx.begin_write().await?;
        let challenge =
            load_owned(self.challenge_repo.as_ref(), &owner_id, &cmd.challenge_id).await?;

        // Check-ins go with it (cascade)
        self.challenge_repo.delete(&owner_id, challenge.id()).await?;
        info!(
            "[challenge] deleted '{}' after {} check-ins",
            challenge.title(),
            challenge.total_check_ins()
        );

        let event = ChallengeDeleted {
            challenge_id: challenge.id().clone(),
            owner_id,
            title: challenge.title().to_string(),
            occurred_at: Utc::now(),
        };
        self.ctx.publish(event).await?;
        self.ctx.refresh_store().await;

        Ok(())
    }
}
