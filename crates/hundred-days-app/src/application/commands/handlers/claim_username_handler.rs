use async_trait::async_trait;
use chrono::Utc;
use log::info;
use std::sync::Arc;

use crate::application::commands::command_context::CommandContext;
use crate::application::commands::command_handler::CommandHandler;
use crate::application::commands::user_commands::*;
use hundred_days_domain::events::user_events::UsernameClaimed;
use hundred_days_domain::shared::DomainError;
use hundred_days_domain::user::{
    ClaimDecision, UserRepository, Username, UsernamePolicy, UsernameRepository,
    UsernameReservation,
};

/// Claim username command handler
pub struct ClaimUsernameCommandHandler {
    user_repo: Arc<dyn UserRepository>,
    username_repo: Arc<dyn UsernameRepository>,
    ctx: Arc<CommandContext>,
}

impl ClaimUsernameCommandHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        username_repo: Arc<dyn UsernameRepository>,
        ctx: Arc<CommandContext>,
    ) -> Self {
        Self {
            user_repo,
            username_repo,
            ctx,
        }
    }
}

#[async_trait]
impl CommandHandler<ClaimUsernameCommand> for ClaimUsernameCommandHandler {
    type Result = ClaimUsernameResult;

    async fn handle(&self, cmd: ClaimUsernameCommand) -> Result<Self::Result, DomainError> {
        info!("Handling ClaimUsernameCommand: {}", cmd.username);

        // 1. Online and signed in
        let owner_id = self.ctx.begin_write().await?;

        // 2. Normalize; the reservation key is the lowercase form
        let username = Username::parse(&cmd.username)?;

        // 3. Load profile and current reservation
        let mut profile = self
            .user_repo
            .find_by_id(&owner_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(owner_id.to_string()))?;
        let existing = self.username_repo.find(&username).await?;

        // 4. Ownership and cooldown
        let now = self.ctx.clock.now();
        let decision =
            UsernamePolicy::check_claim(&owner_id, &username, existing.as_ref(), &profile, now)?;
        let previous = match decision {
            ClaimDecision::AlreadyOwned => {
                info!("[username] {} already holds '{}'", owner_id, username);
                return Ok(ClaimUsernameResult {
                    username: username.to_string(),
                    changed: false,
                });
            }
            ClaimDecision::Claim { previous } => previous,
        };

        // 5. Reserve, release and update profile atomically
        profile.set_username(username.clone(), now);
        let reservation = UsernameReservation::new(username.clone(), owner_id.clone(), now);
        self.username_repo
            .claim(&reservation, previous.as_ref(), &profile)
            .await?;

        info!(
            "[username] {} claimed '{}' (previous: {:?})",
            owner_id,
            username,
            previous.as_ref().map(Username::as_str)
        );

        // 6. Publish domain event
        let event = UsernameClaimed {
            user_id: owner_id,
            username: username.to_string(),
            previous: previous.map(|p| p.to_string()),
            occurred_at: Utc::now(),
        };
        self.ctx.publish(event).await?;

        Ok(ClaimUsernameResult {
            username: username.to_string(),
            changed: true,
        })
    }
}
