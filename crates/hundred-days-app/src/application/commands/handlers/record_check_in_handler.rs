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
use hundred_days_domain::check_in::{
    CheckInDetails, CheckInDomainService, CheckInRepository, CheckInWrite,
};
use hundred_days_domain::events::challenge_events::{ChallengeCompleted, CheckInRecorded};
use hundred_days_domain::shared::DomainError;
use hundred_days_domain::subscription::Feature;

fn already_checked_in(challenge: &Challenge) -> RecordCheckInResult {
    RecordCheckInResult {
        challenge_id: challenge.id().to_string(),
        day_number: challenge.total_check_ins(),
        streak_count: challenge.streak_count(),
        completed: challenge.is_completed(),
        already_checked_in: true,
    }
}

/// Record today's check-in. A second check-in on the same calendar day
/// returns the current state and writes nothing.
pub struct RecordCheckInCommandHandler {
    challenge_repo: Arc<dyn ChallengeRepository>,
    check_in_repo: Arc<dyn CheckInRepository>,
    subscription: Arc<SubscriptionService>,
    ctx: Arc<CommandContext>,
}

impl RecordCheckInCommandHandler {
    pub fn new(
        challenge_repo: Arc<dyn ChallengeRepository>,
        check_in_repo: Arc<dyn CheckInRepository>,
        subscription: Arc<SubscriptionService>,
        ctx: Arc<CommandContext>,
    ) -> Self {
        Self {
            challenge_repo,
            check_in_repo,
            subscription,
            ctx,
        }
    }
}

#[async_trait]
impl CommandHandler<RecordCheckInCommand> for RecordCheckInCommandHandler {
    type Result = RecordCheckInResult;

    async fn handle(&self, cmd: RecordCheckInCommand) -> Result<Self::Result, DomainError> {
        info!("Handling RecordCheckInCommand for: {}", cmd.challenge_id);

        // 1. Online and signed in
        let owner_id = self.ctx.begin_write().await?;

        // 2. Validate journal data; photos are a Pro feature
        let details = CheckInDetails::new(cmd.note, cmd.quote_id, cmd.photo_url.as_deref())?;
        if details.has_photo() {
            self.subscription.require(Feature::PhotoCheckIns)?;
        }

        // 3. Apply streak rule
        let mut challenge =
            load_owned(self.challenge_repo.as_ref(), &owner_id, &cmd.challenge_id).await?;
        let today = self.ctx.clock.today();
        let now = self.ctx.clock.now();

        let record = match CheckInDomainService::check_in(&mut challenge, details, today, now)? {
            Some(record) => record,
            None => {
                info!(
                    "[check-in] '{}' already checked in on {}, nothing to do",
                    challenge.title(),
                    today
                );
                return Ok(already_checked_in(&challenge));
            }
        };

        // 4. Persist record and challenge together; a concurrent same-day write wins
        let write = self.check_in_repo.record(&challenge, &record).await?;
        if write == CheckInWrite::AlreadyRecorded {
            let current =
                load_owned(self.challenge_repo.as_ref(), &owner_id, &cmd.challenge_id).await?;
            info!(
                "[check-in] '{}' was checked in on {} by a concurrent request",
                current.title(),
                today
            );
            return Ok(already_checked_in(&current));
        }

        info!(
            "[check-in] '{}' day {} streak={}",
            challenge.title(),
            record.day_number().value(),
            challenge.streak_count()
        );

        // 5. Publish domain events
        let event = CheckInRecorded {
            challenge_id: challenge.id().clone(),
            owner_id: owner_id.clone(),
            day_number: record.day_number().value(),
            date: record.date(),
            streak_count: challenge.streak_count(),
            occurred_at: Utc::now(),
        };
        self.ctx.publish(event).await?;

        if challenge.is_completed() {
            info!("[check-in] '{}' completed all 100 days", challenge.title());
            let event = ChallengeCompleted {
                challenge_id: challenge.id().clone(),
                owner_id,
                title: challenge.title().to_string(),
                occurred_at: Utc::now(),
            };
            self.ctx.publish(event).await?;
        }

        // 6. Refresh board
        self.ctx.refresh_store().await;

        Ok(RecordCheckInResult {
            challenge_id: challenge.id().to_string(),
            day_number: record.day_number().value(),
            streak_count: challenge.streak_count(),
            completed: challenge.is_completed(),
            already_checked_in: false,
        })
    }
}
