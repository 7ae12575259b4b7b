use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::challenge_store::ChallengeBoard;
use hundred_days_domain::notification::{
    AuthorizationStatus, Reminder, ReminderKind, ReminderScheduler, ReminderTime,
};
use hundred_days_domain::shared::{ChallengeId, Clock, DomainError};

/// Plans the daily nudge and the evening streak-risk warning.
///
/// Nothing is scheduled unless the notification center reports
/// `Authorized`.
pub struct ReminderService {
    scheduler: Arc<dyn ReminderScheduler>,
    clock: Arc<dyn Clock>,
    /// Offset of the user's local time, used to place reminder times
    offset: FixedOffset,
    daily_time: ReminderTime,
    streak_risk_time: ReminderTime,
    streak_risk_target: Mutex<Option<ChallengeId>>,
}

impl ReminderService {
    pub fn new(
        scheduler: Arc<dyn ReminderScheduler>,
        clock: Arc<dyn Clock>,
        offset: FixedOffset,
        daily_time: ReminderTime,
        streak_risk_time: ReminderTime,
    ) -> Self {
        Self {
            scheduler,
            clock,
            offset,
            daily_time,
            streak_risk_time,
            streak_risk_target: Mutex::new(None),
        }
    }

    pub async fn authorization(&self) -> Result<AuthorizationStatus, DomainError> {
        self.scheduler.authorization_status().await
    }

    async fn can_schedule(&self) -> Result<bool, DomainError> {
        let status = self.authorization().await?;
        if !status.can_schedule() {
            debug!("[reminder] notifications not authorized ({:?})", status);
        }
        Ok(status.can_schedule())
    }

    fn fire_at(&self, date: NaiveDate, time: ReminderTime) -> Result<DateTime<Utc>, DomainError> {
        self.offset
            .from_local_datetime(&date.and_time(time.as_naive_time()))
            .single()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "No local time {} on {}",
                    time.as_naive_time(),
                    date
                ))
            })
    }

    /// Next occurrence of the daily reminder: today if still ahead, else tomorrow
    pub fn next_daily_fire(&self) -> Result<DateTime<Utc>, DomainError> {
        let today = self.clock.today();
        let fire_at = self.fire_at(today, self.daily_time)?;
        if fire_at > self.clock.now() {
            return Ok(fire_at);
        }

        let tomorrow = today
            .succ_opt()
            .ok_or_else(|| DomainError::Validation("Date out of range".to_string()))?;
        self.fire_at(tomorrow, self.daily_time)
    }

    /// Returns false when notifications are not authorized
    pub async fn schedule_daily(&self) -> Result<bool, DomainError> {
        if !self.can_schedule().await? {
            return Ok(false);
        }

        let fire_at = self.next_daily_fire()?;
        self.scheduler.schedule(Reminder::daily(fire_at)).await?;
        info!("[reminder] daily reminder scheduled for {}", fire_at);
        Ok(true)
    }

    /// Point the streak-risk reminder at the board's most urgent challenge,
    /// or cancel it when nothing is at risk. Returns true if a reminder is
    /// now pending.
    pub async fn sync_streak_risk(&self, board: &ChallengeBoard) -> Result<bool, DomainError> {
        if !self.can_schedule().await? {
            return Ok(false);
        }

        let mut target = self.streak_risk_target.lock().await;

        let urgent = match &board.overview.most_urgent {
            Some(urgent) => urgent,
            None => {
                if let Some(previous) = target.take() {
                    self.scheduler
                        .cancel(&ReminderKind::StreakRisk {
                            challenge_id: previous.clone(),
                        })
                        .await?;
                    info!("[reminder] streak-risk reminder for {} cancelled", previous);
                }
                return Ok(false);
            }
        };

        let fire_at = self.fire_at(board.today, self.streak_risk_time)?;
        if fire_at <= self.clock.now() {
            debug!(
                "[reminder] streak-risk time {} already passed, not scheduling",
                fire_at
            );
            return Ok(false);
        }

        let challenge_id = ChallengeId::from_string(&urgent.challenge_id);
        self.scheduler
            .schedule(Reminder::streak_risk(
                challenge_id.clone(),
                &urgent.title,
                urgent.streak_count,
                fire_at,
            ))
            .await?;
        info!(
            "[reminder] streak-risk reminder for '{}' ({} days) at {}",
            urgent.title, urgent.streak_count, fire_at
        );
        *target = Some(challenge_id);
        Ok(true)
    }

    pub async fn cancel_all(&self) -> Result<(), DomainError> {
        self.scheduler.cancel_all().await?;
        *self.streak_risk_target.lock().await = None;
        info!("[reminder] all reminders cancelled");
        Ok(())
    }

    /// Re-sync the streak-risk reminder whenever a loaded board is published
    pub fn spawn_board_watcher(
        self: Arc<Self>,
        mut boards: watch::Receiver<ChallengeBoard>,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    changed = boards.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }

                let board = boards.borrow_and_update().clone();
                if !board.is_loaded() {
                    continue;
                }
                if let Err(e) = self.sync_streak_risk(&board).await {
                    warn!("[reminder] failed to sync streak-risk reminder: {}", e);
                }
            }
        })
    }
}
