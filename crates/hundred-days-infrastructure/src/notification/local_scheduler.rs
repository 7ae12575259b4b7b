use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{error, info, warn};

use hundred_days_domain::notification::{
    AuthorizationStatus, NotificationMessage, NotificationSender, Reminder, ReminderKind,
    ReminderScheduler,
};
use hundred_days_domain::shared::DomainError;

struct PendingReminder {
    reminder: Reminder,
    handle: JoinHandle<()>,
}

type PendingMap = Arc<Mutex<HashMap<String, PendingReminder>>>;

/// Local reminders backed by tokio tasks. Each pending reminder is one task
/// sleeping until `fire_at`, keyed by the reminder identifier so scheduling
/// the same kind again replaces the earlier task.
pub struct LocalReminderScheduler {
    sender: Arc<dyn NotificationSender>,
    authorization: RwLock<AuthorizationStatus>,
    pending: PendingMap,
}

impl LocalReminderScheduler {
    pub fn new(sender: Arc<dyn NotificationSender>) -> Self {
        Self {
            sender,
            authorization: RwLock::new(AuthorizationStatus::NotDetermined),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record the user's answer to the permission prompt
    pub async fn set_authorization(&self, status: AuthorizationStatus) {
        *self.authorization.write().await = status;
        info!("🔔 Notification authorization set to {:?}", status);
        if !status.can_schedule() {
            self.abort_all().await;
        }
    }

    async fn abort_all(&self) {
        let mut pending = self.pending.lock().await;
        for (identifier, entry) in pending.drain() {
            info!("  ⏹️  Cancelling reminder: {}", identifier);
            entry.handle.abort();
        }
    }

    fn spawn_delivery(&self, identifier: String, reminder: &Reminder) -> JoinHandle<()> {
        let sender = Arc::clone(&self.sender);
        let pending = Arc::clone(&self.pending);
        let message = NotificationMessage::new(reminder.title.clone(), reminder.body.clone())
            .with_link(deep_link(&reminder.kind));
        let wait = (reminder.fire_at - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO);

        tokio::spawn(async move {
            tokio::time::sleep(wait).await;

            info!("⏰ Delivering reminder: {}", identifier);
            match sender.send(&message).await {
                Ok(()) => info!("✅ Reminder delivered: {}", identifier),
                Err(e) => error!("❌ Reminder delivery failed for {}: {}", identifier, e),
            }

            pending.lock().await.remove(&identifier);
        })
    }
}

fn deep_link(kind: &ReminderKind) -> String {
    match kind {
        ReminderKind::Daily => "hundreddays://today".to_string(),
        ReminderKind::StreakRisk { challenge_id } => {
            format!("hundreddays://challenge/{}", challenge_id)
        }
    }
}

#[async_trait]
impl ReminderScheduler for LocalReminderScheduler {
    async fn authorization_status(&self) -> Result<AuthorizationStatus, DomainError> {
        Ok(*self.authorization.read().await)
    }

    async fn schedule(&self, reminder: Reminder) -> Result<(), DomainError> {
        if !self.authorization.read().await.can_schedule() {
            warn!("Skipping reminder, notifications are not authorized");
            return Err(DomainError::Validation(
                "Notifications are not authorized".to_string(),
            ));
        }

        let identifier = reminder.kind.identifier();
        let handle = self.spawn_delivery(identifier.clone(), &reminder);

        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.insert(
            identifier.clone(),
            PendingReminder {
                reminder: reminder.clone(),
                handle,
            },
        ) {
            previous.handle.abort();
        }

        info!(
            "➕ Reminder scheduled: {} at {}",
            identifier,
            reminder.fire_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        Ok(())
    }

    async fn cancel(&self, kind: &ReminderKind) -> Result<(), DomainError> {
        let identifier = kind.identifier();
        if let Some(entry) = self.pending.lock().await.remove(&identifier) {
            entry.handle.abort();
            info!("⏹️  Reminder cancelled: {}", identifier);
        }
        Ok(())
    }

    async fn cancel_all(&self) -> Result<(), DomainError> {
        self.abort_all().await;
        Ok(())
    }

    async fn pending(&self) -> Result<Vec<Reminder>, DomainError> {
        let pending = self.pending.lock().await;
        let mut reminders: Vec<Reminder> =
            pending.values().map(|entry| entry.reminder.clone()).collect();
        reminders.sort_by_key(|r| r.fire_at);
        Ok(reminders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use hundred_days_domain::shared::ChallengeId;

    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<NotificationMessage>>,
    }

    #[async_trait]
    impl NotificationSender for RecordingSender {
        async fn send(&self, message: &NotificationMessage) -> Result<(), DomainError> {
            self.sent.lock().await.push(message.clone());
            Ok(())
        }
    }

    async fn authorized(sender: Arc<RecordingSender>) -> LocalReminderScheduler {
        let scheduler = LocalReminderScheduler::new(sender);
        scheduler
            .set_authorization(AuthorizationStatus::Authorized)
            .await;
        scheduler
    }

    #[tokio::test]
    async fn test_schedule_requires_authorization() {
        let scheduler = LocalReminderScheduler::new(Arc::new(RecordingSender::default()));
        let reminder = Reminder::daily(Utc::now() + ChronoDuration::hours(1));

        assert!(scheduler.schedule(reminder).await.is_err());
        assert!(scheduler.pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_same_kind_replaces_pending_reminder() {
        let scheduler = authorized(Arc::new(RecordingSender::default())).await;
        let later = Utc::now() + ChronoDuration::hours(2);

        scheduler
            .schedule(Reminder::streak_risk(ChallengeId::new(), "Run", 4, later))
            .await
            .unwrap();
        scheduler
            .schedule(Reminder::streak_risk(ChallengeId::new(), "Read", 9, later))
            .await
            .unwrap();
        scheduler
            .schedule(Reminder::daily(later))
            .await
            .unwrap();

        let pending = scheduler.pending().await.unwrap();
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().any(|r| r.body.contains("Read")));
        assert!(!pending.iter().any(|r| r.body.contains("Run")));
    }

    #[tokio::test]
    async fn test_cancel_removes_only_that_kind() {
        let scheduler = authorized(Arc::new(RecordingSender::default())).await;
        let later = Utc::now() + ChronoDuration::hours(2);
        let challenge_id = ChallengeId::new();

        scheduler.schedule(Reminder::daily(later)).await.unwrap();
        scheduler
            .schedule(Reminder::streak_risk(challenge_id.clone(), "Run", 4, later))
            .await
            .unwrap();

        scheduler
            .cancel(&ReminderKind::StreakRisk { challenge_id })
            .await
            .unwrap();

        let pending = scheduler.pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].kind, ReminderKind::Daily);
    }

    #[tokio::test]
    async fn test_due_reminder_is_delivered() {
        let sender = Arc::new(RecordingSender::default());
        let scheduler = authorized(sender.clone()).await;

        scheduler
            .schedule(Reminder::daily(Utc::now() - ChronoDuration::seconds(1)))
            .await
            .unwrap();

        for _ in 0..50 {
            if !sender.sent.lock().await.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let sent = sender.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].link.as_deref(), Some("hundreddays://today"));
    }

    #[tokio::test]
    async fn test_revoking_permission_cancels_everything() {
        let scheduler = authorized(Arc::new(RecordingSender::default())).await;
        scheduler
            .schedule(Reminder::daily(Utc::now() + ChronoDuration::hours(1)))
            .await
            .unwrap();

        scheduler.set_authorization(AuthorizationStatus::Denied).await;

        assert!(scheduler.pending().await.unwrap().is_empty());
    }
}
