use async_trait::async_trait;

use super::value_objects::{AuthorizationStatus, Reminder, ReminderKind};
use crate::shared::DomainError;

/// Push notification service used to plan local reminders
#[async_trait]
pub trait ReminderScheduler: Send + Sync {
    async fn authorization_status(&self) -> Result<AuthorizationStatus, DomainError>;

    /// Schedule a reminder, replacing any pending one with the same identifier
    async fn schedule(&self, reminder: Reminder) -> Result<(), DomainError>;

    async fn cancel(&self, kind: &ReminderKind) -> Result<(), DomainError>;

    async fn cancel_all(&self) -> Result<(), DomainError>;

    async fn pending(&self) -> Result<Vec<Reminder>, DomainError>;
}
