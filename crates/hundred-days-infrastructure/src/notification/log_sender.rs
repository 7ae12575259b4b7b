use async_trait::async_trait;
use tracing::info;

use hundred_days_domain::notification::{NotificationMessage, NotificationSender};
use hundred_days_domain::shared::DomainError;

/// Writes notifications to the log. Used when no push gateway is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotificationSender;

#[async_trait]
impl NotificationSender for LogNotificationSender {
    async fn send(&self, message: &NotificationMessage) -> Result<(), DomainError> {
        info!(
            title = %message.title,
            link = message.link.as_deref().unwrap_or("-"),
            "[reminder] {}",
            message.content
        );
        Ok(())
    }
}
