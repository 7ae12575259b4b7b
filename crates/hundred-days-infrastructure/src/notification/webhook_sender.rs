use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::persistence::RepositoryErrorMapper;
use hundred_days_domain::notification::{NotificationMessage, NotificationSender};
use hundred_days_domain::shared::DomainError;

/// Delivers notifications by POSTing them to a push gateway
pub struct WebhookNotificationSender {
    client: Client,
    gateway_url: String,
    device_token: Option<String>,
}

impl WebhookNotificationSender {
    pub fn new(gateway_url: impl Into<String>) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| {
                DomainError::Infrastructure(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            gateway_url: gateway_url.into(),
            device_token: None,
        })
    }

    pub fn with_device_token(mut self, token: impl Into<String>) -> Self {
        self.device_token = Some(token.into());
        self
    }

    fn build_payload(&self, message: &NotificationMessage) -> serde_json::Value {
        json!({
            "device_token": self.device_token,
            "notification": {
                "title": message.title,
                "body": message.content,
            },
            "data": {
                "link": message.link,
            },
        })
    }
}

#[async_trait]
impl NotificationSender for WebhookNotificationSender {
    async fn send(&self, message: &NotificationMessage) -> Result<(), DomainError> {
        let payload = self.build_payload(message);

        let response = self
            .client
            .post(&self.gateway_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RepositoryErrorMapper::map_reqwest_error(e, "Send push notification"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::ExternalService(format!(
                "Push gateway failed with status {}: {}",
                status, body
            )));
        }

        debug!("Push notification accepted by gateway: {}", message.title);
        Ok(())
    }
}
