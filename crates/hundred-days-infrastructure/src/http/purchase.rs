use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::info;

use super::{build_client, endpoint};
use crate::persistence::RepositoryErrorMapper;
use hundred_days_domain::shared::DomainError;
use hundred_days_domain::subscription::{Entitlement, PurchaseProvider};

#[derive(Debug, Deserialize)]
struct EntitlementResponse {
    is_pro: bool,
    product_id: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

impl From<EntitlementResponse> for Entitlement {
    fn from(value: EntitlementResponse) -> Self {
        Entitlement {
            is_pro: value.is_pro,
            product_id: value.product_id,
            expires_at: value.expires_at,
        }
    }
}

/// Talks to the store bridge that owns the device's purchase receipts
pub struct HttpPurchaseProvider {
    client: Client,
    base_url: String,
}

impl HttpPurchaseProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.into(),
        })
    }

    async fn read_entitlement(
        response: Response,
        operation: &str,
    ) -> Result<Entitlement, DomainError> {
        let status = response.status();
        if status == StatusCode::PAYMENT_REQUIRED || status == StatusCode::CONFLICT {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::PurchaseFailed(format!(
                "{} was declined: {}",
                operation, body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::ExternalService(format!(
                "{} failed with status {}: {}",
                operation, status, body
            )));
        }

        let body: EntitlementResponse = response
            .json()
            .await
            .map_err(|e| RepositoryErrorMapper::map_reqwest_error(e, operation))?;
        Ok(body.into())
    }
}

#[async_trait]
impl PurchaseProvider for HttpPurchaseProvider {
    async fn purchase(&self, product_id: &str) -> Result<Entitlement, DomainError> {
        let url = endpoint(&self.base_url, &format!("v1/purchases/{}", product_id));
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| RepositoryErrorMapper::map_reqwest_error(e, "Purchase"))?;

        let entitlement = Self::read_entitlement(response, "Purchase").await?;
        info!(
            "[subscription] Purchase finished for {}: pro={}",
            product_id, entitlement.is_pro
        );
        Ok(entitlement)
    }

    async fn restore(&self, product_id: &str) -> Result<Entitlement, DomainError> {
        let url = endpoint(
            &self.base_url,
            &format!("v1/purchases/{}/restore", product_id),
        );
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| RepositoryErrorMapper::map_reqwest_error(e, "Restore purchases"))?;

        Self::read_entitlement(response, "Restore purchases").await
    }

    async fn current_entitlement(&self, product_id: &str) -> Result<Entitlement, DomainError> {
        let url = endpoint(&self.base_url, &format!("v1/entitlements/{}", product_id));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RepositoryErrorMapper::map_reqwest_error(e, "Fetch entitlement"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Entitlement::free(product_id));
        }

        Self::read_entitlement(response, "Fetch entitlement").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entitlement_response_without_expiry() {
        let response: EntitlementResponse =
            serde_json::from_str(r#"{"is_pro":true,"product_id":"hundred_days_pro_monthly"}"#)
                .unwrap();
        let entitlement: Entitlement = response.into();

        assert!(entitlement.is_pro);
        assert!(entitlement.expires_at.is_none());
        assert!(entitlement.is_active(Utc::now()));
    }
}
