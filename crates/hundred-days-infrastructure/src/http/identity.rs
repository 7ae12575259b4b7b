use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{build_client, endpoint};
use crate::persistence::RepositoryErrorMapper;
use hundred_days_domain::session::{AuthSession, IdentityProvider, IdentityProviderKind};
use hundred_days_domain::shared::{DomainError, UserId};

#[derive(Serialize)]
struct ExchangeRequest<'a> {
    provider: &'a str,
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    user_id: String,
    credential: String,
    #[serde(default)]
    display_name: Option<String>,
    expires_at: DateTime<Utc>,
}

impl ExchangeResponse {
    fn into_session(
        self,
        provider: IdentityProviderKind,
        now: DateTime<Utc>,
    ) -> Result<AuthSession, DomainError> {
        if self.user_id.trim().is_empty() {
            return Err(DomainError::Authentication(
                "Backend returned an empty user id".to_string(),
            ));
        }
        AuthSession::new(
            UserId::from_string(&self.user_id),
            provider,
            self.credential,
            self.display_name,
            self.expires_at,
            now,
        )
    }
}

/// Exchanges Apple/Google/anonymous provider tokens with the backend auth endpoint
pub struct HttpIdentityProvider {
    client: Client,
    base_url: String,
}

impl HttpIdentityProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn exchange(
        &self,
        provider: IdentityProviderKind,
        provider_token: &str,
    ) -> Result<AuthSession, DomainError> {
        let url = endpoint(&self.base_url, "v1/auth/exchange");

        let response = self
            .client
            .post(&url)
            .json(&ExchangeRequest {
                provider: provider.as_str(),
                token: provider_token,
            })
            .send()
            .await
            .map_err(|e| RepositoryErrorMapper::map_reqwest_error(e, "Exchange provider token"))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!("[auth] {} token rejected by backend", provider.as_str());
            return Err(DomainError::Authentication(
                "Sign-in was rejected by the server".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::ExternalService(format!(
                "Auth exchange failed with status {}: {}",
                status, body
            )));
        }

        let body: ExchangeResponse = response
            .json()
            .await
            .map_err(|e| RepositoryErrorMapper::map_reqwest_error(e, "Decode auth response"))?;

        let session = body.into_session(provider, Utc::now())?;
        info!(
            "[auth] Signed in {} via {}",
            session.user_id(),
            provider.as_str()
        );
        Ok(session)
    }
}
