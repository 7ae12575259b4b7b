use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::{DomainError, UserId};

/// Federated sign-in provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityProviderKind {
    Apple,
    Google,
    Anonymous,
}

impl IdentityProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityProviderKind::Apple => "apple",
            IdentityProviderKind::Google => "google",
            IdentityProviderKind::Anonymous => "anonymous",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "apple" => Ok(IdentityProviderKind::Apple),
            "google" => Ok(IdentityProviderKind::Google),
            "anonymous" => Ok(IdentityProviderKind::Anonymous),
            other => Err(DomainError::InvalidInput(format!(
                "Unknown identity provider: {}",
                other
            ))),
        }
    }
}

/// Backend session obtained by exchanging a provider token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    user_id: UserId,
    provider: IdentityProviderKind,
    credential: String,
    display_name: Option<String>,
    expires_at: DateTime<Utc>,
    signed_in_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn new(
        user_id: UserId,
        provider: IdentityProviderKind,
        credential: String,
        display_name: Option<String>,
        expires_at: DateTime<Utc>,
        signed_in_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if credential.trim().is_empty() {
            return Err(DomainError::Authentication(
                "Backend returned an empty credential".to_string(),
            ));
        }
        if expires_at <= signed_in_at {
            return Err(DomainError::Authentication(
                "Session expires before it starts".to_string(),
            ));
        }

        Ok(Self {
            user_id,
            provider,
            credential,
            display_name,
            expires_at,
            signed_in_at,
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn provider(&self) -> IdentityProviderKind {
        self.provider
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn signed_in_at(&self) -> DateTime<Utc> {
        self.signed_in_at
    }

    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Exchanges a provider token for a backend session credential
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn exchange(
        &self,
        provider: IdentityProviderKind,
        provider_token: &str,
    ) -> Result<AuthSession, DomainError>;
}

/// Local storage of the signed-in session (at most one)
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn save(&self, session: &AuthSession) -> Result<(), DomainError>;

    async fn current(&self) -> Result<Option<AuthSession>, DomainError>;

    async fn clear(&self) -> Result<(), DomainError>;
}
