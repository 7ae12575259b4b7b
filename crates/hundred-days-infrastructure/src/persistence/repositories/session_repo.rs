use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

use crate::persistence::SqliteRepositoryBase;
use crate::security::EncryptionService;
use hundred_days_domain::session::{AuthSession, IdentityProviderKind, SessionRepository};
use hundred_days_domain::shared::{DomainError, UserId};

#[derive(FromRow)]
struct SessionRow {
    user_id: String,
    provider: String,
    credential: String,
    display_name: Option<String>,
    expires_at: DateTime<Utc>,
    signed_in_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self, encryption: &EncryptionService) -> Result<AuthSession, DomainError> {
        // No plaintext fallback: a credential that does not decrypt is corrupt
        let credential = encryption.decrypt(&self.credential).map_err(|e| {
            DomainError::DataIntegrity(format!(
                "Failed to decrypt session credential for user {}: {}. Data may be corrupted \
                 or using wrong encryption key.",
                self.user_id, e
            ))
        })?;

        AuthSession::new(
            UserId::from_string(&self.user_id),
            IdentityProviderKind::parse(&self.provider)?,
            credential,
            self.display_name,
            self.expires_at,
            self.signed_in_at,
        )
    }
}

/// Stores the single signed-in session with its backend credential
/// encrypted at rest.
pub struct SqliteSessionRepository {
    base: SqliteRepositoryBase,
    encryption: Arc<EncryptionService>,
}

impl SqliteSessionRepository {
    pub fn new(pool: Arc<SqlitePool>, encryption: Arc<EncryptionService>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
            encryption,
        }
    }
}

#[async_trait]
impl SessionRepository for SqliteSessionRepository {
    async fn save(&self, session: &AuthSession) -> Result<(), DomainError> {
        let encrypted = self
            .encryption
            .encrypt(session.credential())
            .map_err(|e| DomainError::Encryption(format!("Failed to encrypt credential: {}", e)))?;

        let query = r#"
            INSERT INTO auth_sessions (slot, user_id, provider, credential, display_name,
                                       expires_at, signed_in_at)
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(slot) DO UPDATE SET
                user_id = ?1,
                provider = ?2,
                credential = ?3,
                display_name = ?4,
                expires_at = ?5,
                signed_in_at = ?6
        "#;

        self.base
            .execute(
                sqlx::query(query)
                    .bind(session.user_id().as_str())
                    .bind(session.provider().as_str())
                    .bind(encrypted)
                    .bind(session.display_name())
                    .bind(session.expires_at())
                    .bind(session.signed_in_at()),
                "Save session",
            )
            .await?;

        Ok(())
    }

    async fn current(&self) -> Result<Option<AuthSession>, DomainError> {
        let query = r#"
            SELECT user_id, provider, credential, display_name, expires_at, signed_in_at
            FROM auth_sessions WHERE slot = 1
        "#;

        let row: Option<SessionRow> = self
            .base
            .fetch_optional(sqlx::query_as(query), "Find current session")
            .await?;

        row.map(|r| r.into_session(&self.encryption)).transpose()
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.base
            .execute(sqlx::query("DELETE FROM auth_sessions"), "Clear session")
            .await?;
        Ok(())
    }
}
