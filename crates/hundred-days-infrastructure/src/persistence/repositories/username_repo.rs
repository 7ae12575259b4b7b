use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;
use tracing::info;

use super::user_repo::{bind_profile, UPSERT_USER};
use crate::persistence::{RepositoryErrorMapper, SqliteRepositoryBase};
use hundred_days_domain::shared::{DomainError, UserId};
use hundred_days_domain::user::{UserProfile, Username, UsernameRepository, UsernameReservation};

#[derive(FromRow)]
struct ReservationRow {
    username: String,
    owner_id: String,
    claimed_at: DateTime<Utc>,
}

pub struct SqliteUsernameRepository {
    base: SqliteRepositoryBase,
}

impl SqliteUsernameRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl UsernameRepository for SqliteUsernameRepository {
    async fn find(&self, username: &Username) -> Result<Option<UsernameReservation>, DomainError> {
        let row: Option<ReservationRow> = self
            .base
            .fetch_optional(
                sqlx::query_as(
                    "SELECT username, owner_id, claimed_at FROM usernames WHERE username = ?1",
                )
                .bind(username.as_str()),
                "Find username reservation",
            )
            .await?;

        row.map(|r| {
            let username = Username::parse(&r.username).map_err(|e| {
                DomainError::DataIntegrity(format!("Bad reserved username: {}", e))
            })?;
            Ok(UsernameReservation::new(
                username,
                UserId::from_string(&r.owner_id),
                r.claimed_at,
            ))
        })
        .transpose()
    }

    async fn claim(
        &self,
        reservation: &UsernameReservation,
        previous: Option<&Username>,
        profile: &UserProfile,
    ) -> Result<(), DomainError> {
        let mut tx = self
            .base
            .pool()
            .begin()
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Begin transaction"))?;

        // 1. Profile first so the reservation's owner exists
        bind_profile(sqlx::query(UPSERT_USER), profile)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Save user profile"))?;

        // 2. Release the old name, only if it is still ours
        if let Some(previous) = previous {
            sqlx::query("DELETE FROM usernames WHERE username = ?1 AND owner_id = ?2")
                .bind(previous.as_str())
                .bind(reservation.owner_id.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Release username"))?;
        }

        // 3. Reserve the new one; the primary key decides concurrent claims
        sqlx::query("INSERT INTO usernames (username, owner_id, claimed_at) VALUES (?1, ?2, ?3)")
            .bind(reservation.username.as_str())
            .bind(reservation.owner_id.as_str())
            .bind(reservation.claimed_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if RepositoryErrorMapper::is_unique_violation(&e) {
                    DomainError::UsernameTaken(format!(
                        "'{}' is already taken",
                        reservation.username
                    ))
                } else {
                    RepositoryErrorMapper::map_sqlx_error(e, "Reserve username")
                }
            })?;

        tx.commit()
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Commit transaction"))?;

        info!(
            "[username] {} claimed by {}",
            reservation.username, reservation.owner_id
        );
        Ok(())
    }
}
