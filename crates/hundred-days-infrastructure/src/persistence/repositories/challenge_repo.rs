use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;
use tracing::info;

use crate::persistence::SqliteRepositoryBase;
use hundred_days_domain::challenge::{Challenge, ChallengeRepository, ChallengeSnapshot};
use hundred_days_domain::shared::{ChallengeId, DomainError, UserId};

#[derive(FromRow)]
pub(crate) struct ChallengeRow {
    id: String,
    owner_id: String,
    title: String,
    is_timed: bool,
    streak_count: i64,
    total_check_ins: i64,
    is_archived: bool,
    is_completed: bool,
    last_check_in_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

impl ChallengeRow {
    pub(crate) fn into_challenge(self) -> Challenge {
        Challenge::restore(ChallengeSnapshot {
            id: ChallengeId::from_string(&self.id),
            owner_id: UserId::from_string(&self.owner_id),
            title: self.title,
            is_timed: self.is_timed,
            streak_count: self.streak_count.max(0) as u32,
            total_check_ins: self.total_check_ins.max(0) as u32,
            is_archived: self.is_archived,
            is_completed: self.is_completed,
            last_check_in_date: self.last_check_in_date,
            created_at: self.created_at,
            last_modified: self.last_modified,
        })
    }
}

const UPSERT_CHALLENGE: &str = r#"
    INSERT INTO challenges (id, owner_id, title, is_timed, streak_count, total_check_ins,
                            is_archived, is_completed, last_check_in_date, created_at,
                            last_modified)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    ON CONFLICT(id) DO UPDATE SET
        title = ?3,
        is_timed = ?4,
        streak_count = ?5,
        total_check_ins = ?6,
        is_archived = ?7,
        is_completed = ?8,
        last_check_in_date = ?9,
        last_modified = ?11
    WHERE challenges.owner_id = ?2
"#;

// Counters are owned by check-in writes and never touched here
const UPDATE_METADATA: &str = r#"
    UPDATE challenges
    SET title = ?3, is_archived = ?4, last_modified = ?5
    WHERE id = ?1 AND owner_id = ?2
"#;

const SELECT_COLUMNS: &str = r#"
    SELECT id, owner_id, title, is_timed, streak_count, total_check_ins,
           is_archived, is_completed, last_check_in_date, created_at, last_modified
    FROM challenges
"#;

pub struct SqliteChallengeRepository {
    base: SqliteRepositoryBase,
}

impl SqliteChallengeRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl ChallengeRepository for SqliteChallengeRepository {
    async fn save(&self, challenge: &Challenge) -> Result<(), DomainError> {
        self.base
            .execute(
                sqlx::query(UPSERT_CHALLENGE)
                    .bind(challenge.id().as_str())
                    .bind(challenge.owner_id().as_str())
                    .bind(challenge.title())
                    .bind(challenge.is_timed())
                    .bind(challenge.streak_count() as i64)
                    .bind(challenge.total_check_ins() as i64)
                    .bind(challenge.is_archived())
                    .bind(challenge.is_completed())
                    .bind(challenge.last_check_in_date())
                    .bind(challenge.created_at())
                    .bind(challenge.last_modified()),
                "Save challenge",
            )
            .await?;

        info!("Challenge saved: {}", challenge.id());
        Ok(())
    }

    async fn update_metadata(&self, challenge: &Challenge) -> Result<(), DomainError> {
        let result = self
            .base
            .execute(
                sqlx::query(UPDATE_METADATA)
                    .bind(challenge.id().as_str())
                    .bind(challenge.owner_id().as_str())
                    .bind(challenge.title())
                    .bind(challenge.is_archived())
                    .bind(challenge.last_modified()),
                "Update challenge metadata",
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ChallengeNotFound(challenge.id().to_string()));
        }

        info!("Challenge metadata updated: {}", challenge.id());
        Ok(())
    }

    async fn find_by_id(
        &self,
        owner_id: &UserId,
        id: &ChallengeId,
    ) -> Result<Option<Challenge>, DomainError> {
        let query = format!("{} WHERE id = ?1 AND owner_id = ?2", SELECT_COLUMNS);

        let row: Option<ChallengeRow> = self
            .base
            .fetch_optional(
                sqlx::query_as(&query)
                    .bind(id.as_str())
                    .bind(owner_id.as_str()),
                "Find challenge by ID",
            )
            .await?;

        Ok(row.map(ChallengeRow::into_challenge))
    }

    async fn find_all_by_owner(&self, owner_id: &UserId) -> Result<Vec<Challenge>, DomainError> {
        let query = format!(
            "{} WHERE owner_id = ?1 ORDER BY created_at ASC, id ASC",
            SELECT_COLUMNS
        );

        let rows: Vec<ChallengeRow> = self
            .base
            .fetch_all(
                sqlx::query_as(&query).bind(owner_id.as_str()),
                "Find challenges by owner",
            )
            .await?;

        Ok(rows.into_iter().map(ChallengeRow::into_challenge).collect())
    }

    async fn count_active(&self, owner_id: &UserId) -> Result<u32, DomainError> {
        let query = r#"
            SELECT COUNT(*) FROM challenges
            WHERE owner_id = ?1 AND is_archived = 0 AND is_completed = 0
        "#;

        let row: Option<(i64,)> = self
            .base
            .fetch_optional(
                sqlx::query_as(query).bind(owner_id.as_str()),
                "Count active challenges",
            )
            .await?;

        Ok(row.map(|(count,)| count.max(0) as u32).unwrap_or(0))
    }

    async fn delete(&self, owner_id: &UserId, id: &ChallengeId) -> Result<(), DomainError> {
        let result = self
            .base
            .execute(
                sqlx::query("DELETE FROM challenges WHERE id = ?1 AND owner_id = ?2")
                    .bind(id.as_str())
                    .bind(owner_id.as_str()),
                "Delete challenge",
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ChallengeNotFound(id.to_string()));
        }

        info!("Challenge deleted: {}", id);
        Ok(())
    }
}
