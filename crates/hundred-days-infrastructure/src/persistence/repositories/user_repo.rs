use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

use crate::persistence::SqliteRepositoryBase;
use hundred_days_domain::shared::{DomainError, UserId};
use hundred_days_domain::user::{UserProfile, UserRepository, UserStats, Username};

#[derive(FromRow)]
struct UserRow {
    id: String,
    display_name: String,
    username: Option<String>,
    username_changed_at: Option<DateTime<Utc>>,
    total_check_ins: i64,
    longest_streak: i64,
    current_best_streak: i64,
    active_challenges: i64,
    completed_challenges: i64,
    created_at: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

impl UserRow {
    fn into_profile(self) -> Result<UserProfile, DomainError> {
        let username = self
            .username
            .as_deref()
            .map(Username::parse)
            .transpose()
            .map_err(|e| {
                DomainError::DataIntegrity(format!("User {} has a bad username: {}", self.id, e))
            })?;

        let stats = UserStats {
            total_check_ins: self.total_check_ins.max(0) as u32,
            longest_streak: self.longest_streak.max(0) as u32,
            current_best_streak: self.current_best_streak.max(0) as u32,
            active_challenges: self.active_challenges.max(0) as u32,
            completed_challenges: self.completed_challenges.max(0) as u32,
        };

        Ok(UserProfile::restore(
            UserId::from_string(&self.id),
            self.display_name,
            username,
            self.username_changed_at,
            stats,
            self.created_at,
            self.last_modified,
        ))
    }
}

pub(crate) const UPSERT_USER: &str = r#"
    INSERT INTO users (id, display_name, username, username_changed_at, total_check_ins,
                       longest_streak, current_best_streak, active_challenges,
                       completed_challenges, created_at, last_modified)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    ON CONFLICT(id) DO UPDATE SET
        display_name = ?2,
        username = ?3,
        username_changed_at = ?4,
        total_check_ins = ?5,
        longest_streak = ?6,
        current_best_streak = ?7,
        active_challenges = ?8,
        completed_challenges = ?9,
        last_modified = ?11
"#;

/// Bind a profile onto `UPSERT_USER`
pub(crate) fn bind_profile<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    profile: &'q UserProfile,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    let stats = profile.stats();
    query
        .bind(profile.id().as_str())
        .bind(profile.display_name())
        .bind(profile.username().map(|u| u.as_str()))
        .bind(profile.username_changed_at())
        .bind(stats.total_check_ins as i64)
        .bind(stats.longest_streak as i64)
        .bind(stats.current_best_streak as i64)
        .bind(stats.active_challenges as i64)
        .bind(stats.completed_challenges as i64)
        .bind(profile.created_at())
        .bind(profile.last_modified())
}

pub struct SqliteUserRepository {
    base: SqliteRepositoryBase,
}

impl SqliteUserRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn save(&self, profile: &UserProfile) -> Result<(), DomainError> {
        self.base
            .execute(
                bind_profile(sqlx::query(UPSERT_USER), profile),
                "Save user profile",
            )
            .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        let query = r#"
            SELECT id, display_name, username, username_changed_at, total_check_ins,
                   longest_streak, current_best_streak, active_challenges,
                   completed_challenges, created_at, last_modified
            FROM users WHERE id = ?1
        "#;

        let row: Option<UserRow> = self
            .base
            .fetch_optional(sqlx::query_as(query).bind(id.as_str()), "Find user by ID")
            .await?;

        row.map(UserRow::into_profile).transpose()
    }
}
