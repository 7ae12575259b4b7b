use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use url::Url;

use crate::persistence::{RepositoryErrorMapper, SqliteRepositoryBase};
use hundred_days_domain::challenge::Challenge;
use hundred_days_domain::check_in::{
    CheckInDetails, CheckInRecord, CheckInRepository, CheckInWrite, DayNumber,
};
use hundred_days_domain::shared::{ChallengeId, CheckInId, DomainError, UserId};

#[derive(FromRow)]
struct CheckInRow {
    id: String,
    challenge_id: String,
    day_number: i64,
    date: NaiveDate,
    note: Option<String>,
    quote_id: Option<String>,
    photo_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl CheckInRow {
    fn into_record(self) -> Result<CheckInRecord, DomainError> {
        let day_number = DayNumber::new(self.day_number.max(0) as u32).map_err(|e| {
            DomainError::DataIntegrity(format!("Check-in {} has a bad day number: {}", self.id, e))
        })?;

        // Stored URLs were validated on write; an unparsable one is dropped, not fatal
        let photo_url = self.photo_url.as_deref().and_then(|raw| match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("Ignoring unparsable photo URL on check-in {}: {}", self.id, e);
                None
            }
        });

        Ok(CheckInRecord::restore(
            CheckInId::from_string(&self.id),
            ChallengeId::from_string(&self.challenge_id),
            day_number,
            self.date,
            CheckInDetails {
                note: self.note,
                quote_id: self.quote_id,
                photo_url,
            },
            self.created_at,
        ))
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, challenge_id, day_number, date, note, quote_id, photo_url, created_at
    FROM check_ins
"#;

const INSERT_CHECK_IN: &str = r#"
    INSERT INTO check_ins (id, challenge_id, day_number, date, note, quote_id, photo_url,
                           created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

const ADVANCE_COUNTERS: &str = r#"
    UPDATE challenges
    SET streak_count = ?3, total_check_ins = ?4, is_completed = ?5,
        last_check_in_date = ?6, last_modified = ?7
    WHERE id = ?1 AND owner_id = ?2 AND total_check_ins = ?8
"#;

pub struct SqliteCheckInRepository {
    base: SqliteRepositoryBase,
}

impl SqliteCheckInRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl CheckInRepository for SqliteCheckInRepository {
    async fn record(
        &self,
        challenge: &Challenge,
        record: &CheckInRecord,
    ) -> Result<CheckInWrite, DomainError> {
        let start = Instant::now();

        let mut tx = self
            .base
            .pool()
            .begin()
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Begin transaction"))?;

        // 1. Insert the record; both (challenge_id, date) and (challenge_id, day_number) are unique
        let inserted = sqlx::query(INSERT_CHECK_IN)
            .bind(record.id().as_str())
            .bind(record.challenge_id().as_str())
            .bind(record.day_number().value() as i64)
            .bind(record.date())
            .bind(record.note())
            .bind(record.quote_id())
            .bind(record.photo_url().map(|u| u.as_str().to_string()))
            .bind(record.created_at())
            .execute(&mut *tx)
            .await;

        if let Err(e) = inserted {
            if !RepositoryErrorMapper::is_unique_violation(&e) {
                return Err(RepositoryErrorMapper::map_sqlx_error(e, "Insert check-in"));
            }

            let same_day: Option<(String,)> =
                sqlx::query_as("SELECT id FROM check_ins WHERE challenge_id = ?1 AND date = ?2")
                    .bind(record.challenge_id().as_str())
                    .bind(record.date())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(|e| {
                        RepositoryErrorMapper::map_sqlx_error(e, "Find check-in by date")
                    })?;

            // Dropping `tx` rolls back either way
            if same_day.is_some() {
                info!(
                    "Check-in for challenge {} on {} already stored, skipping",
                    record.challenge_id(),
                    record.date()
                );
                return Ok(CheckInWrite::AlreadyRecorded);
            }
            return Err(DomainError::Conflict(format!(
                "Challenge {} already has day {} recorded",
                record.challenge_id(),
                record.day_number().value()
            )));
        }

        // 2. Advance the counters, but only from the total this check-in was computed on
        let previous_total = challenge.total_check_ins().saturating_sub(1);
        let updated = sqlx::query(ADVANCE_COUNTERS)
            .bind(challenge.id().as_str())
            .bind(challenge.owner_id().as_str())
            .bind(challenge.streak_count() as i64)
            .bind(challenge.total_check_ins() as i64)
            .bind(challenge.is_completed())
            .bind(challenge.last_check_in_date())
            .bind(challenge.last_modified())
            .bind(previous_total as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Update challenge counters"))?;

        if updated.rows_affected() == 0 {
            let stored: Option<(i64,)> = sqlx::query_as(
                "SELECT total_check_ins FROM challenges WHERE id = ?1 AND owner_id = ?2",
            )
            .bind(challenge.id().as_str())
            .bind(challenge.owner_id().as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Find challenge"))?;

            return Err(match stored {
                None => DomainError::ChallengeNotFound(challenge.id().to_string()),
                Some((total,)) => {
                    warn!(
                        "Stale check-in for challenge {}: stored total {}, expected {}",
                        challenge.id(),
                        total,
                        previous_total
                    );
                    DomainError::Conflict(format!(
                        "Challenge {} changed while checking in",
                        challenge.id()
                    ))
                }
            });
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Commit transaction"))?;

        info!(
            "📊 Check-in recorded: challenge={} day={} in {:.2}ms",
            challenge.id(),
            record.day_number().value(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(CheckInWrite::Recorded)
    }

    async fn find_by_challenge(
        &self,
        challenge_id: &ChallengeId,
    ) -> Result<Vec<CheckInRecord>, DomainError> {
        let query = format!(
            "{} WHERE challenge_id = ?1 ORDER BY day_number ASC",
            SELECT_COLUMNS
        );

        let rows: Vec<CheckInRow> = self
            .base
            .fetch_all(
                sqlx::query_as(&query).bind(challenge_id.as_str()),
                "Find check-ins by challenge",
            )
            .await?;

        rows.into_iter().map(CheckInRow::into_record).collect()
    }

    async fn find_by_challenge_on(
        &self,
        challenge_id: &ChallengeId,
        date: NaiveDate,
    ) -> Result<Option<CheckInRecord>, DomainError> {
        let query = format!("{} WHERE challenge_id = ?1 AND date = ?2", SELECT_COLUMNS);

        let row: Option<CheckInRow> = self
            .base
            .fetch_optional(
                sqlx::query_as(&query)
                    .bind(challenge_id.as_str())
                    .bind(date),
                "Find check-in by date",
            )
            .await?;

        row.map(CheckInRow::into_record).transpose()
    }

    async fn find_in_range(
        &self,
        challenge_id: &ChallengeId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CheckInRecord>, DomainError> {
        let query = format!(
            "{} WHERE challenge_id = ?1 AND date >= ?2 AND date <= ?3 ORDER BY date ASC",
            SELECT_COLUMNS
        );

        let rows: Vec<CheckInRow> = self
            .base
            .fetch_all(
                sqlx::query_as(&query)
                    .bind(challenge_id.as_str())
                    .bind(start)
                    .bind(end),
                "Find check-ins in range",
            )
            .await?;

        rows.into_iter().map(CheckInRow::into_record).collect()
    }

    async fn count_by_owner(&self, owner_id: &UserId) -> Result<u32, DomainError> {
        let query = r#"
            SELECT COUNT(*) FROM check_ins ci
            JOIN challenges c ON c.id = ci.challenge_id
            WHERE c.owner_id = ?1
        "#;

        let row: Option<(i64,)> = self
            .base
            .fetch_optional(
                sqlx::query_as(query).bind(owner_id.as_str()),
                "Count check-ins by owner",
            )
            .await?;

        Ok(row.map(|(count,)| count.max(0) as u32).unwrap_or(0))
    }
}
