use sqlx::sqlite::{SqliteArguments, SqliteQueryResult, SqliteRow};
use sqlx::{query::Query, query::QueryAs, FromRow, Sqlite, SqlitePool};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use super::RepositoryErrorMapper;
use hundred_days_domain::shared::DomainError;

const SLOW_QUERY_MS: u128 = 100;

/// Shared plumbing for SQLite repositories: runs a query against the pool,
/// maps the driver error and reports slow calls.
pub struct SqliteRepositoryBase {
    pool: Arc<SqlitePool>,
}

impl SqliteRepositoryBase {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn execute<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
        operation: &str,
    ) -> Result<SqliteQueryResult, DomainError> {
        let start = Instant::now();
        let result = query
            .execute(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, operation))?;
        Self::report(operation, start);
        Ok(result)
    }

    pub async fn fetch_optional<'q, T>(
        &self,
        query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
        operation: &str,
    ) -> Result<Option<T>, DomainError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let start = Instant::now();
        let row = query
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, operation))?;
        Self::report(operation, start);
        Ok(row)
    }

    pub async fn fetch_all<'q, T>(
        &self,
        query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
        operation: &str,
    ) -> Result<Vec<T>, DomainError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let start = Instant::now();
        let rows = query
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, operation))?;
        Self::report(operation, start);
        Ok(rows)
    }

    fn report(operation: &str, start: Instant) {
        let elapsed = start.elapsed();
        if elapsed.as_millis() > SLOW_QUERY_MS {
            warn!(
                "🐌 SLOW QUERY: {} took {:.2}ms",
                operation,
                elapsed.as_secs_f64() * 1000.0
            );
        } else {
            debug!("📊 {}: {:.2}ms", operation, elapsed.as_secs_f64() * 1000.0);
        }
    }
}
