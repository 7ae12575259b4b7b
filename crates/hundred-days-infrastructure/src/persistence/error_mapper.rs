use hundred_days_domain::shared::DomainError;

/// Translates driver and codec failures into domain errors, keeping the
/// operation name in the message so logs point at the failing call.
pub struct RepositoryErrorMapper;

impl RepositoryErrorMapper {
    pub fn map_sqlx_error(error: sqlx::Error, operation: &str) -> DomainError {
        match &error {
            sqlx::Error::RowNotFound => {
                DomainError::NotFound(format!("{}: row not found", operation))
            }
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DomainError::DataIntegrity(format!(
                    "{}: unique constraint violated ({})",
                    operation,
                    db_err.message()
                ))
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DomainError::DataIntegrity(format!(
                    "{}: foreign key constraint violated ({})",
                    operation,
                    db_err.message()
                ))
            }
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
                DomainError::DataIntegrity(format!(
                    "{}: check constraint violated ({})",
                    operation,
                    db_err.message()
                ))
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                DomainError::Infrastructure(format!("{}: database unavailable", operation))
            }
            _ => DomainError::Repository(format!("{}: {}", operation, error)),
        }
    }

    pub fn map_json_error(error: serde_json::Error, operation: &str) -> DomainError {
        DomainError::Serialization(format!("{}: {}", operation, error))
    }

    /// Timeouts and connection failures are reported as network errors so the
    /// caller can surface "check your connection"; everything else is an
    /// external service failure.
    pub fn map_reqwest_error(error: reqwest::Error, operation: &str) -> DomainError {
        if error.is_timeout() || error.is_connect() {
            DomainError::Network(format!("{}: {}", operation, error))
        } else if error.is_decode() {
            DomainError::Serialization(format!("{}: {}", operation, error))
        } else {
            DomainError::Infrastructure(format!("{}: {}", operation, error))
        }
    }

    /// True when the mapped error came from a unique constraint
    pub fn is_unique_violation(error: &sqlx::Error) -> bool {
        matches!(error, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
    }
}
