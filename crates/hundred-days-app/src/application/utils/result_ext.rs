use hundred_days_domain::shared::DomainError;

/// Extension trait for Result types to simplify error handling
pub trait ResultExt<T, E> {
    /// Convert error to DomainError::Infrastructure
    /// Usage: `result.to_infra_err()?`
    fn to_infra_err(self) -> Result<T, DomainError>;

    /// Convert error to DomainError::Validation
    fn to_validation_err(self) -> Result<T, DomainError>;
}

impl<T, E: std::fmt::Display> ResultExt<T, E> for Result<T, E> {
    fn to_infra_err(self) -> Result<T, DomainError> {
        self.map_err(|e| DomainError::Infrastructure(e.to_string()))
    }

    fn to_validation_err(self) -> Result<T, DomainError> {
        self.map_err(|e| DomainError::Validation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_infra_err() {
        let result: Result<i32, &str> = Err("disk full");
        match result.to_infra_err() {
            Err(DomainError::Infrastructure(msg)) => assert_eq!(msg, "disk full"),
            other => panic!("Expected Infrastructure error, got {:?}", other),
        }
    }

    #[test]
    fn test_to_validation_err_keeps_ok() {
        let result: Result<i32, String> = Ok(7);
        assert_eq!(result.to_validation_err().unwrap(), 7);
    }
}
