use hundred_days_domain::shared::{DomainError, ErrorCode, ErrorSeverity};
use serde::{Deserialize, Serialize};

/// Error payload bound to the alert the user sees
///
/// Carries enough to present the failure without inspecting the error:
/// - Error code for programmatic handling
/// - Human-readable message
/// - Severity level for presentation
/// - Whether triggering the action again can succeed
/// - Whether the upsell flow should be offered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFacingError {
    /// Numeric error code (1xxx-7xxx range)
    pub code: u16,

    /// Human-readable error message
    pub message: String,

    pub severity: ErrorSeverity,

    /// Never retried automatically; the user may re-trigger the action
    pub recoverable: bool,

    pub requires_upgrade: bool,
}

impl UserFacingError {
    /// Create an error from an error code and message
    pub fn from_code(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: error_code.code(),
            message: message.into(),
            severity: error_code.severity(),
            recoverable: error_code.is_recoverable(),
            requires_upgrade: error_code == ErrorCode::EntitlementRequired,
        }
    }

    /// Create a generic infrastructure error
    pub fn infrastructure(message: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::InfrastructureError, message)
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::ValidationError, message)
    }
}

impl From<DomainError> for UserFacingError {
    fn from(err: DomainError) -> Self {
        Self::from_code(err.code(), err.message())
    }
}

impl From<&DomainError> for UserFacingError {
    fn from(err: &DomainError) -> Self {
        Self::from_code(err.code(), err.message())
    }
}

impl From<anyhow::Error> for UserFacingError {
    fn from(err: anyhow::Error) -> Self {
        Self::infrastructure(err.to_string())
    }
}

impl From<String> for UserFacingError {
    fn from(message: String) -> Self {
        Self::infrastructure(message)
    }
}

impl std::fmt::Display for UserFacingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for UserFacingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_domain_error() {
        let err: UserFacingError =
            DomainError::UsernameTaken("'runner' is already taken".to_string()).into();

        assert_eq!(err.code, 3002);
        assert_eq!(err.message, "'runner' is already taken");
        assert_eq!(err.severity, ErrorSeverity::Info);
        assert!(!err.recoverable);
        assert!(!err.requires_upgrade);
    }

    #[test]
    fn test_entitlement_offers_upgrade() {
        let err: UserFacingError =
            DomainError::EntitlementRequired("Upgrade to Pro to use photo check-ins".to_string())
                .into();

        assert_eq!(err.code, 7001);
        assert!(err.requires_upgrade);
    }

    #[test]
    fn test_offline_is_recoverable() {
        let err = UserFacingError::from(&DomainError::Offline("no network".to_string()));
        assert!(err.recoverable);
        assert_eq!(err.severity, ErrorSeverity::Warning);
        assert_eq!(err.to_string(), "[5003] no network");
    }

    #[test]
    fn test_helpers() {
        assert_eq!(UserFacingError::validation("bad").code, 6001);

        let infra: UserFacingError = "disk full".to_string().into();
        assert_eq!(infra.code, 5001);
        assert_eq!(infra.severity, ErrorSeverity::Error);
    }
}
