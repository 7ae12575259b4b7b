use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod clock;
pub use clock::{Clock, FixedClock, SystemClock};

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn from_string(s: &str) -> Self {
                Self(s.to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

define_id!(ChallengeId);
define_id!(CheckInId);
define_id!(UserId);

/// Error codes for structured error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication (1xxx)
    NotSignedIn = 1001,
    ExpiredSession = 1002,
    AuthenticationFailed = 1003,

    // Resource Not Found (2xxx)
    ChallengeNotFound = 2001,
    UserNotFound = 2002,
    NotFound = 2003,

    // Business Logic (3xxx)
    CheckInRejected = 3001,
    UsernameTaken = 3002,
    UsernameCooldown = 3003,
    ChallengeArchived = 3004,

    // Data & Persistence (4xxx)
    RepositoryError = 4001,
    DataIntegrityError = 4002,
    SerializationError = 4003,
    EncryptionError = 4004,
    ConcurrentModification = 4005,

    // Infrastructure (5xxx)
    InfrastructureError = 5001,
    NetworkError = 5002,
    Offline = 5003,
    ExternalServiceError = 5004,

    // Validation (6xxx)
    ValidationError = 6001,
    InvalidInput = 6002,

    // Entitlement (7xxx)
    EntitlementRequired = 7001,
    PurchaseFailed = 7002,
}

impl ErrorCode {
    /// Get error code as integer
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get error severity
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ErrorCode::NotSignedIn
            | ErrorCode::ExpiredSession
            | ErrorCode::NetworkError
            | ErrorCode::Offline
            | ErrorCode::PurchaseFailed => ErrorSeverity::Warning,

            ErrorCode::ChallengeNotFound
            | ErrorCode::UserNotFound
            | ErrorCode::NotFound
            | ErrorCode::ValidationError
            | ErrorCode::InvalidInput
            | ErrorCode::CheckInRejected
            | ErrorCode::UsernameTaken
            | ErrorCode::UsernameCooldown
            | ErrorCode::ChallengeArchived
            | ErrorCode::EntitlementRequired => ErrorSeverity::Info,

            ErrorCode::DataIntegrityError
            | ErrorCode::EncryptionError
            | ErrorCode::InfrastructureError => ErrorSeverity::Error,

            _ => ErrorSeverity::Warning,
        }
    }

    /// Whether retrying the same action by hand can succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ErrorCode::NetworkError
                | ErrorCode::Offline
                | ErrorCode::ExternalServiceError
                | ErrorCode::ExpiredSession
                | ErrorCode::PurchaseFailed
                | ErrorCode::ConcurrentModification
        )
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("Challenge not found: {0}")]
    ChallengeNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Check-in rejected: {0}")]
    CheckInRejected(String),

    #[error("Username taken: {0}")]
    UsernameTaken(String),

    #[error("Username change too soon: {0}")]
    UsernameCooldown(String),

    #[error("Feature requires Pro: {0}")]
    EntitlementRequired(String),

    #[error("Purchase failed: {0}")]
    PurchaseFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Offline: {0}")]
    Offline(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("Concurrent modification: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Encryption error: {0}")]
    Encryption(String),
}

impl DomainError {
    /// Get error code
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Authentication(_) => ErrorCode::AuthenticationFailed,
            DomainError::SessionExpired(_) => ErrorCode::ExpiredSession,
            DomainError::ChallengeNotFound(_) => ErrorCode::ChallengeNotFound,
            DomainError::UserNotFound(_) => ErrorCode::UserNotFound,
            DomainError::NotFound(_) => ErrorCode::NotFound,
            DomainError::CheckInRejected(_) => ErrorCode::CheckInRejected,
            DomainError::UsernameTaken(_) => ErrorCode::UsernameTaken,
            DomainError::UsernameCooldown(_) => ErrorCode::UsernameCooldown,
            DomainError::EntitlementRequired(_) => ErrorCode::EntitlementRequired,
            DomainError::PurchaseFailed(_) => ErrorCode::PurchaseFailed,
            DomainError::Network(_) => ErrorCode::NetworkError,
            DomainError::Offline(_) => ErrorCode::Offline,
            DomainError::ExternalService(_) => ErrorCode::ExternalServiceError,
            DomainError::Repository(_) => ErrorCode::RepositoryError,
            DomainError::Infrastructure(_) => ErrorCode::InfrastructureError,
            DomainError::Validation(_) => ErrorCode::ValidationError,
            DomainError::DataIntegrity(_) => ErrorCode::DataIntegrityError,
            DomainError::Conflict(_) => ErrorCode::ConcurrentModification,
            DomainError::InvalidInput(_) => ErrorCode::InvalidInput,
            DomainError::Serialization(_) => ErrorCode::SerializationError,
            DomainError::Encryption(_) => ErrorCode::EncryptionError,
        }
    }

    /// Get error message
    pub fn message(&self) -> &str {
        match self {
            DomainError::Authentication(msg)
            | DomainError::SessionExpired(msg)
            | DomainError::ChallengeNotFound(msg)
            | DomainError::UserNotFound(msg)
            | DomainError::NotFound(msg)
            | DomainError::CheckInRejected(msg)
            | DomainError::UsernameTaken(msg)
            | DomainError::UsernameCooldown(msg)
            | DomainError::EntitlementRequired(msg)
            | DomainError::PurchaseFailed(msg)
            | DomainError::Network(msg)
            | DomainError::Offline(msg)
            | DomainError::ExternalService(msg)
            | DomainError::Repository(msg)
            | DomainError::Infrastructure(msg)
            | DomainError::Validation(msg)
            | DomainError::DataIntegrity(msg)
            | DomainError::Conflict(msg)
            | DomainError::InvalidInput(msg)
            | DomainError::Serialization(msg)
            | DomainError::Encryption(msg) => msg,
        }
    }

    /// Get error severity
    pub fn severity(&self) -> ErrorSeverity {
        self.code().severity()
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        self.code().is_recoverable()
    }

    /// Format error with code
    pub fn format_with_code(&self) -> String {
        format!("[{}] {}", self.code().code(), self)
    }
}
