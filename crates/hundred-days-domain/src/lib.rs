// Domain layer - Pure business logic
// No dependencies on infrastructure or application layers

pub mod challenge;
pub mod check_in;
pub mod events;
pub mod notification;
pub mod session;
pub mod shared;
pub mod streak;
pub mod subscription;
pub mod user;

// Re-exports for convenience
pub use events::DomainEvent;
pub use shared::{ChallengeId, CheckInId, DomainError, UserId};
