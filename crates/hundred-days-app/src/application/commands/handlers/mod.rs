mod claim_username_handler;
mod create_challenge_handler;
mod delete_challenge_handler;
mod record_check_in_handler;
mod update_challenge_handler;


pub use claim_username_handler::ClaimUsernameCommandHandler;
pub use create_challenge_handler::CreateChallengeCommandHandler;
pub use delete_challenge_handler::DeleteChallengeCommandHandler;
pub use record_check_in_handler::RecordCheckInCommandHandler;
pub use update_challenge_handler::{
    ArchiveChallengeCommandHandler, RenameChallengeCommandHandler,
    UnarchiveChallengeCommandHandler,
};

use hundred_days_domain::challenge::{Challenge, ChallengeRepository};
use hundred_days_domain::shared::{ChallengeId, DomainError, UserId};

/// Load a challenge the owner can see, or fail with `ChallengeNotFound`
async fn load_owned(
    repo: &dyn ChallengeRepository,
    owner_id: &UserId,
    challenge_id: &str,
) -> Result<Challenge, DomainError> {
    repo.find_by_id(owner_id, &ChallengeId::from_string(challenge_id))
        .await?
        .ok_or_else(|| DomainError::ChallengeNotFound(challenge_id.to_string()))
}
