use std::sync::Arc;

use crate::application::dtos::UserProfileDto;
use crate::application::services::SessionService;
use hundred_days_domain::shared::DomainError;
use hundred_days_domain::user::UserRepository;

pub struct UserQueryService {
    user_repo: Arc<dyn UserRepository>,
    session: Arc<SessionService>,
}

impl UserQueryService {
    pub fn new(user_repo: Arc<dyn UserRepository>, session: Arc<SessionService>) -> Self {
        Self { user_repo, session }
    }

    /// Profile and aggregate stats of the signed-in user
    pub async fn profile(&self) -> Result<UserProfileDto, DomainError> {
        let owner_id = self.session.require_user().await?;
        let profile = self
            .user_repo
            .find_by_id(&owner_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(owner_id.to_string()))?;
        Ok(UserProfileDto::from(&profile))
    }
}
