use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::RwLock;

use hundred_days_domain::events::user_events::UserSignedIn;
use hundred_days_domain::events::EventBus;
use hundred_days_domain::session::{
    AuthSession, IdentityProvider, IdentityProviderKind, SessionRepository,
};
use hundred_days_domain::shared::{Clock, DomainError, UserId};
use hundred_days_domain::user::{UserProfile, UserRepository};

/// Owns the signed-in session. The backend UID it yields scopes every read
/// and write in the app.
pub struct SessionService {
    identity: Arc<dyn IdentityProvider>,
    session_repo: Arc<dyn SessionRepository>,
    user_repo: Arc<dyn UserRepository>,
    event_bus: Arc<dyn EventBus>,
    clock: Arc<dyn Clock>,
    current: RwLock<Option<AuthSession>>,
}

impl SessionService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        session_repo: Arc<dyn SessionRepository>,
        user_repo: Arc<dyn UserRepository>,
        event_bus: Arc<dyn EventBus>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            identity,
            session_repo,
            user_repo,
            event_bus,
            clock,
            current: RwLock::new(None),
        }
    }

    /// Load the stored session at startup. An expired one is discarded.
    pub async fn restore(&self) -> Result<Option<UserId>, DomainError> {
        let stored = self.session_repo.current().await?;

        let session = match stored {
            Some(session) if session.is_valid(self.clock.now()) => session,
            Some(session) => {
                info!(
                    "[session] stored session for {} expired at {}, signing out",
                    session.user_id(),
                    session.expires_at()
                );
                self.session_repo.clear().await?;
                return Ok(None);
            }
            None => return Ok(None),
        };

        let user_id = session.user_id().clone();
        *self.current.write().await = Some(session);
        info!("[session] restored session for {}", user_id);
        Ok(Some(user_id))
    }

    /// Exchange a provider token for a backend session and make sure the
    /// user's profile document exists.
    pub async fn sign_in(
        &self,
        provider: IdentityProviderKind,
        provider_token: &str,
    ) -> Result<UserProfile, DomainError> {
        info!("[session] signing in with {}", provider.as_str());

        // 1. Exchange token
        let session = self.identity.exchange(provider, provider_token).await?;
        if !session.is_valid(self.clock.now()) {
            return Err(DomainError::Authentication(
                "Backend issued an already expired session".to_string(),
            ));
        }

        // 2. Ensure profile exists
        let profile = match self.user_repo.find_by_id(session.user_id()).await? {
            Some(profile) => profile,
            None => {
                let profile = UserProfile::new(
                    session.user_id().clone(),
                    session.display_name().unwrap_or_default(),
                    self.clock.now(),
                )?;
                self.user_repo.save(&profile).await?;
                info!("[session] created profile for {}", profile.id());
                profile
            }
        };

        // 3. Persist session
        self.session_repo.save(&session).await?;
        let user_id = session.user_id().clone();
        *self.current.write().await = Some(session);

        // 4. Publish event
        let event = UserSignedIn {
            user_id,
            provider: provider.as_str().to_string(),
            occurred_at: Utc::now(),
        };
        if let Err(e) = self.event_bus.publish(Box::new(event)).await {
            warn!("[session] failed to publish sign-in event: {}", e);
        }

        Ok(profile)
    }

    pub async fn sign_out(&self) -> Result<(), DomainError> {
        self.session_repo.clear().await?;
        if let Some(session) = self.current.write().await.take() {
            info!("[session] signed out {}", session.user_id());
        }
        Ok(())
    }

    /// UID of the signed-in user, if the session is still valid
    pub async fn current_user(&self) -> Option<UserId> {
        self.current
            .read()
            .await
            .as_ref()
            .filter(|s| s.is_valid(self.clock.now()))
            .map(|s| s.user_id().clone())
    }

    pub async fn current_session(&self) -> Option<AuthSession> {
        self.current.read().await.clone()
    }

    pub async fn require_user(&self) -> Result<UserId, DomainError> {
        let guard = self.current.read().await;
        match guard.as_ref() {
            None => Err(DomainError::Authentication(
                "Sign in to continue".to_string(),
            )),
            Some(session) if !session.is_valid(self.clock.now()) => {
                Err(DomainError::Authentication(
                    "Your session has expired. Sign in again.".to_string(),
                ))
            }
            Some(session) => Ok(session.user_id().clone()),
        }
    }
}
