use log::warn;
use std::sync::Arc;

use crate::application::services::{ChallengeStore, ConnectivityMonitor, SessionService};
use hundred_days_domain::events::{DomainEvent, EventBus};
use hundred_days_domain::shared::{Clock, DomainError, UserId};

/// Collaborators every write command needs, passed explicitly instead of
/// living in globals
pub struct CommandContext {
    pub session: Arc<SessionService>,
    pub connectivity: Arc<ConnectivityMonitor>,
    pub store: Arc<ChallengeStore>,
    pub event_bus: Arc<dyn EventBus>,
    pub clock: Arc<dyn Clock>,
}

impl CommandContext {
    pub fn new(
        session: Arc<SessionService>,
        connectivity: Arc<ConnectivityMonitor>,
        store: Arc<ChallengeStore>,
        event_bus: Arc<dyn EventBus>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            session,
            connectivity,
            store,
            event_bus,
            clock,
        }
    }

    /// Gate for every write: must be online and signed in. Yields the owner.
    pub async fn begin_write(&self) -> Result<UserId, DomainError> {
        self.connectivity.ensure_online()?;
        self.session.require_user().await
    }

    pub async fn publish(&self, event: impl DomainEvent + 'static) -> Result<(), DomainError> {
        self.event_bus.publish(Box::new(event)).await
    }

    /// Reload the board after a committed write. The write already
    /// succeeded, so a failed reload is only logged.
    pub async fn refresh_store(&self) {
        if let Err(e) = self.store.refresh().await {
            warn!("[store] refresh after write failed: {}", e);
        }
    }
}
