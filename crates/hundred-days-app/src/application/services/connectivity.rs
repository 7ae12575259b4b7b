use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::challenge_store::ChallengeStore;
use hundred_days_domain::shared::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Online,
    Offline,
}

/// Tracks reachability of the backend. Writes are refused while offline and
/// the challenge board reloads when the connection comes back.
pub struct ConnectivityMonitor {
    state: watch::Sender<Connectivity>,
}

impl ConnectivityMonitor {
    pub fn new(initial: Connectivity) -> Self {
        let (state, _) = watch::channel(initial);
        Self { state }
    }

    pub fn current(&self) -> Connectivity {
        *self.state.borrow()
    }

    pub fn is_online(&self) -> bool {
        self.current() == Connectivity::Online
    }

    pub fn subscribe(&self) -> watch::Receiver<Connectivity> {
        self.state.subscribe()
    }

    /// Record a new reachability state. Returns true if it changed.
    pub fn set(&self, next: Connectivity) -> bool {
        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });

        if changed {
            match next {
                Connectivity::Online => info!("[connectivity] back online"),
                Connectivity::Offline => warn!("[connectivity] connection lost, writes disabled"),
            }
        }

        changed
    }

    pub fn ensure_online(&self) -> Result<(), DomainError> {
        match self.current() {
            Connectivity::Online => Ok(()),
            Connectivity::Offline => Err(DomainError::Offline(
                "You're offline. Reconnect to save changes.".to_string(),
            )),
        }
    }

    /// Reload the challenge board on every Offline -> Online transition until
    /// `shutdown` fires.
    pub fn spawn_refresh_on_reconnect(
        &self,
        store: Arc<ChallengeStore>,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        let mut rx = self.subscribe();
        let mut previous = *rx.borrow_and_update();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }

                let current = *rx.borrow_and_update();
                if previous == Connectivity::Offline && current == Connectivity::Online {
                    info!("[connectivity] reconnected, refreshing challenges");
                    if let Err(e) = store.refresh_with_cancel(&shutdown).await {
                        warn!("[connectivity] refresh after reconnect failed: {}", e);
                    }
                }
                previous = current;
            }
        })
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(Connectivity::Online)
    }
}
