use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::session_service::SessionService;
use hundred_days_domain::challenge::{Challenge, ChallengeRepository};
use hundred_days_domain::shared::{ChallengeId, Clock, DomainError, UserId};
use hundred_days_domain::streak::StreakOverview;

/// Snapshot of the signed-in user's challenges as shown on the board
#[derive(Debug, Clone)]
pub struct ChallengeBoard {
    pub owner_id: Option<UserId>,
    /// Not archived, oldest first. Completed challenges stay here.
    pub active: Vec<Challenge>,
    pub archived: Vec<Challenge>,
    pub overview: StreakOverview,
    pub today: NaiveDate,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl ChallengeBoard {
    pub fn empty(today: NaiveDate) -> Self {
        Self {
            owner_id: None,
            active: Vec::new(),
            archived: Vec::new(),
            overview: StreakOverview::compute(&[], today),
            today,
            loaded_at: None,
        }
    }

    pub fn build(
        owner_id: UserId,
        challenges: Vec<Challenge>,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        let overview = StreakOverview::compute(&challenges, today);
        let (archived, active): (Vec<Challenge>, Vec<Challenge>) =
            challenges.into_iter().partition(|c| c.is_archived());

        Self {
            owner_id: Some(owner_id),
            active,
            archived,
            overview,
            today,
            loaded_at: Some(now),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    pub fn find(&self, id: &ChallengeId) -> Option<&Challenge> {
        self.active
            .iter()
            .chain(self.archived.iter())
            .find(|c| c.id() == id)
    }
}

/// Reactive store of the challenge board. Views subscribe to the receiver
/// and re-render on every published snapshot.
pub struct ChallengeStore {
    challenge_repo: Arc<dyn ChallengeRepository>,
    session: Arc<SessionService>,
    clock: Arc<dyn Clock>,
    board: watch::Sender<ChallengeBoard>,
}

impl ChallengeStore {
    pub fn new(
        challenge_repo: Arc<dyn ChallengeRepository>,
        session: Arc<SessionService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (board, _) = watch::channel(ChallengeBoard::empty(clock.today()));
        Self {
            challenge_repo,
            session,
            clock,
            board,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ChallengeBoard> {
        self.board.subscribe()
    }

    pub fn snapshot(&self) -> ChallengeBoard {
        self.board.borrow().clone()
    }

    pub async fn refresh(&self) -> Result<(), DomainError> {
        self.refresh_with_cancel(&CancellationToken::new()).await
    }

    /// Reload the board from storage. Cancellation is not an error: the
    /// current snapshot simply stays in place.
    pub async fn refresh_with_cancel(&self, cancel: &CancellationToken) -> Result<(), DomainError> {
        if cancel.is_cancelled() {
            debug!("[store] refresh skipped, already cancelled");
            return Ok(());
        }

        let owner_id = match self.session.current_user().await {
            Some(owner_id) => owner_id,
            None => {
                self.clear();
                return Ok(());
            }
        };

        let challenges = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("[store] refresh cancelled for {}", owner_id);
                return Ok(());
            }
            result = self.challenge_repo.find_all_by_owner(&owner_id) => result?,
        };

        let board = ChallengeBoard::build(
            owner_id,
            challenges,
            self.clock.today(),
            self.clock.now(),
        );
        info!(
            "[store] board refreshed active={} archived={} max_streak={}",
            board.active.len(),
            board.archived.len(),
            board.overview.max_streak
        );
        self.board.send_replace(board);
        Ok(())
    }

    /// Drop everything, e.g. after sign-out
    pub fn clear(&self) {
        self.board
            .send_replace(ChallengeBoard::empty(self.clock.today()));
    }
}
