use log::{info, warn};
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::error::UserFacingError;
use crate::application::commands::handlers::*;
use crate::application::queries::{
    ChallengeProgressQueries, ChallengeQueryService, DashboardQueryService, UserQueryService,
};
use crate::application::services::{
    ChallengeStore, ConfigService, ConnectivityMonitor, ReminderService, SessionService,
    SubscriptionService, UserStatsService,
};
use hundred_days_domain::challenge::ChallengeRepository;
use hundred_days_domain::check_in::CheckInRepository;
use hundred_days_domain::events::EventBus;
use hundred_days_domain::session::SessionRepository;
use hundred_days_domain::shared::{Clock, DomainError};
use hundred_days_domain::user::{UserRepository, UsernameRepository};
use hundred_days_infrastructure::notification::LocalReminderScheduler;
use hundred_days_infrastructure::persistence::Database;
use hundred_days_infrastructure::security::EncryptionService;

/// Command handlers container
pub struct CommandHandlers {
    pub create_challenge: Arc<CreateChallengeCommandHandler>,
    pub rename_challenge: Arc<RenameChallengeCommandHandler>,
    pub archive_challenge: Arc<ArchiveChallengeCommandHandler>,
    pub unarchive_challenge: Arc<UnarchiveChallengeCommandHandler>,
    pub delete_challenge: Arc<DeleteChallengeCommandHandler>,
    pub record_check_in: Arc<RecordCheckInCommandHandler>,
    pub claim_username: Arc<ClaimUsernameCommandHandler>,
}

pub struct Runtime {
    pub pool: Arc<SqlitePool>,
    pub db: Arc<Database>,
    pub encryption_service: Arc<EncryptionService>,
    pub event_bus: Arc<dyn EventBus>,
    pub clock: Arc<dyn Clock>,
    pub reminder_scheduler: Arc<LocalReminderScheduler>,
    /// Cancels every background task spawned by `start`
    pub shutdown: CancellationToken,
}

pub struct Repositories {
    pub challenge: Arc<dyn ChallengeRepository>,
    pub check_in: Arc<dyn CheckInRepository>,
    pub user: Arc<dyn UserRepository>,
    pub username: Arc<dyn UsernameRepository>,
    pub session: Arc<dyn SessionRepository>,
}

pub struct Services {
    pub config: Arc<ConfigService>,
    pub session: Arc<SessionService>,
    pub subscription: Arc<SubscriptionService>,
    pub connectivity: Arc<ConnectivityMonitor>,
    pub store: Arc<ChallengeStore>,
    pub reminders: Arc<ReminderService>,
    pub stats: Arc<UserStatsService>,
}

pub struct Queries {
    pub challenges: Arc<ChallengeQueryService>,
    pub dashboard: Arc<DashboardQueryService>,
    pub progress: Arc<ChallengeProgressQueries>,
    pub user: Arc<UserQueryService>,
}

/// Everything the app shares, built once at startup and passed explicitly
pub struct AppContext {
    pub runtime: Runtime,
    pub repositories: Repositories,
    pub services: Services,
    pub queries: Queries,
    pub command_handlers: CommandHandlers,
}

impl AppContext {
    pub async fn new(data_dir: &Path, config: Arc<ConfigService>) -> anyhow::Result<Self> {
        super::bootstrap::build_app_context(data_dir, config).await
    }

    /// Restore the previous session, load the board and start background
    /// watchers. Failures here are logged; the app still starts.
    pub async fn start(&self) -> Vec<JoinHandle<()>> {
        let services = &self.services;
        let shutdown = &self.runtime.shutdown;

        let handles = vec![
            services
                .connectivity
                .spawn_refresh_on_reconnect(services.store.clone(), shutdown.child_token()),
            services
                .reminders
                .clone()
                .spawn_board_watcher(services.store.subscribe(), shutdown.child_token()),
        ];

        match services.session.restore().await {
            Ok(Some(user_id)) => info!("👤 Signed in as {}", user_id),
            Ok(None) => info!("👤 No stored session, waiting for sign-in"),
            Err(e) => warn!("[startup] session restore failed: {}", UserFacingError::from(e)),
        }

        if let Err(e) = services.subscription.refresh().await {
            warn!("[startup] entitlement refresh failed: {}", UserFacingError::from(e));
        }

        if let Err(e) = services.store.refresh_with_cancel(shutdown).await {
            warn!("[startup] loading challenges failed: {}", UserFacingError::from(e));
        }

        match services.reminders.schedule_daily().await {
            Ok(true) => {}
            Ok(false) => info!("🔕 Notifications not authorized, reminders disabled"),
            Err(e) => warn!("[startup] daily reminder failed: {}", UserFacingError::from(e)),
        }

        handles
    }

    /// Sign out and drop everything scoped to the user
    pub async fn sign_out(&self) -> Result<(), DomainError> {
        self.services.session.sign_out().await?;
        self.services.store.clear();
        self.services.reminders.cancel_all().await
    }

    pub fn shutdown(&self) {
        self.runtime.shutdown.cancel();
    }
}
