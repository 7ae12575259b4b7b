use anyhow::{anyhow, Context};
use chrono::{FixedOffset, Local};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::application::commands::handlers::*;
use crate::application::commands::CommandContext;
use crate::application::event_handlers::StatsRefreshEventHandler;
use crate::application::queries::{
    ChallengeProgressQueries, ChallengeQueryService, DashboardQueryService, UserQueryService,
};
use crate::application::services::{
    ChallengeStore, ConfigService, Connectivity, ConnectivityMonitor, ReminderService,
    SessionService, SubscriptionService, UserStatsService,
};
use crate::context::state::{AppContext, CommandHandlers, Queries, Repositories, Runtime, Services};
use hundred_days_domain::challenge::ChallengeRepository;
use hundred_days_domain::check_in::CheckInRepository;
use hundred_days_domain::events::challenge_events::*;
use hundred_days_domain::events::{EventBus, TypedEventHandlerWrapper};
use hundred_days_domain::notification::{AuthorizationStatus, NotificationSender};
use hundred_days_domain::session::SessionRepository;
use hundred_days_domain::shared::{Clock, SystemClock};
use hundred_days_domain::user::{UserRepository, UsernameRepository};
use hundred_days_infrastructure::events::InMemoryEventBus;
use hundred_days_infrastructure::http::{HttpIdentityProvider, HttpPurchaseProvider};
use hundred_days_infrastructure::notification::{
    LocalReminderScheduler, LogNotificationSender, WebhookNotificationSender,
};
use hundred_days_infrastructure::persistence::{
    repositories::{
        SqliteChallengeRepository, SqliteCheckInRepository, SqliteSessionRepository,
        SqliteUserRepository, SqliteUsernameRepository,
    },
    Database,
};
use hundred_days_infrastructure::security::{EncryptionService, KeyManager};

/// Overrides the platform data directory
pub const DATA_DIR_ENV: &str = "HUNDRED_DAYS_DATA_DIR";

/// `$HUNDRED_DAYS_DATA_DIR`, else the platform data directory
pub fn resolve_data_dir() -> anyhow::Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|dir| dir.join("hundred-days"))
        .ok_or_else(|| anyhow!("Could not determine a data directory; set {}", DATA_DIR_ENV))
}

pub async fn build_app_context(
    data_dir: &Path,
    config_service: Arc<ConfigService>,
) -> anyhow::Result<AppContext> {
    let startup_started_at = Instant::now();
    let config = config_service.config();

    let started_at = Instant::now();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
    info!(
        "✓ Ensured data dir exists ({}ms)",
        started_at.elapsed().as_millis()
    );

    let db_filename = if cfg!(debug_assertions) {
        "hundred-days-dev.db"
    } else {
        "hundred-days.db"
    };
    let db_path = data_dir.join(db_filename);
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow!("Invalid database path {:?}", db_path))?;

    info!("Database path: {}", db_path_str);

    // Session credentials are encrypted with a key bound to this device
    info!("🔐 Initializing encryption...");
    let started_at = Instant::now();
    let key_manager = KeyManager::new(data_dir.to_path_buf());
    let salt = key_manager
        .initialize()
        .context("Failed to initialize encryption salt")?;
    let device_secret = key_manager
        .device_secret()
        .context("Failed to load device secret")?;
    let encryption_service = Arc::new(
        EncryptionService::from_password(&device_secret, &salt)
            .context("Failed to create encryption service")?,
    );
    info!(
        "✓ Encryption initialized ({}ms)",
        started_at.elapsed().as_millis()
    );

    info!("🔌 Connecting to database...");
    let started_at = Instant::now();
    let database = Database::new(db_path_str).await?;
    info!(
        "✓ Database connection established ({}ms)",
        started_at.elapsed().as_millis()
    );

    info!("🔄 Running migrations...");
    let started_at = Instant::now();
    database.run_migrations().await?;
    info!(
        "✓ Migrations completed ({}ms)",
        started_at.elapsed().as_millis()
    );

    let pool = Arc::new(database.pool().clone());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let challenge_repo =
        Arc::new(SqliteChallengeRepository::new(pool.clone())) as Arc<dyn ChallengeRepository>;
    let check_in_repo =
        Arc::new(SqliteCheckInRepository::new(pool.clone())) as Arc<dyn CheckInRepository>;
    let user_repo = Arc::new(SqliteUserRepository::new(pool.clone())) as Arc<dyn UserRepository>;
    let username_repo =
        Arc::new(SqliteUsernameRepository::new(pool.clone())) as Arc<dyn UsernameRepository>;
    let session_repo = Arc::new(SqliteSessionRepository::new(
        pool.clone(),
        encryption_service.clone(),
    )) as Arc<dyn SessionRepository>;

    // Backend gateways
    let identity = Arc::new(HttpIdentityProvider::new(config.backend_url.clone())?);
    let purchases = Arc::new(HttpPurchaseProvider::new(config.backend_url.clone())?);

    // Event bus with stats refresh subscribed to challenge changes
    let started_at = Instant::now();
    let event_bus = Arc::new(InMemoryEventBus::new());
    let stats_service = Arc::new(UserStatsService::new(
        challenge_repo.clone(),
        check_in_repo.clone(),
        user_repo.clone(),
        clock.clone(),
    ));
    let stats_refresh_handler = StatsRefreshEventHandler::new(stats_service.clone());
    event_bus
        .subscribe(Arc::new(TypedEventHandlerWrapper::<CheckInRecorded, _>::new(
            stats_refresh_handler.clone(),
        )))
        .await;
    event_bus
        .subscribe(Arc::new(TypedEventHandlerWrapper::<ChallengeCreated, _>::new(
            stats_refresh_handler.clone(),
        )))
        .await;
    event_bus
        .subscribe(Arc::new(TypedEventHandlerWrapper::<ChallengeUpdated, _>::new(
            stats_refresh_handler.clone(),
        )))
        .await;
    event_bus
        .subscribe(Arc::new(TypedEventHandlerWrapper::<ChallengeDeleted, _>::new(
            stats_refresh_handler,
        )))
        .await;
    let event_bus: Arc<dyn EventBus> = event_bus;
    info!(
        "✓ Event handlers registered ({}ms)",
        started_at.elapsed().as_millis()
    );

    // Reminders
    let sender: Arc<dyn NotificationSender> = match &config.push_gateway_url {
        Some(url) => {
            let sender = WebhookNotificationSender::new(url.clone())?;
            match &config.push_device_token {
                Some(token) => Arc::new(sender.with_device_token(token.clone())),
                None => Arc::new(sender),
            }
        }
        None => Arc::new(LogNotificationSender),
    };
    let reminder_scheduler = Arc::new(LocalReminderScheduler::new(sender));
    reminder_scheduler
        .set_authorization(if config.reminders_enabled {
            AuthorizationStatus::Authorized
        } else {
            AuthorizationStatus::Denied
        })
        .await;

    let offset: FixedOffset = *Local::now().offset();
    let reminders = Arc::new(ReminderService::new(
        reminder_scheduler.clone(),
        clock.clone(),
        offset,
        config.daily_reminder,
        config.streak_risk_reminder,
    ));

    // Application services
    let session = Arc::new(SessionService::new(
        identity,
        session_repo.clone(),
        user_repo.clone(),
        event_bus.clone(),
        clock.clone(),
    ));
    let subscription = Arc::new(SubscriptionService::new(
        purchases,
        event_bus.clone(),
        clock.clone(),
        config.product_id.clone(),
    ));
    let connectivity = Arc::new(ConnectivityMonitor::new(Connectivity::Online));
    let store = Arc::new(ChallengeStore::new(
        challenge_repo.clone(),
        session.clone(),
        clock.clone(),
    ));

    let ctx = Arc::new(CommandContext::new(
        session.clone(),
        connectivity.clone(),
        store.clone(),
        event_bus.clone(),
        clock.clone(),
    ));

    let command_handlers = CommandHandlers {
        create_challenge: Arc::new(CreateChallengeCommandHandler::new(
            challenge_repo.clone(),
            subscription.clone(),
            ctx.clone(),
        )),
        rename_challenge: Arc::new(RenameChallengeCommandHandler::new(
            challenge_repo.clone(),
            ctx.clone(),
        )),
        archive_challenge: Arc::new(ArchiveChallengeCommandHandler::new(
            challenge_repo.clone(),
            ctx.clone(),
        )),
        unarchive_challenge: Arc::new(UnarchiveChallengeCommandHandler::new(
            challenge_repo.clone(),
            subscription.clone(),
            ctx.clone(),
        )),
        delete_challenge: Arc::new(DeleteChallengeCommandHandler::new(
            challenge_repo.clone(),
            ctx.clone(),
        )),
        record_check_in: Arc::new(RecordCheckInCommandHandler::new(
            challenge_repo.clone(),
            check_in_repo.clone(),
            subscription.clone(),
            ctx.clone(),
        )),
        claim_username: Arc::new(ClaimUsernameCommandHandler::new(
            user_repo.clone(),
            username_repo.clone(),
            ctx,
        )),
    };

    let queries = Queries {
        challenges: Arc::new(ChallengeQueryService::new(
            challenge_repo.clone(),
            check_in_repo.clone(),
            session.clone(),
            clock.clone(),
        )),
        dashboard: Arc::new(DashboardQueryService::new(
            challenge_repo.clone(),
            session.clone(),
            clock.clone(),
        )),
        progress: Arc::new(ChallengeProgressQueries::new(
            challenge_repo.clone(),
            check_in_repo.clone(),
            session.clone(),
            subscription.clone(),
        )),
        user: Arc::new(UserQueryService::new(user_repo.clone(), session.clone())),
    };

    info!(
        "✅ App context ready ({}ms)",
        startup_started_at.elapsed().as_millis()
    );

    Ok(AppContext {
        runtime: Runtime {
            pool,
            db: Arc::new(database),
            encryption_service,
            event_bus,
            clock,
            reminder_scheduler,
            shutdown: CancellationToken::new(),
        },
        repositories: Repositories {
            challenge: challenge_repo,
            check_in: check_in_repo,
            user: user_repo,
            username: username_repo,
            session: session_repo,
        },
        services: Services {
            config: config_service,
            session,
            subscription,
            connectivity,
            store,
            reminders,
            stats: stats_service,
        },
        queries,
        command_handlers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::challenge_commands::CreateChallengeCommand;
    use crate::application::commands::CommandHandler;
    use hundred_days_domain::shared::DomainError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_build_app_context_on_fresh_dir() {
        let data_dir = TempDir::new().unwrap();
        let config = Arc::new(ConfigService::new(&data_dir.path().join("config")).unwrap());

        let context = build_app_context(data_dir.path(), config).await.unwrap();

        assert!(!context.runtime.pool.is_closed());
        assert!(data_dir.path().join(".encryption_salt").exists());
        assert!(context.services.session.current_user().await.is_none());

        // Signed out: writes are refused, nothing touches the backend
        let result = context
            .command_handlers
            .create_challenge
            .handle(CreateChallengeCommand {
                title: "Run".to_string(),
                is_timed: false,
            })
            .await;
        assert!(matches!(result, Err(DomainError::Authentication(_))));

        context.shutdown();
        assert!(context.runtime.shutdown.is_cancelled());
    }
}
