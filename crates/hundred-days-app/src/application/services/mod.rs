pub mod challenge_store;
pub mod config_service;
pub mod connectivity;
pub mod reminder_service;
pub mod session_service;
pub mod subscription_service;
pub mod user_stats_service;

pub use challenge_store::{ChallengeBoard, ChallengeStore};
pub use config_service::{AppConfig, ConfigService, LogLevel};
pub use connectivity::{Connectivity, ConnectivityMonitor};
pub use reminder_service::ReminderService;
pub use session_service::SessionService;
pub use subscription_service::SubscriptionService;
pub use user_stats_service::UserStatsService;
