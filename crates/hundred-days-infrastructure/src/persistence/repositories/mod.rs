pub mod challenge_repo;
pub mod check_in_repo;
pub mod session_repo;
pub mod user_repo;
pub mod username_repo;

pub use challenge_repo::SqliteChallengeRepository;
pub use check_in_repo::SqliteCheckInRepository;
pub use session_repo::SqliteSessionRepository;
pub use user_repo::SqliteUserRepository;
pub use username_repo::SqliteUsernameRepository;
