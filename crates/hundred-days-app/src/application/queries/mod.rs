mod challenge_queries;
mod dashboard_queries;
mod progress_queries;
mod user_queries;

pub use challenge_queries::ChallengeQueryService;
pub use dashboard_queries::DashboardQueryService;
pub use progress_queries::ChallengeProgressQueries;
pub use user_queries::UserQueryService;

#[cfg(test)]
mod tests;
