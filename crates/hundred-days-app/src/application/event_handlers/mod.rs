mod stats_refresh_handler;

pub use stats_refresh_handler::StatsRefreshEventHandler;
