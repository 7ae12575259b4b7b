mod identity;
mod purchase;

pub use identity::HttpIdentityProvider;
pub use purchase::HttpPurchaseProvider;

use reqwest::Client;
use std::time::Duration;

use hundred_days_domain::shared::DomainError;

const USER_AGENT: &str = concat!("HundredDays/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub(crate) fn build_client() -> Result<Client, DomainError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| DomainError::Infrastructure(format!("Failed to create HTTP client: {}", e)))
}

/// Join a base URL and a path without doubling or dropping the slash
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
