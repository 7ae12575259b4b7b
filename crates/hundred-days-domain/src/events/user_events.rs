use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_event;
use crate::shared::UserId;

/// Event fired when a user reserves a username
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernameClaimed {
    pub user_id: UserId,
    pub username: String,
    pub previous: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(UsernameClaimed);

/// Event fired when the Pro entitlement flips
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitlementChanged {
    pub is_pro: bool,
    pub product_id: String,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(EntitlementChanged);

/// Event fired after a successful sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSignedIn {
    pub user_id: UserId,
    pub provider: String,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(UserSignedIn);
