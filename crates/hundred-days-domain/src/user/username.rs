use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::profile::UserProfile;
use crate::shared::{DomainError, UserId};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;
pub const USERNAME_CHANGE_COOLDOWN_HOURS: i64 = 48;

/// Lowercase handle; also the key of its reservation document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let value = raw.trim().to_lowercase();
        let len = value.chars().count();

        if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
            return Err(DomainError::Validation(format!(
                "Username must be {}-{} characters",
                USERNAME_MIN_LEN, USERNAME_MAX_LEN
            )));
        }

        if !value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(DomainError::Validation(
                "Username may only contain letters, digits and underscores".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsernameReservation {
    pub username: Username,
    pub owner_id: UserId,
    pub claimed_at: DateTime<Utc>,
}

impl UsernameReservation {
    pub fn new(username: Username, owner_id: UserId, claimed_at: DateTime<Utc>) -> Self {
        Self {
            username,
            owner_id,
            claimed_at,
        }
    }
}

/// What a permitted claim has to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimDecision {
    /// The requester already holds this name; nothing to write
    AlreadyOwned,
    /// Reserve the name, releasing `previous` if there is one
    Claim { previous: Option<Username> },
}

pub struct UsernamePolicy;

impl UsernamePolicy {
    pub fn check_claim(
        requester: &UserId,
        requested: &Username,
        existing: Option<&UsernameReservation>,
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<ClaimDecision, DomainError> {
        if let Some(reservation) = existing {
            if &reservation.owner_id != requester {
                return Err(DomainError::UsernameTaken(format!(
                    "'{}' is already taken",
                    requested
                )));
            }
            return Ok(ClaimDecision::AlreadyOwned);
        }

        let previous = profile.username().cloned();

        if previous.is_some() {
            if let Some(changed_at) = profile.username_changed_at() {
                let unlocks_at = changed_at + Duration::hours(USERNAME_CHANGE_COOLDOWN_HOURS);
                if now < unlocks_at {
                    let hours_remaining = (unlocks_at - now).num_hours().max(1);
                    return Err(DomainError::UsernameCooldown(format!(
                        "Username can be changed again in {} hour(s)",
                        hours_remaining
                    )));
                }
            }
        }

        Ok(ClaimDecision::Claim { previous })
    }
}
