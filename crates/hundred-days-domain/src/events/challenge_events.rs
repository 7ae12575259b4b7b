use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_event;
use crate::shared::{ChallengeId, UserId};

/// Event fired when a challenge is created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeCreated {
    pub challenge_id: ChallengeId,
    pub owner_id: UserId,
    pub title: String,
    pub is_timed: bool,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(ChallengeCreated);

/// Event fired when a challenge is renamed, archived or restored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeUpdated {
    pub challenge_id: ChallengeId,
    pub owner_id: UserId,
    pub title: Option<String>,
    pub archived: Option<bool>,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(ChallengeUpdated);

/// Event fired when a challenge is permanently deleted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeDeleted {
    pub challenge_id: ChallengeId,
    pub owner_id: UserId,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(ChallengeDeleted);

/// Event fired when a new day is logged on a challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRecorded {
    pub challenge_id: ChallengeId,
    pub owner_id: UserId,
    pub day_number: u32,
    pub date: NaiveDate,
    pub streak_count: u32,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(CheckInRecorded);

/// Event fired when the 100th day is logged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeCompleted {
    pub challenge_id: ChallengeId,
    pub owner_id: UserId,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(ChallengeCompleted);
