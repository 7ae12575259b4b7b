use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::value_objects::{CheckInDetails, DayNumber};
use crate::shared::{ChallengeId, CheckInId};

/// A single day's completion event. Owned by its challenge; at most one per
/// calendar day per challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRecord {
    id: CheckInId,
    challenge_id: ChallengeId,
    day_number: DayNumber,
    date: NaiveDate,
    details: CheckInDetails,
    created_at: DateTime<Utc>,
}

impl CheckInRecord {
    pub fn new(
        challenge_id: ChallengeId,
        day_number: DayNumber,
        date: NaiveDate,
        details: CheckInDetails,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CheckInId::new(),
            challenge_id,
            day_number,
            date,
            details,
            created_at: now,
        }
    }

    pub fn restore(
        id: CheckInId,
        challenge_id: ChallengeId,
        day_number: DayNumber,
        date: NaiveDate,
        details: CheckInDetails,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            challenge_id,
            day_number,
            date,
            details,
            created_at,
        }
    }

    pub fn id(&self) -> &CheckInId {
        &self.id
    }

    pub fn challenge_id(&self) -> &ChallengeId {
        &self.challenge_id
    }

    pub fn day_number(&self) -> DayNumber {
        self.day_number
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn note(&self) -> Option<&str> {
        self.details.note.as_deref()
    }

    pub fn quote_id(&self) -> Option<&str> {
        self.details.quote_id.as_deref()
    }

    pub fn photo_url(&self) -> Option<&Url> {
        self.details.photo_url.as_ref()
    }

    pub fn details(&self) -> &CheckInDetails {
        &self.details
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
