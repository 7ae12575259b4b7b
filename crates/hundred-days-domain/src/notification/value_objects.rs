use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::{ChallengeId, DomainError};

/// Permission state of the OS notification center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationStatus {
    NotDetermined,
    Denied,
    Authorized,
}

impl AuthorizationStatus {
    pub fn can_schedule(&self) -> bool {
        matches!(self, AuthorizationStatus::Authorized)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReminderKind {
    Daily,
    StreakRisk { challenge_id: ChallengeId },
}

impl ReminderKind {
    /// Stable identifier; a newer reminder of the same kind replaces the older
    pub fn identifier(&self) -> String {
        match self {
            ReminderKind::Daily => "daily".to_string(),
            ReminderKind::StreakRisk { .. } => "streak_risk".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub kind: ReminderKind,
    pub fire_at: DateTime<Utc>,
    pub title: String,
    pub body: String,
}

impl Reminder {
    pub fn daily(fire_at: DateTime<Utc>) -> Self {
        Self {
            kind: ReminderKind::Daily,
            fire_at,
            title: "Time to check in".to_string(),
            body: "Keep your 100 days going. Log today's progress.".to_string(),
        }
    }

    pub fn streak_risk(
        challenge_id: ChallengeId,
        title: &str,
        streak: u32,
        fire_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: ReminderKind::StreakRisk { challenge_id },
            fire_at,
            title: format!("Your {}-day streak is at risk", streak),
            body: format!("Check in to \"{}\" before midnight to keep it alive.", title),
        }
    }
}

/// Local wall-clock time of day for a recurring reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTime {
    pub hour: u8,
    pub minute: u8,
}

impl ReminderTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, DomainError> {
        if hour > 23 {
            return Err(DomainError::Validation(
                "Hour must be between 0 and 23".to_string(),
            ));
        }
        if minute > 59 {
            return Err(DomainError::Validation(
                "Minute must be between 0 and 59".to_string(),
            ));
        }
        Ok(Self { hour, minute })
    }

    pub fn as_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour as u32, self.minute as u32, 0).unwrap_or(NaiveTime::MIN)
    }
}
