use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use hundred_days_domain::challenge::Challenge;
use hundred_days_domain::check_in::CheckInRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeDto {
    pub id: String,
    pub title: String,
    pub is_timed: bool,
    pub streak_count: u32,
    pub total_check_ins: u32,
    pub days_remaining: u32,
    pub is_archived: bool,
    pub is_completed: bool,
    pub is_completed_today: bool,
    pub has_streak_expired: bool,
    pub last_check_in_date: Option<String>, // YYYY-MM-DD
    pub created_at: String,
    pub last_modified: String,
}

impl ChallengeDto {
    /// `today` drives the derived flags
    pub fn from_challenge(challenge: &Challenge, today: NaiveDate) -> Self {
        Self {
            id: challenge.id().to_string(),
            title: challenge.title().to_string(),
            is_timed: challenge.is_timed(),
            streak_count: challenge.streak_count(),
            total_check_ins: challenge.total_check_ins(),
            days_remaining: challenge.days_remaining(),
            is_archived: challenge.is_archived(),
            is_completed: challenge.is_completed(),
            is_completed_today: challenge.is_completed_today(today),
            has_streak_expired: challenge.has_streak_expired(today),
            last_check_in_date: challenge
                .last_check_in_date()
                .map(|d| d.format("%Y-%m-%d").to_string()),
            created_at: challenge.created_at().to_rfc3339(),
            last_modified: challenge.last_modified().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInDto {
    pub id: String,
    pub day_number: u32,
    pub date: String, // YYYY-MM-DD
    pub note: Option<String>,
    pub quote_id: Option<String>,
    pub photo_url: Option<String>,
}

impl From<&CheckInRecord> for CheckInDto {
    fn from(record: &CheckInRecord) -> Self {
        Self {
            id: record.id().to_string(),
            day_number: record.day_number().value(),
            date: record.date().format("%Y-%m-%d").to_string(),
            note: record.note().map(str::to_string),
            quote_id: record.quote_id().map(str::to_string),
            photo_url: record.photo_url().map(|u| u.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeDetailDto {
    pub challenge: ChallengeDto,
    /// Ordered by day number
    pub check_ins: Vec<CheckInDto>,
}
