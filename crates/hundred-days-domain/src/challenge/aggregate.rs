use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::check_in::DayNumber;
use crate::shared::{ChallengeId, DomainError, UserId};

/// Number of logged days that completes a challenge
pub const CHALLENGE_LENGTH_DAYS: u32 = 100;

pub const TITLE_MAX_LEN: usize = 80;

/// Persisted state of a challenge, used to rebuild the aggregate
#[derive(Debug, Clone)]
pub struct ChallengeSnapshot {
    pub id: ChallengeId,
    pub owner_id: UserId,
    pub title: String,
    pub is_timed: bool,
    pub streak_count: u32,
    pub total_check_ins: u32,
    pub is_archived: bool,
    pub is_completed: bool,
    pub last_check_in_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// Result of applying today's check-in to a challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInOutcome {
    Recorded {
        day_number: DayNumber,
        streak_count: u32,
        completed: bool,
    },
    /// A check-in for this calendar day already exists; nothing changed
    AlreadyCheckedIn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    id: ChallengeId,
    owner_id: UserId,
    title: String,
    is_timed: bool,
    streak_count: u32,
    total_check_ins: u32,
    is_archived: bool,
    is_completed: bool,
    last_check_in_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

impl Challenge {
    pub fn new(
        owner_id: UserId,
        title: &str,
        is_timed: bool,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let title = Self::validate_title(title)?;

        Ok(Self {
            id: ChallengeId::new(),
            owner_id,
            title,
            is_timed,
            streak_count: 0,
            total_check_ins: 0,
            is_archived: false,
            is_completed: false,
            last_check_in_date: None,
            created_at: now,
            last_modified: now,
        })
    }

    pub fn restore(snapshot: ChallengeSnapshot) -> Self {
        Self {
            id: snapshot.id,
            owner_id: snapshot.owner_id,
            title: snapshot.title,
            is_timed: snapshot.is_timed,
            streak_count: snapshot.streak_count,
            total_check_ins: snapshot.total_check_ins,
            is_archived: snapshot.is_archived,
            is_completed: snapshot.is_completed,
            last_check_in_date: snapshot.last_check_in_date,
            created_at: snapshot.created_at,
            last_modified: snapshot.last_modified,
        }
    }

    fn validate_title(title: &str) -> Result<String, DomainError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::Validation(
                "Challenge title cannot be empty".to_string(),
            ));
        }
        if title.chars().count() > TITLE_MAX_LEN {
            return Err(DomainError::Validation(format!(
                "Challenge title cannot exceed {} characters",
                TITLE_MAX_LEN
            )));
        }
        Ok(title.to_string())
    }

    pub fn id(&self) -> &ChallengeId {
        &self.id
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_timed(&self) -> bool {
        self.is_timed
    }

    pub fn streak_count(&self) -> u32 {
        self.streak_count
    }

    pub fn total_check_ins(&self) -> u32 {
        self.total_check_ins
    }

    pub fn is_archived(&self) -> bool {
        self.is_archived
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn last_check_in_date(&self) -> Option<NaiveDate> {
        self.last_check_in_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Days left until the challenge is complete
    pub fn days_remaining(&self) -> u32 {
        CHALLENGE_LENGTH_DAYS.saturating_sub(self.total_check_ins)
    }

    pub fn is_completed_today(&self, today: NaiveDate) -> bool {
        self.last_check_in_date == Some(today)
    }

    /// True once a full day has passed since the last check-in. The streak
    /// survives only if today is logged.
    pub fn has_streak_expired(&self, today: NaiveDate) -> bool {
        match self.last_check_in_date {
            Some(last) => last < today,
            None => false,
        }
    }

    /// Active means it still shows up on the board and counts against limits
    pub fn is_active(&self) -> bool {
        !self.is_archived && !self.is_completed
    }

    pub fn rename(&mut self, title: &str, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.title = Self::validate_title(title)?;
        self.last_modified = now;
        Ok(())
    }

    pub fn archive(&mut self, now: DateTime<Utc>) {
        self.is_archived = true;
        self.last_modified = now;
    }

    pub fn unarchive(&mut self, now: DateTime<Utc>) {
        self.is_archived = false;
        self.last_modified = now;
    }

    /// Apply a check-in for `today`.
    ///
    /// Same day is a no-op, the next calendar day extends the streak, and any
    /// larger gap starts a new streak at 1.
    pub fn record_check_in(
        &mut self,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<CheckInOutcome, DomainError> {
        if self.is_archived {
            return Err(DomainError::CheckInRejected(
                "Archived challenges cannot be checked in".to_string(),
            ));
        }

        if self.is_completed {
            return Err(DomainError::CheckInRejected(format!(
                "Challenge already completed all {} days",
                CHALLENGE_LENGTH_DAYS
            )));
        }

        let next_streak = match self.last_check_in_date {
            None => 1,
            Some(last) if last == today => return Ok(CheckInOutcome::AlreadyCheckedIn),
            Some(last) if last > today => {
                return Err(DomainError::CheckInRejected(format!(
                    "Cannot check in for {} after a check-in on {}",
                    today, last
                )));
            }
            Some(last) if (today - last).num_days() == 1 => self.streak_count + 1,
            Some(_) => 1,
        };

        let day_number = DayNumber::new(self.total_check_ins + 1)?;

        self.streak_count = next_streak;
        self.total_check_ins = day_number.value();
        self.last_check_in_date = Some(today);
        self.is_completed = self.total_check_ins >= CHALLENGE_LENGTH_DAYS;
        self.last_modified = now;

        Ok(CheckInOutcome::Recorded {
            day_number,
            streak_count: self.streak_count,
            completed: self.is_completed,
        })
    }
}
