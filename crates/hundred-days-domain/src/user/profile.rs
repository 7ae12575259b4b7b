use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::username::Username;
use crate::challenge::Challenge;
use crate::shared::{DomainError, UserId};
use crate::streak;

/// Aggregate statistics shown on the profile screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_check_ins: u32,
    pub longest_streak: u32,
    pub current_best_streak: u32,
    pub active_challenges: u32,
    pub completed_challenges: u32,
}

impl UserStats {
    /// Recompute from the user's challenges. The longest streak never goes down,
    /// even after the challenge that held it is deleted.
    pub fn compute(challenges: &[Challenge], total_check_ins: u32, previous: &UserStats) -> Self {
        let current_best_streak = challenges
            .iter()
            .filter(|c| !c.is_archived())
            .map(Challenge::streak_count)
            .max()
            .unwrap_or(0);

        Self {
            total_check_ins,
            longest_streak: previous.longest_streak.max(streak::max_streak(challenges)),
            current_best_streak,
            active_challenges: challenges.iter().filter(|c| c.is_active()).count() as u32,
            completed_challenges: challenges.iter().filter(|c| c.is_completed()).count() as u32,
        }
    }
}

/// One document per user, keyed by the backend UID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    id: UserId,
    display_name: String,
    username: Option<Username>,
    username_changed_at: Option<DateTime<Utc>>,
    stats: UserStats,
    created_at: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(id: UserId, display_name: &str, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let display_name = display_name.trim();
        if display_name.chars().count() > 50 {
            return Err(DomainError::Validation(
                "Display name cannot exceed 50 characters".to_string(),
            ));
        }

        Ok(Self {
            id,
            display_name: display_name.to_string(),
            username: None,
            username_changed_at: None,
            stats: UserStats::default(),
            created_at: now,
            last_modified: now,
        })
    }

    pub fn restore(
        id: UserId,
        display_name: String,
        username: Option<Username>,
        username_changed_at: Option<DateTime<Utc>>,
        stats: UserStats,
        created_at: DateTime<Utc>,
        last_modified: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            display_name,
            username,
            username_changed_at,
            stats,
            created_at,
            last_modified,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn username(&self) -> Option<&Username> {
        self.username.as_ref()
    }

    pub fn username_changed_at(&self) -> Option<DateTime<Utc>> {
        self.username_changed_at
    }

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    pub fn set_username(&mut self, username: Username, now: DateTime<Utc>) {
        self.username = Some(username);
        self.username_changed_at = Some(now);
        self.last_modified = now;
    }

    pub fn update_stats(&mut self, stats: UserStats, now: DateTime<Utc>) {
        self.stats = stats;
        self.last_modified = now;
    }
}
