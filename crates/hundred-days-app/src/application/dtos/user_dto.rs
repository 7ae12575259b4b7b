use serde::{Deserialize, Serialize};

use hundred_days_domain::user::{UserProfile, UserStats};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStatsDto {
    pub total_check_ins: u32,
    pub longest_streak: u32,
    pub current_best_streak: u32,
    pub active_challenges: u32,
    pub completed_challenges: u32,
}

impl From<&UserStats> for UserStatsDto {
    fn from(stats: &UserStats) -> Self {
        Self {
            total_check_ins: stats.total_check_ins,
            longest_streak: stats.longest_streak,
            current_best_streak: stats.current_best_streak,
            active_challenges: stats.active_challenges,
            completed_challenges: stats.completed_challenges,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfileDto {
    pub id: String,
    pub display_name: String,
    pub username: Option<String>,
    pub username_changed_at: Option<String>,
    pub stats: UserStatsDto,
}

impl From<&UserProfile> for UserProfileDto {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id().to_string(),
            display_name: profile.display_name().to_string(),
            username: profile.username().map(|u| u.to_string()),
            username_changed_at: profile.username_changed_at().map(|t| t.to_rfc3339()),
            stats: UserStatsDto::from(profile.stats()),
        }
    }
}
