use serde::{Deserialize, Serialize};

use hundred_days_domain::streak::{StreakOverview, UrgentChallenge};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgentChallengeDto {
    pub challenge_id: String,
    pub title: String,
    pub streak_count: u32,
}

impl From<UrgentChallenge> for UrgentChallengeDto {
    fn from(urgent: UrgentChallenge) -> Self {
        Self {
            challenge_id: urgent.challenge_id,
            title: urgent.title,
            streak_count: urgent.streak_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakOverviewDto {
    pub max_streak: u32,
    pub has_active_streaks: bool,
    pub most_urgent: Option<UrgentChallengeDto>,
    pub active_count: u32,
    pub archived_count: u32,
    pub completed_count: u32,
    pub completed_today_count: u32,
}

impl From<StreakOverview> for StreakOverviewDto {
    fn from(overview: StreakOverview) -> Self {
        Self {
            max_streak: overview.max_streak,
            has_active_streaks: overview.has_active_streaks,
            most_urgent: overview.most_urgent.map(UrgentChallengeDto::from),
            active_count: overview.active_count,
            archived_count: overview.archived_count,
            completed_count: overview.completed_count,
            completed_today_count: overview.completed_today_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDayDto {
    pub date: String, // YYYY-MM-DD
    pub is_checked_in: bool,
    pub day_number: Option<u32>,
    pub has_note: bool,
    pub has_photo: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthStatsDto {
    pub total_days: u32,
    pub checked_in_days: u32,
    pub check_in_rate: f64, // 0.0 - 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInCalendarDto {
    pub challenge_id: String,
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDayDto>,
    pub month_stats: MonthStatsDto,
}
