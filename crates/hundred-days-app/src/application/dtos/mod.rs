mod challenge_dto;
mod streak_dto;
mod user_dto;

pub use challenge_dto::{ChallengeDetailDto, ChallengeDto, CheckInDto};
pub use streak_dto::{
    CalendarDayDto, CheckInCalendarDto, MonthStatsDto, StreakOverviewDto, UrgentChallengeDto,
};
pub use user_dto::{UserProfileDto, UserStatsDto};
