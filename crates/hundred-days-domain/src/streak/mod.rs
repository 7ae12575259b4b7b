//! Streak and urgency calculations over an in-memory challenge list.
//!
//! Everything here is pure: callers pass the challenges and the calendar day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::challenge::Challenge;

/// Highest streak across all challenges, archived ones included. 0 when empty.
pub fn max_streak(challenges: &[Challenge]) -> u32 {
    challenges
        .iter()
        .map(Challenge::streak_count)
        .max()
        .unwrap_or(0)
}

/// True if any non-archived challenge carries a streak
pub fn has_active_streaks(challenges: &[Challenge]) -> bool {
    challenges
        .iter()
        .any(|c| !c.is_archived() && c.streak_count() > 0)
}

/// Whether the challenge's streak is at risk today
pub fn is_at_risk(challenge: &Challenge, today: NaiveDate) -> bool {
    !challenge.is_archived()
        && !challenge.is_completed()
        && !challenge.is_completed_today(today)
        && challenge.has_streak_expired(today)
        && challenge.streak_count() > 0
}

/// The at-risk challenge with the most to lose.
///
/// Equal streaks resolve to the earliest created challenge, then the smallest id.
pub fn most_urgent_challenge(challenges: &[Challenge], today: NaiveDate) -> Option<&Challenge> {
    challenges
        .iter()
        .filter(|c| is_at_risk(c, today))
        .min_by(|a, b| {
            b.streak_count()
                .cmp(&a.streak_count())
                .then_with(|| a.created_at().cmp(&b.created_at()))
                .then_with(|| a.id().cmp(b.id()))
        })
}

/// Aggregate view used by dashboards and reminders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakOverview {
    pub max_streak: u32,
    pub has_active_streaks: bool,
    pub most_urgent: Option<UrgentChallenge>,
    pub active_count: u32,
    pub archived_count: u32,
    pub completed_count: u32,
    pub completed_today_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgentChallenge {
    pub challenge_id: String,
    pub title: String,
    pub streak_count: u32,
}

impl StreakOverview {
    pub fn compute(challenges: &[Challenge], today: NaiveDate) -> Self {
        Self {
            max_streak: max_streak(challenges),
            has_active_streaks: has_active_streaks(challenges),
            most_urgent: most_urgent_challenge(challenges, today).map(|c| UrgentChallenge {
                challenge_id: c.id().as_str().to_string(),
                title: c.title().to_string(),
                streak_count: c.streak_count(),
            }),
            active_count: count(challenges, |c| c.is_active()),
            archived_count: count(challenges, |c| c.is_archived()),
            completed_count: count(challenges, |c| c.is_completed()),
            completed_today_count: count(challenges, |c| {
                !c.is_archived() && c.is_completed_today(today)
            }),
        }
    }
}

fn count(challenges: &[Challenge], pred: impl Fn(&Challenge) -> bool) -> u32 {
    challenges.iter().filter(|&c| pred(c)).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::ChallengeSnapshot;
    use crate::shared::{ChallengeId, UserId};
    use chrono::{Duration, TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    fn challenge(
        id: &str,
        streak: u32,
        last: Option<NaiveDate>,
        created_day: u32,
    ) -> ChallengeSnapshot {
        ChallengeSnapshot {
            id: ChallengeId::from_string(id),
            owner_id: UserId::from_string("uid-1"),
            title: format!("challenge {}", id),
            is_timed: false,
            streak_count: streak,
            total_check_ins: streak,
            is_archived: false,
            is_completed: false,
            last_check_in_date: last,
            created_at: Utc.with_ymd_and_hms(2025, 1, created_day, 8, 0, 0).unwrap(),
            last_modified: Utc.with_ymd_and_hms(2025, 1, created_day, 8, 0, 0).unwrap(),
        }
    }

    fn yesterday() -> Option<NaiveDate> {
        Some(today() - Duration::days(1))
    }

    #[test]
    fn test_max_streak_empty_is_zero() {
        assert_eq!(max_streak(&[]), 0);
        assert!(!has_active_streaks(&[]));
        assert!(most_urgent_challenge(&[], today()).is_none());
    }

    #[test]
    fn test_max_streak_includes_archived() {
        let mut archived = challenge("a", 9, yesterday(), 1);
        archived.is_archived = true;
        let challenges = vec![
            Challenge::restore(archived),
            Challenge::restore(challenge("b", 4, yesterday(), 2)),
        ];

        assert_eq!(max_streak(&challenges), 9);
    }

    #[test]
    fn test_has_active_streaks_ignores_archived() {
        let mut archived = challenge("a", 9, yesterday(), 1);
        archived.is_archived = true;
        let challenges = vec![
            Challenge::restore(archived),
            Challenge::restore(challenge("b", 0, None, 2)),
        ];

        assert!(!has_active_streaks(&challenges));
    }

    #[test]
    fn test_yesterday_check_in_is_urgent() {
        let challenges = vec![Challenge::restore(challenge("a", 5, yesterday(), 1))];

        assert!(challenges[0].has_streak_expired(today()));
        let urgent = most_urgent_challenge(&challenges, today()).unwrap();
        assert_eq!(urgent.id().as_str(), "a");
    }

    #[test]
    fn test_most_urgent_picks_highest_streak() {
        let challenges = vec![
            Challenge::restore(challenge("three", 3, yesterday(), 1)),
            Challenge::restore(challenge("seven", 7, yesterday(), 2)),
        ];

        let urgent = most_urgent_challenge(&challenges, today()).unwrap();
        assert_eq!(urgent.streak_count(), 7);
        assert_eq!(urgent.id().as_str(), "seven");
    }

    #[test]
    fn test_most_urgent_excludes_archived_completed_and_done_today() {
        let mut archived = challenge("archived", 50, yesterday(), 1);
        archived.is_archived = true;
        let mut completed = challenge("completed", 99, yesterday(), 2);
        completed.is_completed = true;
        let done_today = challenge("today", 40, Some(today()), 3);
        let eligible = challenge("eligible", 2, yesterday(), 4);

        let challenges: Vec<Challenge> = [archived, completed, done_today, eligible]
            .into_iter()
            .map(Challenge::restore)
            .collect();

        let urgent = most_urgent_challenge(&challenges, today()).unwrap();
        assert_eq!(urgent.id().as_str(), "eligible");
    }

    #[test]
    fn test_most_urgent_tie_prefers_earliest_created() {
        let challenges = vec![
            Challenge::restore(challenge("newer", 6, yesterday(), 10)),
            Challenge::restore(challenge("older", 6, yesterday(), 3)),
        ];

        let urgent = most_urgent_challenge(&challenges, today()).unwrap();
        assert_eq!(urgent.id().as_str(), "older");
    }

    #[test]
    fn test_most_urgent_tie_same_creation_falls_back_to_id() {
        let challenges = vec![
            Challenge::restore(challenge("b", 6, yesterday(), 3)),
            Challenge::restore(challenge("a", 6, yesterday(), 3)),
        ];

        let urgent = most_urgent_challenge(&challenges, today()).unwrap();
        assert_eq!(urgent.id().as_str(), "a");
    }

    #[test]
    fn test_overview_counts() {
        let mut archived = challenge("archived", 1, None, 1);
        archived.is_archived = true;
        let mut completed = challenge("completed", 100, Some(today()), 2);
        completed.is_completed = true;
        let challenges: Vec<Challenge> = [
            archived,
            completed,
            challenge("today", 4, Some(today()), 3),
            challenge("risk", 8, yesterday(), 4),
        ]
        .into_iter()
        .map(Challenge::restore)
        .collect();

        let overview = StreakOverview::compute(&challenges, today());

        assert_eq!(overview.max_streak, 100);
        assert!(overview.has_active_streaks);
        assert_eq!(overview.active_count, 2);
        assert_eq!(overview.archived_count, 1);
        assert_eq!(overview.completed_count, 1);
        assert_eq!(overview.completed_today_count, 2);
        assert_eq!(overview.most_urgent.unwrap().challenge_id, "risk");
    }
}
