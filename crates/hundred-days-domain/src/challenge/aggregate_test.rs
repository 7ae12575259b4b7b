#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::shared::{ChallengeId, DomainError, UserId};
    use chrono::{DateTime, Duration, NaiveDate, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(date: NaiveDate) -> DateTime<Utc> {
        date.and_hms_opt(12, 0, 0).unwrap().and_utc()
    }

    fn create_challenge() -> Challenge {
        Challenge::new(
            UserId::from_string("uid-1"),
            "Read 10 pages",
            false,
            at(day(2025, 3, 1)),
        )
        .unwrap()
    }

    fn challenge_with(streak: u32, total: u32, last: Option<NaiveDate>) -> Challenge {
        Challenge::restore(ChallengeSnapshot {
            id: ChallengeId::new(),
            owner_id: UserId::from_string("uid-1"),
            title: "Run".to_string(),
            is_timed: false,
            streak_count: streak,
            total_check_ins: total,
            is_archived: false,
            is_completed: false,
            last_check_in_date: last,
            created_at: at(day(2025, 1, 1)),
            last_modified: at(day(2025, 1, 1)),
        })
    }

    #[test]
    fn test_create_challenge() {
        let challenge = create_challenge();

        assert_eq!(challenge.title(), "Read 10 pages");
        assert_eq!(challenge.streak_count(), 0);
        assert_eq!(challenge.days_remaining(), 100);
        assert!(!challenge.is_archived());
        assert!(!challenge.is_completed());
        assert!(challenge.is_active());
    }

    #[test]
    fn test_create_challenge_trims_title() {
        let challenge =
            Challenge::new(UserId::new(), "  Meditate  ", true, Utc::now()).unwrap();
        assert_eq!(challenge.title(), "Meditate");
        assert!(challenge.is_timed());
    }

    #[test]
    fn test_empty_title_rejected() {
        let result = Challenge::new(UserId::new(), "   ", false, Utc::now());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_overlong_title_rejected() {
        let title = "x".repeat(TITLE_MAX_LEN + 1);
        let result = Challenge::new(UserId::new(), &title, false, Utc::now());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_first_check_in_starts_streak() {
        let mut challenge = create_challenge();
        let today = day(2025, 3, 2);

        let outcome = challenge.record_check_in(today, at(today)).unwrap();

        match outcome {
            CheckInOutcome::Recorded {
                day_number,
                streak_count,
                completed,
            } => {
                assert_eq!(day_number.value(), 1);
                assert_eq!(streak_count, 1);
                assert!(!completed);
            }
            CheckInOutcome::AlreadyCheckedIn => panic!("Expected a recorded check-in"),
        }
        assert!(challenge.is_completed_today(today));
        assert_eq!(challenge.last_modified(), at(today));
    }

    #[test]
    fn test_same_day_check_in_is_idempotent() {
        let today = day(2025, 3, 10);
        let mut challenge = challenge_with(4, 4, Some(today));
        let before = challenge.last_modified();

        let outcome = challenge.record_check_in(today, at(today)).unwrap();

        assert_eq!(outcome, CheckInOutcome::AlreadyCheckedIn);
        assert_eq!(challenge.streak_count(), 4);
        assert_eq!(challenge.total_check_ins(), 4);
        assert_eq!(challenge.last_modified(), before);
    }

    #[test]
    fn test_next_day_check_in_increments_streak() {
        let today = day(2025, 3, 10);
        let mut challenge = challenge_with(4, 9, Some(today - Duration::days(1)));

        challenge.record_check_in(today, at(today)).unwrap();

        assert_eq!(challenge.streak_count(), 5);
        assert_eq!(challenge.total_check_ins(), 10);
    }

    #[test]
    fn test_gap_resets_streak_to_one() {
        let today = day(2025, 3, 10);
        let mut challenge = challenge_with(12, 12, Some(today - Duration::days(2)));

        challenge.record_check_in(today, at(today)).unwrap();

        assert_eq!(challenge.streak_count(), 1);
        assert_eq!(challenge.total_check_ins(), 13);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let mut challenge = challenge_with(3, 3, Some(day(2025, 2, 28)));
        let today = day(2025, 3, 1);

        challenge.record_check_in(today, at(today)).unwrap();

        assert_eq!(challenge.streak_count(), 4);
    }

    #[test]
    fn test_back_dated_check_in_rejected() {
        let today = day(2025, 3, 10);
        let mut challenge = challenge_with(2, 2, Some(today));

        let result = challenge.record_check_in(today - Duration::days(3), at(today));

        assert!(matches!(result, Err(DomainError::CheckInRejected(_))));
        assert_eq!(challenge.streak_count(), 2);
    }

    #[test]
    fn test_archived_challenge_rejects_check_in() {
        let mut challenge = create_challenge();
        challenge.archive(Utc::now());

        let today = day(2025, 3, 2);
        let result = challenge.record_check_in(today, at(today));

        assert!(matches!(result, Err(DomainError::CheckInRejected(_))));
    }

    #[test]
    fn test_hundredth_day_completes_challenge() {
        let today = day(2025, 6, 1);
        let mut challenge = challenge_with(99, 99, Some(today - Duration::days(1)));

        let outcome = challenge.record_check_in(today, at(today)).unwrap();

        assert!(matches!(
            outcome,
            CheckInOutcome::Recorded {
                completed: true,
                ..
            }
        ));
        assert!(challenge.is_completed());
        assert!(!challenge.is_active());
        assert_eq!(challenge.days_remaining(), 0);

        let tomorrow = today + Duration::days(1);
        let result = challenge.record_check_in(tomorrow, at(tomorrow));
        assert!(matches!(result, Err(DomainError::CheckInRejected(_))));
        assert_eq!(challenge.total_check_ins(), CHALLENGE_LENGTH_DAYS);
    }

    #[test]
    fn test_streak_expiry_window() {
        let today = day(2025, 3, 10);

        let never = challenge_with(0, 0, None);
        assert!(!never.has_streak_expired(today));

        let done_today = challenge_with(5, 5, Some(today));
        assert!(!done_today.has_streak_expired(today));

        let yesterday = challenge_with(5, 5, Some(today - Duration::days(1)));
        assert!(yesterday.has_streak_expired(today));
        assert!(!yesterday.is_completed_today(today));
    }

    #[test]
    fn test_archive_and_unarchive_touch_last_modified() {
        let mut challenge = create_challenge();
        let later = challenge.created_at() + Duration::hours(5);

        challenge.archive(later);
        assert!(challenge.is_archived());
        assert_eq!(challenge.last_modified(), later);

        let even_later = later + Duration::hours(1);
        challenge.unarchive(even_later);
        assert!(!challenge.is_archived());
        assert_eq!(challenge.last_modified(), even_later);
    }

    #[test]
    fn test_rename() {
        let mut challenge = create_challenge();
        challenge.rename("Read 20 pages", Utc::now()).unwrap();
        assert_eq!(challenge.title(), "Read 20 pages");

        assert!(challenge.rename("", Utc::now()).is_err());
        assert_eq!(challenge.title(), "Read 20 pages");
    }
}
