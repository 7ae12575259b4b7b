use chrono::{Duration, NaiveDate};
use std::sync::Arc;

use super::*;
use crate::application::services::{SessionService, SubscriptionService};
use crate::application::test_support::*;
use hundred_days_domain::challenge::{Challenge, ChallengeRepository};
use hundred_days_domain::check_in::{CheckInDetails, CheckInDomainService, CheckInRepository};
use hundred_days_domain::events::EventBus;
use hundred_days_domain::session::{AuthSession, IdentityProviderKind, SessionRepository};
use hundred_days_domain::shared::{ChallengeId, Clock, DomainError, UserId};
use hundred_days_domain::subscription::{Entitlement, DEFAULT_PRODUCT_ID};
use hundred_days_domain::user::{UserProfile, UserRepository};

fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

/// Owner "uid-1" with three challenges, seen on 2025-04-01:
/// - "Run": checked in Mar 29..=31 (note on the 30th), streak 3, at risk
/// - "Write": checked in Mar 31, streak 1, at risk
/// - "Read": archived, streak 5
struct Fixture {
    challenges: Arc<InMemoryChallengeRepository>,
    check_ins: Arc<InMemoryCheckInRepository>,
    users: Arc<InMemoryUserRepository>,
    sessions: Arc<InMemorySessionRepository>,
    bus: Arc<RecordingEventBus>,
    clock: Arc<TestClock>,
    owner: UserId,
    run: ChallengeId,
    write: ChallengeId,
    read: ChallengeId,
}

impl Fixture {
    async fn new() -> Self {
        let clock = Arc::new(TestClock::on(day(4, 1)));
        let challenges = Arc::new(InMemoryChallengeRepository::new());
        let check_ins = Arc::new(InMemoryCheckInRepository::new(challenges.clone()));
        let users = Arc::new(InMemoryUserRepository::new());
        let sessions = Arc::new(InMemorySessionRepository::new());
        let owner = UserId::from_string("uid-1");

        users
            .save(&UserProfile::new(owner.clone(), "Ada", clock.now()).unwrap())
            .await
            .unwrap();

        let created = clock.now() - Duration::days(40);
        let mut run = Challenge::new(owner.clone(), "Run", false, created).unwrap();
        challenges.save(&run).await.unwrap();
        for (date, note) in [
            (day(3, 29), None),
            (day(3, 30), Some("Hills today".to_string())),
            (day(3, 31), None),
        ] {
            let details = CheckInDetails::new(note, None, None).unwrap();
            let record = CheckInDomainService::check_in(&mut run, details, date, clock.now())
                .unwrap()
                .unwrap();
            check_ins.record(&run, &record).await.unwrap();
        }

        let write = challenge_with_streak(
            &owner,
            "Write",
            1,
            Some(day(3, 31)),
            created + Duration::days(1),
        );
        challenges.save(&write).await.unwrap();

        let mut read = challenge_with_streak(
            &owner,
            "Read",
            5,
            Some(day(3, 20)),
            created + Duration::days(2),
        );
        read.archive(clock.now());
        challenges.save(&read).await.unwrap();

        Self {
            challenges,
            check_ins,
            users,
            sessions,
            bus: Arc::new(RecordingEventBus::new()),
            clock,
            owner,
            run: run.id().clone(),
            write: write.id().clone(),
            read: read.id().clone(),
        }
    }

    /// Session service for the owner; `signed_in = false` leaves it signed out
    async fn session(&self, signed_in: bool) -> Arc<SessionService> {
        if signed_in {
            self.sessions
                .save(
                    &AuthSession::new(
                        self.owner.clone(),
                        IdentityProviderKind::Google,
                        "credential".to_string(),
                        None,
                        self.clock.now() + Duration::days(7),
                        self.clock.now(),
                    )
                    .unwrap(),
                )
                .await
                .unwrap();
        }
        let session = Arc::new(SessionService::new(
            Arc::new(MockIdentity::new()),
            self.sessions.clone(),
            self.users.clone(),
            self.bus.clone(),
            self.clock.clone(),
        ));
        session.restore().await.unwrap();
        session
    }

    async fn subscription(&self, is_pro: bool) -> Arc<SubscriptionService> {
        let mut purchase = MockPurchase::new();
        purchase
            .expect_current_entitlement()
            .returning(move |product_id: &str| {
                Ok(Entitlement {
                    is_pro,
                    product_id: product_id.to_string(),
                    expires_at: None,
                })
            });
        let bus: Arc<dyn EventBus> = self.bus.clone();
        let subscription = Arc::new(SubscriptionService::new(
            Arc::new(purchase),
            bus,
            self.clock.clone(),
            DEFAULT_PRODUCT_ID,
        ));
        subscription.refresh().await.unwrap();
        subscription
    }

    async fn challenge_queries(&self) -> ChallengeQueryService {
        ChallengeQueryService::new(
            self.challenges.clone(),
            self.check_ins.clone(),
            self.session(true).await,
            self.clock.clone(),
        )
    }

    async fn progress_queries(&self, is_pro: bool) -> ChallengeProgressQueries {
        ChallengeProgressQueries::new(
            self.challenges.clone(),
            self.check_ins.clone(),
            self.session(true).await,
            self.subscription(is_pro).await,
        )
    }
}

#[tokio::test]
async fn test_list_active_and_archived() {
    let fx = Fixture::new().await;
    let queries = fx.challenge_queries().await;

    let active = queries.list_active().await.unwrap();
    let titles: Vec<&str> = active.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Run", "Write"]);
    assert!(active.iter().all(|c| c.has_streak_expired && !c.is_completed_today));
    assert_eq!(active[0].days_remaining, 97);
    assert_eq!(active[0].last_check_in_date.as_deref(), Some("2025-03-31"));

    let archived = queries.list_archived().await.unwrap();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].id, fx.read.to_string());
    assert!(archived[0].is_archived);
}

#[tokio::test]
async fn test_detail_includes_ordered_history() {
    let fx = Fixture::new().await;
    let queries = fx.challenge_queries().await;

    let detail = queries.get_detail(fx.run.as_str()).await.unwrap();
    assert_eq!(detail.challenge.streak_count, 3);

    let days: Vec<u32> = detail.check_ins.iter().map(|c| c.day_number).collect();
    assert_eq!(days, vec![1, 2, 3]);
    assert_eq!(detail.check_ins[1].date, "2025-03-30");
    assert_eq!(detail.check_ins[1].note.as_deref(), Some("Hills today"));
    assert!(detail.check_ins[0].note.is_none());

    let result = queries.get_detail("missing").await;
    assert!(matches!(result, Err(DomainError::ChallengeNotFound(_))));
}

#[tokio::test]
async fn test_reads_require_sign_in() {
    let fx = Fixture::new().await;
    let queries = ChallengeQueryService::new(
        fx.challenges.clone(),
        fx.check_ins.clone(),
        fx.session(false).await,
        fx.clock.clone(),
    );

    assert!(matches!(
        queries.list_active().await,
        Err(DomainError::Authentication(_))
    ));
}

#[tokio::test]
async fn test_dashboard_overview() {
    let fx = Fixture::new().await;
    let dashboard =
        DashboardQueryService::new(fx.challenges.clone(), fx.session(true).await, fx.clock.clone());

    let overview = dashboard.overview().await.unwrap();

    // Archived "Read" still holds the longest streak
    assert_eq!(overview.max_streak, 5);
    assert!(overview.has_active_streaks);
    assert_eq!(overview.active_count, 2);
    assert_eq!(overview.archived_count, 1);
    assert_eq!(overview.completed_today_count, 0);

    let urgent = overview.most_urgent.unwrap();
    assert_eq!(urgent.challenge_id, fx.run.to_string());
    assert_eq!(urgent.streak_count, 3);
    assert_ne!(urgent.challenge_id, fx.write.to_string());
}

#[tokio::test]
async fn test_calendar_requires_pro() {
    let fx = Fixture::new().await;
    let progress = fx.progress_queries(false).await;

    let result = progress.calendar(fx.run.as_str(), 2025, 3).await;
    assert!(matches!(result, Err(DomainError::EntitlementRequired(_))));
}

#[tokio::test]
async fn test_calendar_month_view() {
    let fx = Fixture::new().await;
    let progress = fx.progress_queries(true).await;

    let calendar = progress.calendar(fx.run.as_str(), 2025, 3).await.unwrap();
    assert_eq!(calendar.days.len(), 31);
    assert_eq!(calendar.month_stats.total_days, 31);
    assert_eq!(calendar.month_stats.checked_in_days, 3);
    assert!((calendar.month_stats.check_in_rate - 300.0 / 31.0).abs() < 1e-9);

    let the_30th = &calendar.days[29];
    assert_eq!(the_30th.date, "2025-03-30");
    assert!(the_30th.is_checked_in);
    assert_eq!(the_30th.day_number, Some(2));
    assert!(the_30th.has_note);
    assert!(!the_30th.has_photo);
    assert!(!calendar.days[0].is_checked_in);

    // Nothing logged in April yet
    let april = progress.calendar(fx.run.as_str(), 2025, 4).await.unwrap();
    assert_eq!(april.days.len(), 30);
    assert_eq!(april.month_stats.checked_in_days, 0);
}

#[tokio::test]
async fn test_calendar_rejects_bad_input() {
    let fx = Fixture::new().await;
    let progress = fx.progress_queries(true).await;

    assert!(matches!(
        progress.calendar(fx.run.as_str(), 2025, 13).await,
        Err(DomainError::Validation(_))
    ));
    assert!(matches!(
        progress.calendar("missing", 2025, 3).await,
        Err(DomainError::ChallengeNotFound(_))
    ));
}

#[tokio::test]
async fn test_user_profile() {
    let fx = Fixture::new().await;
    let queries = UserQueryService::new(fx.users.clone(), fx.session(true).await);

    let profile = queries.profile().await.unwrap();
    assert_eq!(profile.id, "uid-1");
    assert_eq!(profile.display_name, "Ada");
    assert!(profile.username.is_none());
}
