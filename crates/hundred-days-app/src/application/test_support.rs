//! In-memory fakes and mocks shared by the application tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{Mutex, RwLock};

use hundred_days_domain::challenge::{Challenge, ChallengeRepository, ChallengeSnapshot};
use hundred_days_domain::check_in::{CheckInRecord, CheckInRepository, CheckInWrite};
use hundred_days_domain::events::{DomainEvent, EventBus};
use hundred_days_domain::notification::{
    AuthorizationStatus, Reminder, ReminderKind, ReminderScheduler,
};
use hundred_days_domain::session::{
    AuthSession, IdentityProvider, IdentityProviderKind, SessionRepository,
};
use hundred_days_domain::shared::{ChallengeId, Clock, DomainError, UserId};
use hundred_days_domain::subscription::{Entitlement, PurchaseProvider};
use hundred_days_domain::user::{
    UserProfile, UserRepository, Username, UsernameRepository, UsernameReservation,
};

mockall::mock! {
    pub Purchase {}

    #[async_trait]
    impl PurchaseProvider for Purchase {
        async fn purchase(&self, product_id: &str) -> Result<Entitlement, DomainError>;
        async fn restore(&self, product_id: &str) -> Result<Entitlement, DomainError>;
        async fn current_entitlement(&self, product_id: &str) -> Result<Entitlement, DomainError>;
    }
}

mockall::mock! {
    pub Identity {}

    #[async_trait]
    impl IdentityProvider for Identity {
        async fn exchange(
            &self,
            provider: IdentityProviderKind,
            provider_token: &str,
        ) -> Result<AuthSession, DomainError>;
    }
}

mockall::mock! {
    pub Scheduler {}

    #[async_trait]
    impl ReminderScheduler for Scheduler {
        async fn authorization_status(&self) -> Result<AuthorizationStatus, DomainError>;
        async fn schedule(&self, reminder: Reminder) -> Result<(), DomainError>;
        async fn cancel(&self, kind: &ReminderKind) -> Result<(), DomainError>;
        async fn cancel_all(&self) -> Result<(), DomainError>;
        async fn pending(&self) -> Result<Vec<Reminder>, DomainError>;
    }
}

/// Clock that tests can move forward
pub struct TestClock {
    now: StdMutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: StdMutex::new(now),
        }
    }

    /// Noon UTC on `day`
    pub fn on(day: NaiveDate) -> Self {
        Self::at(day.and_hms_opt(12, 0, 0).unwrap().and_utc())
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Event bus that only records what was published
pub struct RecordingEventBus {
    events: Mutex<Vec<&'static str>>,
}

impl RecordingEventBus {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub async fn count(&self) -> usize {
        self.events.lock().await.len()
    }

    /// Number of published events of type `E`
    pub async fn count_of<E: 'static>(&self) -> usize {
        let name = std::any::type_name::<E>();
        self.events
            .lock()
            .await
            .iter()
            .filter(|published| **published == name)
            .count()
    }
}

#[async_trait]
impl EventBus for RecordingEventBus {
    async fn publish(&self, event: Box<dyn DomainEvent>) -> Result<(), DomainError> {
        self.events.lock().await.push(event.event_type_name());
        Ok(())
    }
}

pub fn challenge_with_streak(
    owner: &UserId,
    title: &str,
    streak: u32,
    last_check_in: Option<NaiveDate>,
    created_at: DateTime<Utc>,
) -> Challenge {
    Challenge::restore(ChallengeSnapshot {
        id: ChallengeId::new(),
        owner_id: owner.clone(),
        title: title.to_string(),
        is_timed: false,
        streak_count: streak,
        total_check_ins: streak,
        is_archived: false,
        is_completed: false,
        last_check_in_date: last_check_in,
        created_at,
        last_modified: created_at,
    })
}

/// `base` with its metadata replaced
fn merge(
    base: &Challenge,
    title: &str,
    is_archived: bool,
    last_modified: DateTime<Utc>,
) -> Challenge {
    Challenge::restore(ChallengeSnapshot {
        id: base.id().clone(),
        owner_id: base.owner_id().clone(),
        title: title.to_string(),
        is_timed: base.is_timed(),
        streak_count: base.streak_count(),
        total_check_ins: base.total_check_ins(),
        is_archived,
        is_completed: base.is_completed(),
        last_check_in_date: base.last_check_in_date(),
        created_at: base.created_at(),
        last_modified,
    })
}

pub struct InMemoryChallengeRepository {
    challenges: RwLock<HashMap<ChallengeId, Challenge>>,
}

impl InMemoryChallengeRepository {
    pub fn new() -> Self {
        Self {
            challenges: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, id: &ChallengeId) -> Option<Challenge> {
        self.challenges.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.challenges.read().await.len()
    }
}

#[async_trait]
impl ChallengeRepository for InMemoryChallengeRepository {
    async fn save(&self, challenge: &Challenge) -> Result<(), DomainError> {
        let mut challenges = self.challenges.write().await;
        if let Some(existing) = challenges.get(challenge.id()) {
            if existing.owner_id() != challenge.owner_id() {
                return Err(DomainError::ChallengeNotFound(challenge.id().to_string()));
            }
        }
        challenges.insert(challenge.id().clone(), challenge.clone());
        Ok(())
    }

    async fn update_metadata(&self, challenge: &Challenge) -> Result<(), DomainError> {
        let mut challenges = self.challenges.write().await;
        let stored = challenges
            .get(challenge.id())
            .filter(|c| c.owner_id() == challenge.owner_id())
            .ok_or_else(|| DomainError::ChallengeNotFound(challenge.id().to_string()))?;
        let merged = merge(
            stored,
            challenge.title(),
            challenge.is_archived(),
            challenge.last_modified(),
        );
        challenges.insert(challenge.id().clone(), merged);
        Ok(())
    }

    async fn find_by_id(
        &self,
        owner_id: &UserId,
        id: &ChallengeId,
    ) -> Result<Option<Challenge>, DomainError> {
        Ok(self
            .challenges
            .read()
            .await
            .get(id)
            .filter(|c| c.owner_id() == owner_id)
            .cloned())
    }

    async fn find_all_by_owner(&self, owner_id: &UserId) -> Result<Vec<Challenge>, DomainError> {
        let mut owned: Vec<Challenge> = self
            .challenges
            .read()
            .await
            .values()
            .filter(|c| c.owner_id() == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(owned)
    }

    async fn count_active(&self, owner_id: &UserId) -> Result<u32, DomainError> {
        Ok(self
            .challenges
            .read()
            .await
            .values()
            .filter(|c| c.owner_id() == owner_id && c.is_active())
            .count() as u32)
    }

    async fn delete(&self, owner_id: &UserId, id: &ChallengeId) -> Result<(), DomainError> {
        let mut challenges = self.challenges.write().await;
        match challenges.get(id) {
            Some(c) if c.owner_id() == owner_id => {
                challenges.remove(id);
                Ok(())
            }
            _ => Err(DomainError::ChallengeNotFound(id.to_string())),
        }
    }
}

/// Check-in store that writes the mutated challenge into the shared
/// challenge fake, mirroring the transactional SQLite repository
pub struct InMemoryCheckInRepository {
    challenges: Arc<InMemoryChallengeRepository>,
    records: RwLock<Vec<CheckInRecord>>,
}

impl InMemoryCheckInRepository {
    pub fn new(challenges: Arc<InMemoryChallengeRepository>) -> Self {
        Self {
            challenges,
            records: RwLock::new(Vec::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl CheckInRepository for InMemoryCheckInRepository {
    async fn record(
        &self,
        challenge: &Challenge,
        record: &CheckInRecord,
    ) -> Result<CheckInWrite, DomainError> {
        let mut records = self.records.write().await;
        let same_challenge = || {
            records
                .iter()
                .filter(|r| r.challenge_id() == record.challenge_id())
        };
        if same_challenge().any(|r| r.date() == record.date()) {
            return Ok(CheckInWrite::AlreadyRecorded);
        }
        if same_challenge().any(|r| r.day_number() == record.day_number()) {
            return Err(DomainError::Conflict(format!(
                "Day {} already recorded",
                record.day_number().value()
            )));
        }

        let stored = self
            .challenges
            .find_by_id(challenge.owner_id(), challenge.id())
            .await?
            .ok_or_else(|| DomainError::ChallengeNotFound(challenge.id().to_string()))?;
        if stored.total_check_ins() + 1 != challenge.total_check_ins() {
            return Err(DomainError::Conflict(format!(
                "Challenge {} changed while checking in",
                challenge.id()
            )));
        }

        // Counters come from the caller, metadata stays as stored
        let merged = merge(
            challenge,
            stored.title(),
            stored.is_archived(),
            challenge.last_modified(),
        );
        self.challenges
            .challenges
            .write()
            .await
            .insert(merged.id().clone(), merged);
        records.push(record.clone());
        Ok(CheckInWrite::Recorded)
    }

    async fn find_by_challenge(
        &self,
        challenge_id: &ChallengeId,
    ) -> Result<Vec<CheckInRecord>, DomainError> {
        let mut found: Vec<CheckInRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.challenge_id() == challenge_id)
            .cloned()
            .collect();
        found.sort_by_key(|r| r.day_number());
        Ok(found)
    }

    async fn find_by_challenge_on(
        &self,
        challenge_id: &ChallengeId,
        date: NaiveDate,
    ) -> Result<Option<CheckInRecord>, DomainError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.challenge_id() == challenge_id && r.date() == date)
            .cloned())
    }

    async fn find_in_range(
        &self,
        challenge_id: &ChallengeId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CheckInRecord>, DomainError> {
        let mut found: Vec<CheckInRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.challenge_id() == challenge_id && r.date() >= start && r.date() <= end)
            .cloned()
            .collect();
        found.sort_by_key(|r| r.date());
        Ok(found)
    }

    async fn count_by_owner(&self, owner_id: &UserId) -> Result<u32, DomainError> {
        let owned: Vec<ChallengeId> = self
            .challenges
            .find_all_by_owner(owner_id)
            .await?
            .into_iter()
            .map(|c| c.id().clone())
            .collect();
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| owned.contains(r.challenge_id()))
            .count() as u32)
    }
}

pub struct InMemoryUserRepository {
    profiles: RwLock<HashMap<UserId, UserProfile>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, profile: &UserProfile) -> Result<(), DomainError> {
        self.profiles
            .write()
            .await
            .insert(profile.id().clone(), profile.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.profiles.read().await.get(id).cloned())
    }
}

pub struct InMemoryUsernameRepository {
    users: Arc<InMemoryUserRepository>,
    reservations: RwLock<HashMap<String, UsernameReservation>>,
}

impl InMemoryUsernameRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            users,
            reservations: RwLock::new(HashMap::new()),
        }
    }

    pub async fn owner_of(&self, username: &str) -> Option<UserId> {
        self.reservations
            .read()
            .await
            .get(username)
            .map(|r| r.owner_id.clone())
    }
}

#[async_trait]
impl UsernameRepository for InMemoryUsernameRepository {
    async fn find(&self, username: &Username) -> Result<Option<UsernameReservation>, DomainError> {
        Ok(self.reservations.read().await.get(username.as_str()).cloned())
    }

    async fn claim(
        &self,
        reservation: &UsernameReservation,
        previous: Option<&Username>,
        profile: &UserProfile,
    ) -> Result<(), DomainError> {
        let mut reservations = self.reservations.write().await;
        if reservations.contains_key(reservation.username.as_str()) {
            return Err(DomainError::UsernameTaken(reservation.username.to_string()));
        }
        if let Some(previous) = previous {
            reservations.remove(previous.as_str());
        }
        reservations.insert(
            reservation.username.as_str().to_string(),
            reservation.clone(),
        );
        self.users.save(profile).await
    }
}

pub struct InMemorySessionRepository {
    session: RwLock<Option<AuthSession>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            session: RwLock::new(None),
        }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn save(&self, session: &AuthSession) -> Result<(), DomainError> {
        *self.session.write().await = Some(session.clone());
        Ok(())
    }

    async fn current(&self) -> Result<Option<AuthSession>, DomainError> {
        Ok(self.session.read().await.clone())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        *self.session.write().await = None;
        Ok(())
    }
}
