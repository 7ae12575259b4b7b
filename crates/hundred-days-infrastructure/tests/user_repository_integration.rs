use chrono::Duration;
use std::sync::Arc;

use hundred_days_domain::shared::{DomainError, UserId};
use hundred_days_domain::user::{
    UserProfile, UserRepository, UserStats, Username, UsernameRepository, UsernameReservation,
};
use hundred_days_infrastructure::persistence::repositories::{
    SqliteUserRepository, SqliteUsernameRepository,
};

use test_helpers::{at, day};

#[tokio::test]
async fn user_repo_persists_profile_and_stats() {
    let (pool, _encryption) = test_helpers::setup_in_memory_db().await;
    let repo = SqliteUserRepository::new(Arc::new(pool));
    let now = at(day(2026, 4, 1));

    let mut profile = UserProfile::new(UserId::from_string("uid-1"), "Sam", now).unwrap();
    profile.update_stats(
        UserStats {
            total_check_ins: 12,
            longest_streak: 9,
            current_best_streak: 4,
            active_challenges: 2,
            completed_challenges: 0,
        },
        now,
    );
    repo.save(&profile).await.expect("save");

    let fetched = repo
        .find_by_id(profile.id())
        .await
        .expect("find")
        .expect("exists");
    assert_eq!(fetched.display_name(), "Sam");
    assert_eq!(fetched.stats().longest_streak, 9);
    assert!(fetched.username().is_none());

    assert!(repo
        .find_by_id(&UserId::from_string("missing"))
        .await
        .expect("find")
        .is_none());
}

#[tokio::test]
async fn username_claim_reserves_and_releases_atomically() {
    let (pool, _encryption) = test_helpers::setup_in_memory_db().await;
    let pool = Arc::new(pool);
    let users = SqliteUserRepository::new(pool.clone());
    let usernames = SqliteUsernameRepository::new(pool.clone());
    let now = at(day(2026, 4, 1));
    let uid = UserId::from_string("uid-1");

    let mut profile = UserProfile::new(uid.clone(), "Sam", now).unwrap();
    let first = Username::parse("Sam_Runs").unwrap();
    profile.set_username(first.clone(), now);
    usernames
        .claim(
            &UsernameReservation::new(first.clone(), uid.clone(), now),
            None,
            &profile,
        )
        .await
        .expect("first claim");

    let reservation = usernames.find(&first).await.expect("find").expect("held");
    assert_eq!(reservation.owner_id, uid);
    assert_eq!(reservation.username.as_str(), "sam_runs");

    let later = now + Duration::hours(49);
    let second = Username::parse("sam_reads").unwrap();
    profile.set_username(second.clone(), later);
    usernames
        .claim(
            &UsernameReservation::new(second.clone(), uid.clone(), later),
            Some(&first),
            &profile,
        )
        .await
        .expect("second claim");

    assert!(usernames.find(&first).await.expect("find").is_none());
    assert!(usernames.find(&second).await.expect("find").is_some());

    let stored = users.find_by_id(&uid).await.expect("find").expect("exists");
    assert_eq!(stored.username().map(|u| u.as_str()), Some("sam_reads"));
}

#[tokio::test]
async fn username_claim_collision_is_taken_and_rolls_back() {
    let (pool, _encryption) = test_helpers::setup_in_memory_db().await;
    let pool = Arc::new(pool);
    let users = SqliteUserRepository::new(pool.clone());
    let usernames = SqliteUsernameRepository::new(pool.clone());
    let now = at(day(2026, 4, 1));
    let name = Username::parse("streaker").unwrap();

    let alice = UserId::from_string("uid-alice");
    let mut alice_profile = UserProfile::new(alice.clone(), "Alice", now).unwrap();
    alice_profile.set_username(name.clone(), now);
    usernames
        .claim(
            &UsernameReservation::new(name.clone(), alice.clone(), now),
            None,
            &alice_profile,
        )
        .await
        .expect("alice claims");

    let bob = UserId::from_string("uid-bob");
    users
        .save(&UserProfile::new(bob.clone(), "Bob", now).unwrap())
        .await
        .expect("save bob");
    let mut bob_profile = UserProfile::new(bob.clone(), "Bob", now).unwrap();
    bob_profile.set_username(name.clone(), now);

    let result = usernames
        .claim(
            &UsernameReservation::new(name.clone(), bob.clone(), now),
            None,
            &bob_profile,
        )
        .await;

    assert!(matches!(result, Err(DomainError::UsernameTaken(_))));
    let bob_stored = users.find_by_id(&bob).await.expect("find").expect("exists");
    assert!(bob_stored.username().is_none());
    assert_eq!(
        usernames.find(&name).await.expect("find").unwrap().owner_id,
        alice
    );
}
