mod scheduler;
mod sender;
mod value_objects;

pub use scheduler::ReminderScheduler;
pub use sender::{NotificationMessage, NotificationSender};
pub use value_objects::{AuthorizationStatus, Reminder, ReminderKind, ReminderTime};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::ChallengeId;
    use chrono::Utc;

    #[test]
    fn test_reminder_time_validation() {
        assert!(ReminderTime::new(20, 30).is_ok());
        assert!(ReminderTime::new(24, 0).is_err());
        assert!(ReminderTime::new(8, 60).is_err());
    }

    #[test]
    fn test_streak_risk_identifier_is_shared() {
        let a = ReminderKind::StreakRisk {
            challenge_id: ChallengeId::new(),
        };
        let b = ReminderKind::StreakRisk {
            challenge_id: ChallengeId::new(),
        };
        assert_eq!(a.identifier(), b.identifier());
        assert_ne!(a.identifier(), ReminderKind::Daily.identifier());
    }

    #[test]
    fn test_streak_risk_copy() {
        let reminder = Reminder::streak_risk(ChallengeId::new(), "Pushups", 12, Utc::now());
        assert_eq!(reminder.title, "Your 12-day streak is at risk");
        assert!(reminder.body.contains("Pushups"));
    }

    #[test]
    fn test_only_authorized_can_schedule() {
        assert!(AuthorizationStatus::Authorized.can_schedule());
        assert!(!AuthorizationStatus::Denied.can_schedule());
        assert!(!AuthorizationStatus::NotDetermined.can_schedule());
    }
}
