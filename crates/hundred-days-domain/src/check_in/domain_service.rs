use chrono::{DateTime, NaiveDate, Utc};

use super::record::CheckInRecord;
use super::value_objects::CheckInDetails;
use crate::challenge::{Challenge, CheckInOutcome};
use crate::shared::DomainError;

/// Domain service for check-in business rules
/// Contains pure domain logic without infrastructure dependencies
pub struct CheckInDomainService;

impl CheckInDomainService {
    /// Validate if the challenge can accept a check-in today
    pub fn can_check_in(challenge: &Challenge, today: NaiveDate) -> Result<(), DomainError> {
        if challenge.is_archived() {
            return Err(DomainError::CheckInRejected(
                "Challenge is archived and cannot be checked in".to_string(),
            ));
        }

        if challenge.is_completed() {
            return Err(DomainError::CheckInRejected(
                "Challenge is already complete".to_string(),
            ));
        }

        if let Some(last) = challenge.last_check_in_date() {
            if last > today {
                return Err(DomainError::CheckInRejected(format!(
                    "Last check-in ({}) is after today ({})",
                    last, today
                )));
            }
        }

        Ok(())
    }

    /// Apply today's check-in and build the record to persist.
    ///
    /// Returns `None` when today was already logged.
    pub fn check_in(
        challenge: &mut Challenge,
        details: CheckInDetails,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Option<CheckInRecord>, DomainError> {
        Self::can_check_in(challenge, today)?;

        match challenge.record_check_in(today, now)? {
            CheckInOutcome::Recorded { day_number, .. } => Ok(Some(CheckInRecord::new(
                challenge.id().clone(),
                day_number,
                today,
                details,
                now,
            ))),
            CheckInOutcome::AlreadyCheckedIn => Ok(None),
        }
    }
}
