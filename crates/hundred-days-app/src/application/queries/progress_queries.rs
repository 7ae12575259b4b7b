use chrono::{Datelike, NaiveDate};
use log::info;
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::dtos::{CalendarDayDto, CheckInCalendarDto, MonthStatsDto};
use crate::application::services::{SessionService, SubscriptionService};
use hundred_days_domain::challenge::ChallengeRepository;
use hundred_days_domain::check_in::{CheckInRecord, CheckInRepository};
use hundred_days_domain::shared::{ChallengeId, DomainError};
use hundred_days_domain::subscription::Feature;

/// Month-by-month progress views (Pro)
pub struct ChallengeProgressQueries {
    challenge_repo: Arc<dyn ChallengeRepository>,
    check_in_repo: Arc<dyn CheckInRepository>,
    session: Arc<SessionService>,
    subscription: Arc<SubscriptionService>,
}

impl ChallengeProgressQueries {
    pub fn new(
        challenge_repo: Arc<dyn ChallengeRepository>,
        check_in_repo: Arc<dyn CheckInRepository>,
        session: Arc<SessionService>,
        subscription: Arc<SubscriptionService>,
    ) -> Self {
        Self {
            challenge_repo,
            check_in_repo,
            session,
            subscription,
        }
    }

    /// Check-in calendar of one challenge for a month
    pub async fn calendar(
        &self,
        challenge_id: &str,
        year: i32,
        month: u32,
    ) -> Result<CheckInCalendarDto, DomainError> {
        self.subscription.require(Feature::AdvancedAnalytics)?;
        let owner_id = self.session.require_user().await?;

        // Validate inputs
        if !(1..=12).contains(&month) {
            return Err(DomainError::Validation("Invalid month".to_string()));
        }

        let first_day = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| DomainError::Validation("Invalid date".to_string()))?;
        let first_day_next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let last_day = first_day_next_month
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| DomainError::Validation("Invalid date".to_string()))?;

        let id = ChallengeId::from_string(challenge_id);
        if self.challenge_repo.find_by_id(&owner_id, &id).await?.is_none() {
            return Err(DomainError::ChallengeNotFound(challenge_id.to_string()));
        }

        let records = self
            .check_in_repo
            .find_in_range(&id, first_day, last_day)
            .await?;
        let by_date: HashMap<NaiveDate, &CheckInRecord> =
            records.iter().map(|r| (r.date(), r)).collect();

        let total_days = last_day.day();
        let mut days = Vec::with_capacity(total_days as usize);
        for date in first_day.iter_days().take(total_days as usize) {
            let record = by_date.get(&date);
            days.push(CalendarDayDto {
                date: date.format("%Y-%m-%d").to_string(),
                is_checked_in: record.is_some(),
                day_number: record.map(|r| r.day_number().value()),
                has_note: record.is_some_and(|r| r.note().is_some()),
                has_photo: record.is_some_and(|r| r.photo_url().is_some()),
            });
        }

        let checked_in_days = by_date.len() as u32;
        let check_in_rate = (checked_in_days as f64 / total_days as f64) * 100.0;

        info!(
            "[streak] calendar challenge={} month={:04}-{:02} checked_days={} rate={:.2}%",
            challenge_id, year, month, checked_in_days, check_in_rate
        );

        Ok(CheckInCalendarDto {
            challenge_id: challenge_id.to_string(),
            year,
            month,
            days,
            month_stats: MonthStatsDto {
                total_days,
                checked_in_days,
                check_in_rate,
            },
        })
    }
}
