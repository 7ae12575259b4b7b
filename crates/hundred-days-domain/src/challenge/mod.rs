mod aggregate;
mod repository;

#[cfg(test)]
mod aggregate_test;

pub use aggregate::{
    Challenge, ChallengeSnapshot, CheckInOutcome, CHALLENGE_LENGTH_DAYS, TITLE_MAX_LEN,
};
pub use repository::ChallengeRepository;
