use serde::{Deserialize, Serialize};
use url::Url;

use crate::challenge::CHALLENGE_LENGTH_DAYS;
use crate::shared::DomainError;

pub const NOTE_MAX_LEN: usize = 500;

/// Position of a check-in within its challenge (1..=100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayNumber(u32);

impl DayNumber {
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 || value > CHALLENGE_LENGTH_DAYS {
            return Err(DomainError::Validation(format!(
                "Day number must be between 1 and {}, got {}",
                CHALLENGE_LENGTH_DAYS, value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

/// Optional journal data attached to a check-in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckInDetails {
    pub note: Option<String>,
    pub quote_id: Option<String>,
    pub photo_url: Option<Url>,
}

impl CheckInDetails {
    pub fn new(
        note: Option<String>,
        quote_id: Option<String>,
        photo_url: Option<&str>,
    ) -> Result<Self, DomainError> {
        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        if let Some(note) = &note {
            if note.chars().count() > NOTE_MAX_LEN {
                return Err(DomainError::Validation(format!(
                    "Note cannot exceed {} characters",
                    NOTE_MAX_LEN
                )));
            }
        }

        let photo_url = match photo_url {
            Some(raw) => {
                let url = Url::parse(raw)
                    .map_err(|e| DomainError::InvalidInput(format!("Invalid photo URL: {}", e)))?;
                if url.scheme() != "https" {
                    return Err(DomainError::InvalidInput(
                        "Photo URL must use https".to_string(),
                    ));
                }
                Some(url)
            }
            None => None,
        };

        Ok(Self {
            note,
            quote_id: quote_id.filter(|q| !q.trim().is_empty()),
            photo_url,
        })
    }

    pub fn has_photo(&self) -> bool {
        self.photo_url.is_some()
    }
}
