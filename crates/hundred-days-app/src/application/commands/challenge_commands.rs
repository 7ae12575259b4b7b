use serde::{Deserialize, Serialize};

use super::command_handler::Command;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChallengeCommand {
    pub title: String,
    pub is_timed: bool,
}

impl Command for CreateChallengeCommand {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChallengeResult {
    pub challenge_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameChallengeCommand {
    pub challenge_id: String,
    pub title: String,
}

impl Command for RenameChallengeCommand {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveChallengeCommand {
    pub challenge_id: String,
}

impl Command for ArchiveChallengeCommand {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnarchiveChallengeCommand {
    pub challenge_id: String,
}

impl Command for UnarchiveChallengeCommand {}

/// Deletion is permanent and takes the challenge's check-ins with it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteChallengeCommand {
    pub challenge_id: String,
    /// Must be true; set by the confirmation dialog
    pub confirmed: bool,
}

impl Command for DeleteChallengeCommand {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordCheckInCommand {
    pub challenge_id: String,
    pub note: Option<String>,
    pub quote_id: Option<String>,
    pub photo_url: Option<String>,
}

impl Command for RecordCheckInCommand {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordCheckInResult {
    pub challenge_id: String,
    pub day_number: u32,
    pub streak_count: u32,
    pub completed: bool,
    /// True when today was already logged and nothing was written
    pub already_checked_in: bool,
}
