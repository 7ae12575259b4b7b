use serde::{Deserialize, Serialize};

use super::command_handler::Command;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimUsernameCommand {
    pub username: String,
}

impl Command for ClaimUsernameCommand {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimUsernameResult {
    /// Normalized (lowercase) name now held by the user
    pub username: String,
    /// False when the user already held this name
    pub changed: bool,
}
