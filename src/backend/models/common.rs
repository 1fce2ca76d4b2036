// src/backend/models/common.rs
use candid::CandidType;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type MaterialId = String; // "<unix millis>-<base36 suffix>", used verbatim in record keys
pub type OwnerId = String; // Caller principal in text form
pub type Timestamp = u64; // Epoch seconds
pub type TimestampNs = u64; // Nanoseconds since epoch
pub type Difficulty = u8;
pub type Score = u8;

pub const MIN_DIFFICULTY: Difficulty = 1;
pub const MAX_DIFFICULTY: Difficulty = 5;
/// Used when a stored record carries no difficulty (or a zero one).
pub const DEFAULT_DIFFICULTY: Difficulty = 3;

pub const MIN_SCORE: Score = 60;
pub const MAX_SCORE: Score = 100;

/// Wire-level status of a material, serialized in lowercase inside records.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MaterialStatus {
    Generating, // Initial state upon creation, processing is simulated
    Ready,      // Entered automatically after the ready delay
    Completed,  // Entered only through an explicit user action; terminal
}

impl Default for MaterialStatus {
    fn default() -> Self {
        MaterialStatus::Generating
    }
}

impl fmt::Display for MaterialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MaterialStatus::Generating => "generating",
            MaterialStatus::Ready => "ready",
            MaterialStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

pub fn is_valid_difficulty(difficulty: Difficulty) -> bool {
    (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty)
}

pub fn is_valid_score(score: Score) -> bool {
    (MIN_SCORE..=MAX_SCORE).contains(&score)
}
