// src/backend/models/stats.rs
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Summary figures over a material listing.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct MaterialStats {
    pub total: u64,
    pub generating: u64,
    pub ready: u64,
    pub completed: u64,
    pub average_difficulty: f64,
    /// Average over scored materials only; 0 when none are scored.
    pub average_score: f64,
    /// Counts for difficulties 1..=5, in that order.
    pub difficulty_histogram: Vec<u64>,
}
