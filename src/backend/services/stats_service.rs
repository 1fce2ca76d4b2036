// src/backend/services/stats_service.rs
use crate::models::{common::*, Material, MaterialStats};

/// Summarizes a listing: counts per status, averages and a difficulty histogram.
pub fn compute_stats(materials: &[Material]) -> MaterialStats {
    let mut stats = MaterialStats {
        difficulty_histogram: vec![0; (MAX_DIFFICULTY - MIN_DIFFICULTY + 1) as usize],
        ..Default::default()
    };
    if materials.is_empty() {
        return stats;
    }

    let mut difficulty_sum = 0u64;
    let mut score_sum = 0u64;
    let mut scored = 0u64;
    for material in materials {
        stats.total += 1;
        match material.status() {
            MaterialStatus::Generating => stats.generating += 1,
            MaterialStatus::Ready => stats.ready += 1,
            MaterialStatus::Completed => stats.completed += 1,
        }
        difficulty_sum += u64::from(material.difficulty);
        if let Some(bucket) = stats
            .difficulty_histogram
            .get_mut(material.difficulty.saturating_sub(MIN_DIFFICULTY) as usize)
        {
            *bucket += 1;
        }
        if let Some(score) = material.score() {
            score_sum += u64::from(score);
            scored += 1;
        }
    }

    stats.average_difficulty = difficulty_sum as f64 / stats.total as f64;
    if scored > 0 {
        stats.average_score = score_sum as f64 / scored as f64;
    }
    stats
}
