// src/backend/utils/time.rs
use crate::models::common::{Timestamp, TimestampNs};

/// Current time as nanoseconds since epoch.
/// Inside a canister this is the IC's block time.
#[cfg(target_arch = "wasm32")]
pub fn get_current_time_ns() -> TimestampNs {
    ic_cdk::api::time()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn get_current_time_ns() -> TimestampNs {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as TimestampNs)
        .unwrap_or(0)
}

pub fn get_current_time_ms() -> u64 {
    get_current_time_ns() / 1_000_000
}

pub fn get_current_time_secs() -> Timestamp {
    get_current_time_ns() / 1_000_000_000
}
