// src/backend/utils/rng.rs

use crate::error::MaterialError;
use ic_cdk::api::management_canister::main::raw_rand;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use std::cell::RefCell;

thread_local! {
    // Drives id suffixes, default difficulties and scores.
    static INTERNAL_RNG: RefCell<Option<ChaCha8Rng>> = RefCell::new(None);
}

// The IC offers no OS entropy, so anything reaching for getrandom fails loudly
// instead of silently producing predictable bytes.
#[cfg(target_arch = "wasm32")]
fn unsupported_getrandom(_buf: &mut [u8]) -> Result<(), getrandom::Error> {
    Err(getrandom::Error::UNSUPPORTED)
}

#[cfg(target_arch = "wasm32")]
getrandom::register_custom_getrandom!(unsupported_getrandom);

/// Seeds the thread-local ChaCha8Rng using raw_rand from the IC.
/// Should be called (from a timer) after canister init and post_upgrade.
pub async fn initialize_internal_rng() -> Result<(), MaterialError> {
    let (bytes,) = raw_rand()
        .await
        .map_err(|(code, msg)| MaterialError::InternalError(format!("raw_rand failed: {:?} {}", code, msg)))?;
    let seed: [u8; 32] = bytes
        .get(..32)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| MaterialError::InternalError("raw_rand returned insufficient bytes for seed".to_string()))?;
    seed_internal_rng(seed);
    tracing::info!("Internal RNG initialized successfully.");
    Ok(())
}

/// Replaces the internal RNG with one built from `seed`.
pub fn seed_internal_rng(seed: [u8; 32]) {
    INTERNAL_RNG.with(|rng| {
        *rng.borrow_mut() = Some(ChaCha8Rng::from_seed(seed));
    });
}

/// Borrows the internal RNG.
///
/// Until `raw_rand` entropy arrives the generator is seeded from the current
/// time, which is good enough for ids and simulated scores.
pub fn with_internal_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut ChaCha8Rng) -> R,
{
    INTERNAL_RNG.with(|rng| {
        let mut borrowed = rng.borrow_mut();
        let instance = borrowed.get_or_insert_with(|| {
            tracing::warn!("Internal RNG used before initialization; seeding from time");
            ChaCha8Rng::seed_from_u64(crate::utils::time::get_current_time_ns())
        });
        f(instance)
    })
}
