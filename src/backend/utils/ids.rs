// src/backend/utils/ids.rs

use crate::models::common::MaterialId;
use crate::utils::rng::with_internal_rng;
use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 7;

/// Generates a material id of the form `<unix millis>-<7 base36 chars>`.
///
/// Unique within what the caller checks it against; global uniqueness is not
/// guaranteed.
pub fn generate_material_id(now_ms: u64) -> MaterialId {
    let suffix: String = with_internal_rng(|rng| {
        (0..SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect()
    });
    format!("{}-{}", now_ms, suffix)
}

/// Placeholder ciphertext handle stored as a material's data.
pub fn placeholder_ciphertext(id: &str) -> String {
    format!("FHE-ENCRYPTED-MATERIAL-{}", id)
}
