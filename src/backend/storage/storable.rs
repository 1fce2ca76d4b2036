// src/backend/storage/storable.rs
use ic_stable_structures::{storable::Bound, Storable};
use serde::{de::DeserializeOwned, Serialize};
use std::borrow::Cow;

/// CBOR-encoded wrapper that makes any serde type storable in a stable cell.
///
/// Decoding never traps: unreadable bytes (including the empty encoding produced
/// when serialization fails) fall back to `T::default()`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cbor<T>(pub T)
where
    T: Serialize + DeserializeOwned + Default;

impl<T> Storable for Cbor<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    fn to_bytes(&self) -> Cow<[u8]> {
        let mut writer = vec![];
        if let Err(e) = ciborium::ser::into_writer(&self.0, &mut writer) {
            tracing::error!("Failed to serialize value to CBOR for stable storage: {}", e);
            writer.clear();
        }
        Cow::Owned(writer)
    }

    fn from_bytes(bytes: Cow<[u8]>) -> Self {
        if bytes.is_empty() {
            return Cbor(T::default());
        }
        match ciborium::de::from_reader(bytes.as_ref()) {
            Ok(value) => Cbor(value),
            Err(e) => {
                tracing::error!("Failed to deserialize CBOR from stable storage: {}. Using default.", e);
                Cbor(T::default())
            }
        }
    }

    // Config and metrics cells are small but have no fixed size.
    const BOUND: Bound = Bound::Unbounded;
}
