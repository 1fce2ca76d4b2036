// src/backend/storage/materials.rs
use crate::error::MaterialError;
use crate::models::material::{decode_record, encode_record, Material};
use crate::storage::kv_store::KeyValueStore;

const RECORD_KEY_PREFIX: &str = "material_";

/// Generates the store key of a material record: `material_<id>`.
pub fn record_key(id: &str) -> String {
    format!("{}{}", RECORD_KEY_PREFIX, id)
}

/// Reads and decodes a record. `NotFound` when absent, `ParseError` when unreadable.
pub async fn load_material<S: KeyValueStore + ?Sized>(store: &S, id: &str) -> Result<Material, MaterialError> {
    let bytes = store.get_data(&record_key(id)).await?;
    decode_record(id, &bytes)
}

/// Writes the full record of `material` under its key.
pub async fn save_material<S: KeyValueStore + ?Sized>(store: &S, material: &Material) -> Result<(), MaterialError> {
    let bytes = encode_record(material)?;
    store.set_data(&record_key(&material.id), bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::material::Lifecycle;
    use crate::storage::kv_store::StableKvStore;
    use ic_stable_structures::DefaultMemoryImpl;
    use tokio_test::block_on;

    #[test]
    fn records_live_under_prefixed_keys() {
        assert_eq!(record_key("1700000000000-k3j9x0a"), "material_1700000000000-k3j9x0a");
    }

    #[test]
    fn missing_record_is_not_found() {
        let store = StableKvStore::new(DefaultMemoryImpl::default());
        assert_eq!(
            block_on(load_material(&store, "nope")),
            Err(MaterialError::NotFound("nope".to_string()))
        );
    }

    #[test]
    fn saved_record_loads_back() {
        let store = StableKvStore::new(DefaultMemoryImpl::default());
        let material = Material {
            id: "1-a".to_string(),
            encrypted_data: "FHE-ENCRYPTED-MATERIAL-1-a".to_string(),
            timestamp: 42,
            owner: "owner".to_string(),
            difficulty: 2,
            lifecycle: Lifecycle::Ready,
        };
        block_on(save_material(&store, &material)).unwrap();
        assert_eq!(block_on(load_material(&store, "1-a")).unwrap(), material);
    }
}
