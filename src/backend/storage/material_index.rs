// src/backend/storage/material_index.rs
use crate::error::MaterialError;
use crate::models::common::MaterialId;
use crate::storage::kv_store::KeyValueStore;

/// Store key of the material index.
pub const INDEX_KEY: &str = "material_keys";
/// Store key of the pending-create journal.
pub const PENDING_KEY: &str = "material_pending_keys";

/// Decodes a JSON array of ids. Absent, empty or unparsable bytes read as no ids.
fn decode_ids(key: &str, bytes: &[u8]) -> Vec<MaterialId> {
    if bytes.is_empty() {
        return Vec::new();
    }
    match serde_json::from_slice::<Vec<MaterialId>>(bytes) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!("Error parsing {}: {}. Treating it as empty.", key, e);
            Vec::new()
        }
    }
}

fn encode_ids(key: &str, ids: &[MaterialId]) -> Result<Vec<u8>, MaterialError> {
    serde_json::to_vec(ids)
        .map_err(|e| MaterialError::InternalError(format!("Failed to serialize {}: {}", key, e)))
}

/// Append-only log of every known material id, oldest first.
///
/// The whole log is rewritten on every append; concurrent writers follow a
/// last-writer-wins policy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterialIndex {
    ids: Vec<MaterialId>,
}

impl MaterialIndex {
    pub fn decode(bytes: &[u8]) -> Self {
        Self {
            ids: decode_ids(INDEX_KEY, bytes),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, MaterialError> {
        encode_ids(INDEX_KEY, &self.ids)
    }

    pub fn ids(&self) -> &[MaterialId] {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|known| known == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Appends `id` unless it is already indexed. Returns whether it was added.
    pub fn append(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }
}

/// Ids whose create started but has not been confirmed in the index yet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingJournal {
    ids: Vec<MaterialId>,
}

impl PendingJournal {
    pub fn decode(bytes: &[u8]) -> Self {
        Self {
            ids: decode_ids(PENDING_KEY, bytes),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, MaterialError> {
        encode_ids(PENDING_KEY, &self.ids)
    }

    pub fn ids(&self) -> &[MaterialId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn add(&mut self, id: &str) -> bool {
        if self.ids.iter().any(|known| known == id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|known| known != id);
        self.ids.len() != before
    }
}

pub async fn load_index<S: KeyValueStore + ?Sized>(store: &S) -> Result<MaterialIndex, MaterialError> {
    let bytes = store.get_data(INDEX_KEY).await?;
    Ok(MaterialIndex::decode(&bytes))
}

pub async fn save_index<S: KeyValueStore + ?Sized>(store: &S, index: &MaterialIndex) -> Result<(), MaterialError> {
    store.set_data(INDEX_KEY, index.encode()?).await
}

/// Re-reads the index right before rewriting it so that appends made by other
/// writers since our last read are kept.
pub async fn append_to_index<S: KeyValueStore + ?Sized>(store: &S, id: &str) -> Result<MaterialIndex, MaterialError> {
    let mut index = load_index(store).await?;
    if index.append(id) {
        save_index(store, &index).await?;
        tracing::info!("Indexed material {} ({} total)", id, index.len());
    } else {
        tracing::debug!("Material {} already indexed", id);
    }
    Ok(index)
}

pub async fn load_journal<S: KeyValueStore + ?Sized>(store: &S) -> Result<PendingJournal, MaterialError> {
    let bytes = store.get_data(PENDING_KEY).await?;
    Ok(PendingJournal::decode(&bytes))
}

pub async fn save_journal<S: KeyValueStore + ?Sized>(store: &S, journal: &PendingJournal) -> Result<(), MaterialError> {
    store.set_data(PENDING_KEY, journal.encode()?).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv_store::StableKvStore;
    use ic_stable_structures::DefaultMemoryImpl;
    use tokio_test::block_on;

    #[test]
    fn index_is_a_json_array_in_insertion_order() {
        let mut index = MaterialIndex::default();
        assert!(index.append("1-a"));
        assert!(index.append("2-b"));
        assert!(!index.append("1-a"));
        assert_eq!(index.encode().unwrap(), br#"["1-a","2-b"]"#.to_vec());
    }

    #[test]
    fn unparsable_index_reads_as_empty() {
        assert!(MaterialIndex::decode(b"").is_empty());
        assert!(MaterialIndex::decode(b"{\"oops\":1}").is_empty());
        assert!(MaterialIndex::decode(b"not json").is_empty());
    }

    #[test]
    fn append_keeps_entries_written_by_another_writer() {
        let store = StableKvStore::new(DefaultMemoryImpl::default());
        block_on(append_to_index(&store, "1-a")).unwrap();
        // Another writer rewrites the index behind our back.
        block_on(store.set_data(INDEX_KEY, br#"["1-a","9-z"]"#.to_vec())).unwrap();
        let index = block_on(append_to_index(&store, "2-b")).unwrap();
        assert_eq!(index.ids(), &["1-a".to_string(), "9-z".to_string(), "2-b".to_string()]);
    }

    #[test]
    fn journal_entries_can_be_cleared() {
        let mut journal = PendingJournal::default();
        assert!(journal.add("1-a"));
        assert!(!journal.add("1-a"));
        assert!(journal.remove("1-a"));
        assert!(!journal.remove("1-a"));
        assert_eq!(journal.encode().unwrap(), b"[]".to_vec());
    }
}
