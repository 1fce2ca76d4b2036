// src/backend/storage/kv_store.rs
use crate::error::MaterialError;
use async_trait::async_trait;
use ic_stable_structures::{Memory as StableMemory, StableBTreeMap};
use std::cell::{Cell, RefCell};

/// The key -> bytes contract the material records live in.
///
/// It offers no enumeration, querying or transactions. An absent key reads as
/// empty bytes.
#[async_trait(?Send)]
pub trait KeyValueStore {
    async fn is_available(&self) -> Result<bool, MaterialError>;

    async fn get_data(&self, key: &str) -> Result<Vec<u8>, MaterialError>;

    async fn set_data(&self, key: &str, value: Vec<u8>) -> Result<(), MaterialError>;
}

/// Key/value store kept in stable memory.
///
/// Inside the canister this sits on a virtual memory from the memory manager;
/// off-chain `DefaultMemoryImpl` is a plain in-memory vector.
pub struct StableKvStore<M: StableMemory> {
    map: RefCell<StableBTreeMap<String, Vec<u8>, M>>,
    available: Cell<bool>,
}

impl<M: StableMemory> StableKvStore<M> {
    pub fn new(memory: M) -> Self {
        Self {
            map: RefCell::new(StableBTreeMap::init(memory)),
            available: Cell::new(true),
        }
    }

    /// Toggle the availability signal. While unavailable every call fails.
    pub fn set_available(&self, available: bool) {
        tracing::info!("Local key/value store availability set to {}", available);
        self.available.set(available);
    }

    pub fn len(&self) -> u64 {
        self.map.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_available(&self) -> Result<(), MaterialError> {
        if self.available.get() {
            Ok(())
        } else {
            Err(MaterialError::StoreUnavailable(
                "Local key/value store is paused".to_string(),
            ))
        }
    }
}

#[async_trait(?Send)]
impl<M: StableMemory> KeyValueStore for StableKvStore<M> {
    async fn is_available(&self) -> Result<bool, MaterialError> {
        Ok(self.available.get())
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>, MaterialError> {
        self.ensure_available()?;
        Ok(self.map.borrow().get(&key.to_string()).unwrap_or_default())
    }

    async fn set_data(&self, key: &str, value: Vec<u8>) -> Result<(), MaterialError> {
        self.ensure_available()?;
        tracing::debug!("setData {} ({} bytes)", key, value.len());
        self.map.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}
