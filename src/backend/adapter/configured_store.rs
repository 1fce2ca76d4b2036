// src/backend/adapter/configured_store.rs
use crate::adapter::kv_contract_adapter::ContractKvStore;
use crate::error::MaterialError;
use crate::models::{MaterialConfig, StoreBackend};
use crate::storage::kv_store::{KeyValueStore, StableKvStore};
use crate::storage::memory::{get_kv_store_memory, Memory};
use async_trait::async_trait;

/// The store selected by the canister configuration.
pub enum ConfiguredStore {
    Local(StableKvStore<Memory>),
    Contract(ContractKvStore),
}

impl ConfiguredStore {
    fn from_backend(backend: &StoreBackend) -> Self {
        match backend {
            StoreBackend::Local => ConfiguredStore::Local(StableKvStore::new(get_kv_store_memory())),
            StoreBackend::Contract(contract) => ConfiguredStore::Contract(ContractKvStore::new(*contract)),
        }
    }

    /// Builds the configured store, restoring the persisted availability of a
    /// local one.
    pub fn from_config(config: &MaterialConfig) -> Self {
        let store = Self::from_backend(&config.store);
        if let ConfiguredStore::Local(local) = &store {
            if !config.local_store_available {
                local.set_available(false);
            }
        }
        store
    }

    /// Toggles availability of the local store. A remote contract reports its own.
    pub fn set_available(&self, available: bool) -> Result<(), MaterialError> {
        match self {
            ConfiguredStore::Local(store) => {
                store.set_available(available);
                Ok(())
            }
            ConfiguredStore::Contract(store) => Err(MaterialError::InvalidInput(format!(
                "Availability of contract {} cannot be set from here",
                store.contract()
            ))),
        }
    }
}

#[async_trait(?Send)]
impl KeyValueStore for ConfiguredStore {
    async fn is_available(&self) -> Result<bool, MaterialError> {
        match self {
            ConfiguredStore::Local(store) => store.is_available().await,
            ConfiguredStore::Contract(store) => store.is_available().await,
        }
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>, MaterialError> {
        match self {
            ConfiguredStore::Local(store) => store.get_data(key).await,
            ConfiguredStore::Contract(store) => store.get_data(key).await,
        }
    }

    async fn set_data(&self, key: &str, value: Vec<u8>) -> Result<(), MaterialError> {
        match self {
            ConfiguredStore::Local(store) => store.set_data(key, value).await,
            ConfiguredStore::Contract(store) => store.set_data(key, value).await,
        }
    }
}
