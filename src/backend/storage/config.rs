// src/backend/storage/config.rs
use crate::error::MaterialError;
use crate::models::material_config::MaterialConfig;
use crate::storage::memory::{get_config_memory, Memory};
use crate::storage::storable::Cbor;
use ic_stable_structures::StableCell;
use std::cell::RefCell;

thread_local! {
    /// Canister configuration, survives upgrades.
    static CONFIG: RefCell<StableCell<Cbor<MaterialConfig>, Memory>> = RefCell::new(
        StableCell::init(get_config_memory(), Cbor(MaterialConfig::default()))
            .expect("Failed to initialize config stable cell")
    );
}

/// Persist the configuration. Called at install time.
pub fn set_config(config: MaterialConfig) -> Result<(), MaterialError> {
    CONFIG.with(|cell| {
        cell.borrow_mut()
            .set(Cbor(config))
            .map(|_old| ())
            .map_err(|e| MaterialError::StorageError(format!("Failed to set config: {:?}", e)))
    })
}

pub fn get_config() -> MaterialConfig {
    CONFIG.with(|cell| cell.borrow().get().0.clone())
}

/// Apply `update_fn` to the stored configuration and persist the result.
pub fn update_config<F>(update_fn: F) -> Result<MaterialConfig, MaterialError>
where
    F: FnOnce(&mut MaterialConfig),
{
    let mut config = get_config();
    update_fn(&mut config);
    set_config(config.clone())?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::material_config::StoreBackend;
    use candid::Principal;

    #[test]
    fn updates_are_persisted() {
        let contract = Principal::from_slice(&[9, 9, 9]);
        let updated = update_config(|c| {
            c.store = StoreBackend::Contract(contract);
            c.ready_delay_secs = 5;
        })
        .unwrap();
        assert_eq!(get_config(), updated);
        assert_eq!(get_config().store, StoreBackend::Contract(contract));
    }
}
