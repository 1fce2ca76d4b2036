// src/backend/storage/metrics.rs
use crate::error::MaterialError;
use crate::metrics::MaterialMetrics;
use crate::storage::memory::{get_metrics_memory, Memory};
use crate::storage::storable::Cbor;
use ic_stable_structures::StableCell;
use std::cell::RefCell;

type StorableMaterialMetrics = Cbor<MaterialMetrics>;

thread_local! {
    /// Global material metrics
    pub static METRICS_CELL: RefCell<StableCell<StorableMaterialMetrics, Memory>> = RefCell::new(
        StableCell::init(get_metrics_memory(), Cbor(MaterialMetrics::default()))
            .expect("Failed to initialize metrics stable cell")
    );
}

pub fn get_metrics() -> MaterialMetrics {
    METRICS_CELL.with(|cell| cell.borrow().get().0.clone())
}

/// Helper function to update metrics.
pub fn update_metrics<F>(update_fn: F) -> Result<(), MaterialError>
where
    F: FnOnce(&mut MaterialMetrics),
{
    METRICS_CELL.with(|cell| {
        let mut metrics = cell.borrow().get().0.clone();
        update_fn(&mut metrics);
        cell.borrow_mut()
            .set(Cbor(metrics))
            .map_err(|e| MaterialError::StorageError(format!("Failed to update metrics: {:?}", e)))?;
        Ok(())
    })
}
