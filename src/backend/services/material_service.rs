// src/backend/services/material_service.rs
// Material records kept inside a primitive key -> bytes store

use crate::{
    error::MaterialError,
    metrics::{self, MetricEvent},
    models::{common::*, Lifecycle, Material},
    storage::{
        kv_store::KeyValueStore,
        material_index::{append_to_index, load_index, load_journal, save_index, save_journal},
        materials::{load_material, save_material},
    },
    utils::{
        ids::{generate_material_id, placeholder_ciphertext},
        rng::with_internal_rng,
        time::{get_current_time_ms, get_current_time_secs},
    },
};
use candid::CandidType;
use rand::Rng;
use serde::Deserialize;
use std::rc::Rc;

const MAX_ID_ATTEMPTS: usize = 8;

/// Outcome of a reconciliation pass over the pending-create journal.
#[derive(CandidType, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Journaled ids whose record existed and were added to the index.
    pub indexed: u64,
    /// Journaled ids that were already indexed.
    pub already_indexed: u64,
    /// Journaled ids whose record never landed (or is unreadable).
    pub dropped: u64,
}

/// Owns the indexing scheme and record schema on top of a `KeyValueStore`.
///
/// Layout:
/// * `material_keys` - JSON array of ids, oldest first.
/// * `material_<id>` - JSON record of one material.
/// * `material_pending_keys` - ids whose create has not been confirmed in the index.
pub struct MaterialRepository<S: KeyValueStore> {
    store: Rc<S>,
}

impl<S: KeyValueStore> Clone for MaterialRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Rc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> MaterialRepository<S> {
    pub fn new(store: Rc<S>) -> Self {
        Self { store }
    }

    /// Advisory availability signal of the store. Other operations do not check it.
    pub async fn is_available(&self) -> Result<bool, MaterialError> {
        self.store.is_available().await
    }

    /// Lists every readable indexed material, newest first.
    ///
    /// An absent or unparsable index lists as empty. Records that are absent or
    /// unreadable are skipped, so one corrupt record never fails the listing.
    pub async fn list_all(&self) -> Result<Vec<Material>, MaterialError> {
        if let Err(e) = self.reconcile().await {
            tracing::warn!("Reconciliation before listing failed: {}", e);
        }

        let index = load_index(&*self.store).await?;
        let mut materials = Vec::with_capacity(index.len());
        for id in index.ids() {
            match load_material(&*self.store, id).await {
                Ok(material) => materials.push(material),
                Err(e) => {
                    tracing::warn!("Skipping material {}: {}", id, e);
                    metrics::record(MetricEvent::RecordSkipped);
                }
            }
        }

        // Stable sort: equal timestamps keep index order.
        materials.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(materials)
    }

    /// Lists the materials of `owner`, newest first.
    pub async fn list_owned_by(&self, owner: &str) -> Result<Vec<Material>, MaterialError> {
        let mut materials = self.list_all().await?;
        materials.retain(|m| m.owner == owner);
        Ok(materials)
    }

    /// Reads a single material by id.
    pub async fn get(&self, id: &str) -> Result<Material, MaterialError> {
        load_material(&*self.store, id).await
    }

    /// Creates a material in `generating` state for `owner`.
    ///
    /// The id is journaled first, then the record is written, then the id is
    /// appended to the index and cleared from the journal. A failure between
    /// the record write and the index append leaves a journal entry that
    /// `reconcile` resolves.
    pub async fn create(&self, owner: &str, difficulty: Option<Difficulty>) -> Result<Material, MaterialError> {
        let difficulty = match difficulty {
            Some(d) if is_valid_difficulty(d) => d,
            Some(d) => {
                return Err(MaterialError::InvalidInput(format!(
                    "Difficulty {} outside [{}, {}]",
                    d, MIN_DIFFICULTY, MAX_DIFFICULTY
                )))
            }
            None => with_internal_rng(|rng| rng.gen_range(MIN_DIFFICULTY..=MAX_DIFFICULTY)),
        };

        let index = load_index(&*self.store).await?;
        let mut journal = load_journal(&*self.store).await?;
        let id = self.fresh_id(|candidate| index.contains(candidate) || journal.ids().iter().any(|j| j == candidate))?;

        let material = Material {
            encrypted_data: placeholder_ciphertext(&id),
            id: id.clone(),
            timestamp: get_current_time_secs(),
            owner: owner.to_string(),
            difficulty,
            lifecycle: Lifecycle::Generating,
        };

        journal.add(&id);
        save_journal(&*self.store, &journal).await?;
        save_material(&*self.store, &material).await?;
        append_to_index(&*self.store, &id).await?;
        self.clear_journal_entry(&id).await;

        metrics::record(MetricEvent::MaterialCreated);
        tracing::info!(
            "Material {} created for {} with difficulty {}",
            id,
            owner,
            difficulty
        );
        Ok(material)
    }

    /// Applies `mutator` to the lifecycle of `id` and writes the full record back.
    ///
    /// Immutable fields are out of the mutator's reach. The index is never touched.
    pub async fn update<F>(&self, id: &str, mutator: F) -> Result<Material, MaterialError>
    where
        F: FnOnce(Lifecycle) -> Result<Lifecycle, MaterialError>,
    {
        let mut material = load_material(&*self.store, id).await?;
        let before = material.status();
        material.lifecycle = mutator(material.lifecycle)?;
        save_material(&*self.store, &material).await?;
        tracing::info!("Material {} moved {} -> {}", id, before, material.status());
        Ok(material)
    }

    /// Resolves every journaled create: ids whose record exists are indexed,
    /// the others are dropped. Running it twice changes nothing the second time.
    pub async fn reconcile(&self) -> Result<ReconcileReport, MaterialError> {
        let mut journal = load_journal(&*self.store).await?;
        let mut report = ReconcileReport::default();
        if journal.is_empty() {
            return Ok(report);
        }

        let mut index = load_index(&*self.store).await?;
        let mut index_changed = false;
        for id in journal.ids().to_vec() {
            if index.contains(&id) {
                report.already_indexed += 1;
            } else {
                match load_material(&*self.store, &id).await {
                    Ok(_) => {
                        index.append(&id);
                        index_changed = true;
                        report.indexed += 1;
                        metrics::record(MetricEvent::OrphanReconciled);
                        tracing::info!("Reconciled orphan material {}", id);
                    }
                    Err(MaterialError::NotFound(_)) | Err(MaterialError::ParseError(_)) => {
                        report.dropped += 1;
                        tracing::warn!("Dropping journaled material {} without a readable record", id);
                    }
                    Err(e) => return Err(e),
                }
            }
            journal.remove(&id);
        }

        if index_changed {
            save_index(&*self.store, &index).await?;
        }
        save_journal(&*self.store, &journal).await?;
        Ok(report)
    }

    fn fresh_id<F>(&self, taken: F) -> Result<MaterialId, MaterialError>
    where
        F: Fn(&str) -> bool,
    {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = generate_material_id(get_current_time_ms());
            if !taken(&candidate) {
                return Ok(candidate);
            }
            tracing::debug!("Material id {} already taken, retrying", candidate);
        }
        Err(MaterialError::InternalError(
            "Could not generate an unused material id".to_string(),
        ))
    }

    // The create already succeeded once the id is indexed; a stale journal
    // entry is cleaned up by the next reconcile.
    async fn clear_journal_entry(&self, id: &str) {
        let result = async {
            let mut journal = load_journal(&*self.store).await?;
            if journal.remove(id) {
                save_journal(&*self.store, &journal).await?;
            }
            Ok::<(), MaterialError>(())
        }
        .await;
        if let Err(e) = result {
            tracing::warn!("Could not clear journal entry for {}: {}", id, e);
        }
    }
}
