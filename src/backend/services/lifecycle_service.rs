// src/backend/services/lifecycle_service.rs
// Drives materials through generating -> ready -> completed

use crate::{
    error::MaterialError,
    metrics::{self, MetricEvent},
    models::{common::*, Material},
    services::{
        material_service::MaterialRepository,
        scheduler::{ScheduledTask, Scheduler},
    },
    storage::kv_store::KeyValueStore,
    utils::rng::with_internal_rng,
};
use futures::FutureExt;
use rand::Rng;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// Performs `generating -> ready` on a stored material.
pub async fn mark_ready<S: KeyValueStore>(
    repository: &MaterialRepository<S>,
    id: &str,
) -> Result<Material, MaterialError> {
    let material = repository.update(id, |lifecycle| lifecycle.mark_ready(id)).await?;
    metrics::record(MetricEvent::ReadyTransition);
    Ok(material)
}

/// Performs `ready -> completed` with a score drawn uniformly from [60, 100].
pub async fn mark_completed<S: KeyValueStore>(
    repository: &MaterialRepository<S>,
    id: &str,
) -> Result<Material, MaterialError> {
    let score = with_internal_rng(|rng| rng.gen_range(MIN_SCORE..=MAX_SCORE));
    let material = repository.update(id, |lifecycle| lifecycle.complete(id, score)).await?;
    metrics::record(MetricEvent::Completion);
    Ok(material)
}

/// Creates materials and owns the timers that move them to `ready`.
///
/// Every pending transition is cancelled when the driver is dropped, so a torn
/// down session leaves no timers behind.
pub struct LifecycleDriver<S: KeyValueStore + 'static, T: Scheduler + 'static> {
    repository: MaterialRepository<S>,
    scheduler: Rc<T>,
    ready_delay: Duration,
    pending: Rc<RefCell<HashMap<MaterialId, T::Handle>>>,
}

impl<S: KeyValueStore + 'static, T: Scheduler + 'static> LifecycleDriver<S, T> {
    pub fn new(repository: MaterialRepository<S>, scheduler: Rc<T>, ready_delay: Duration) -> Self {
        Self {
            repository,
            scheduler,
            ready_delay,
            pending: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    pub fn repository(&self) -> &MaterialRepository<S> {
        &self.repository
    }

    /// Creates a material and schedules its `ready` transition.
    pub async fn generate(&self, owner: &str, difficulty: Option<Difficulty>) -> Result<Material, MaterialError> {
        let material = self.repository.create(owner, difficulty).await?;
        self.schedule_ready(&material.id);
        Ok(material)
    }

    /// Schedules `generating -> ready` for `id` after the ready delay,
    /// replacing any transition already pending for it.
    ///
    /// The transition is fire-and-forget: a failed write leaves the material in
    /// `generating` and is only logged.
    pub fn schedule_ready(&self, id: &str) {
        let repository = self.repository.clone();
        let pending = Rc::clone(&self.pending);
        let task_id = id.to_string();
        let task: ScheduledTask = async move {
            pending.borrow_mut().remove(&task_id);
            match mark_ready(&repository, &task_id).await {
                Ok(_) => tracing::info!("Material {} is ready", task_id),
                Err(e @ MaterialError::InvalidTransition { .. }) => {
                    tracing::info!("Skipping ready transition: {}", e)
                }
                Err(e) => {
                    metrics::record(MetricEvent::ReadyTransitionFailed);
                    tracing::error!("Material {} stuck in generating: {}", task_id, e);
                }
            }
        }
        .boxed_local();

        let handle = self.scheduler.schedule(self.ready_delay, task);
        let previous = self.pending.borrow_mut().insert(id.to_string(), handle);
        if let Some(previous) = previous {
            self.scheduler.cancel(previous);
        }
    }

    pub async fn mark_ready(&self, id: &str) -> Result<Material, MaterialError> {
        self.cancel(id);
        mark_ready(&self.repository, id).await
    }

    pub async fn mark_completed(&self, id: &str) -> Result<Material, MaterialError> {
        mark_completed(&self.repository, id).await
    }

    /// Cancels the pending `ready` transition of `id`, if any.
    pub fn cancel(&self, id: &str) -> bool {
        let handle = self.pending.borrow_mut().remove(id);
        match handle {
            Some(handle) => {
                self.scheduler.cancel(handle);
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        let handles: Vec<T::Handle> = self.pending.borrow_mut().drain().map(|(_, h)| h).collect();
        if !handles.is_empty() {
            tracing::info!("Cancelling {} pending ready transitions", handles.len());
        }
        for handle in handles {
            self.scheduler.cancel(handle);
        }
    }

    pub fn pending_transitions(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl<S: KeyValueStore + 'static, T: Scheduler + 'static> Drop for LifecycleDriver<S, T> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
