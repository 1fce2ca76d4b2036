// src/backend/services/session.rs
// Presentation-facing operations: repository + lifecycle driver + status reporter

use crate::{
    error::MaterialError,
    metrics::{self, MetricEvent},
    models::{common::*, Material, MaterialConfig, TransactionStatus},
    services::{
        lifecycle_service::LifecycleDriver, material_service::MaterialRepository, scheduler::Scheduler,
        status_reporter::TransactionStatusReporter,
    },
    storage::kv_store::KeyValueStore,
};
use std::rc::Rc;

pub const GENERATE_PENDING: &str = "Generating personalized materials using FHE...";
pub const GENERATE_SUCCESS: &str = "Personalized materials generated with FHE!";
pub const GENERATE_REJECTED: &str = "Transaction rejected by user";
pub const COMPLETE_PENDING: &str = "Processing learning results with FHE...";
pub const COMPLETE_SUCCESS: &str = "Learning results processed with FHE!";
pub const AVAILABLE: &str = "FHE system is available and ready!";
pub const UNAVAILABLE: &str = "FHE system is currently unavailable";
pub const AVAILABILITY_FAILED: &str = "Availability check failed";

/// One user's mutating operations on the material store: the timers they
/// started and their status slot. Read-only calls go to the repository.
///
/// Dropping the session (or calling `teardown`) cancels its outstanding ready
/// transitions and notification dismissals.
pub struct MaterialSession<S: KeyValueStore + 'static, T: Scheduler + 'static> {
    driver: LifecycleDriver<S, T>,
    reporter: TransactionStatusReporter<T>,
}

impl<S: KeyValueStore + 'static, T: Scheduler + 'static> MaterialSession<S, T> {
    pub fn new(store: Rc<S>, scheduler: Rc<T>, config: &MaterialConfig) -> Self {
        Self {
            driver: LifecycleDriver::new(
                MaterialRepository::new(store),
                Rc::clone(&scheduler),
                config.ready_delay(),
            ),
            reporter: TransactionStatusReporter::new(scheduler, config.success_dismiss(), config.error_dismiss()),
        }
    }

    fn repository(&self) -> &MaterialRepository<S> {
        self.driver.repository()
    }

    /// Creates a material for `owner` and reports progress through the status slot.
    pub async fn generate(&self, owner: &str, difficulty: Option<Difficulty>) -> Result<Material, MaterialError> {
        self.reporter.pending(GENERATE_PENDING);
        match self.driver.generate(owner, difficulty).await {
            Ok(material) => {
                self.reporter.success(GENERATE_SUCCESS);
                Ok(material)
            }
            Err(e) => {
                metrics::record(MetricEvent::OperationFailed);
                tracing::error!("Generation for {} failed: {}", owner, e);
                match &e {
                    MaterialError::UserRejected(_) => self.reporter.error(GENERATE_REJECTED),
                    other => self.reporter.error(format!("Generation failed: {}", other)),
                }
                Err(e)
            }
        }
    }

    /// Completes a ready material, assigning its score.
    pub async fn complete(&self, id: &str) -> Result<Material, MaterialError> {
        self.reporter.pending(COMPLETE_PENDING);
        match self.driver.mark_completed(id).await {
            Ok(material) => {
                self.reporter.success(COMPLETE_SUCCESS);
                Ok(material)
            }
            Err(e) => {
                metrics::record(MetricEvent::OperationFailed);
                tracing::error!("Completion of {} failed: {}", id, e);
                self.reporter.error(format!("Processing failed: {}", e));
                Err(e)
            }
        }
    }

    pub async fn check_availability(&self) -> Result<bool, MaterialError> {
        match self.repository().is_available().await {
            Ok(true) => {
                self.reporter.success(AVAILABLE);
                Ok(true)
            }
            Ok(false) => {
                self.reporter.error(UNAVAILABLE);
                Ok(false)
            }
            Err(e) => {
                tracing::warn!("Availability check failed: {}", e);
                self.reporter.error(AVAILABILITY_FAILED);
                Err(e)
            }
        }
    }

    pub fn transaction_status(&self) -> Option<TransactionStatus> {
        self.reporter.current()
    }

    pub fn pending_transitions(&self) -> usize {
        self.driver.pending_transitions()
    }

    /// True once nothing is scheduled and no status is shown; an idle session
    /// can be dropped without losing anything.
    pub fn is_idle(&self) -> bool {
        self.pending_transitions() == 0 && self.transaction_status().is_none()
    }

    pub fn teardown(&self) {
        self.driver.cancel_all();
        self.reporter.clear();
    }
}
