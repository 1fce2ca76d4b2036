// src/backend/services/status_reporter.rs
// Single-slot transient notification with timed auto-dismissal

use crate::models::{TransactionStatus, TxPhase};
use crate::services::scheduler::{ScheduledTask, Scheduler};
use futures::FutureExt;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Holds at most one status. Success and error statuses dismiss themselves
/// after their delay; pending stays until replaced. Setting a new status
/// cancels the dismissal of the previous one.
pub struct TransactionStatusReporter<T: Scheduler> {
    scheduler: Rc<T>,
    slot: Rc<RefCell<Option<TransactionStatus>>>,
    // Bumped on every set/clear so a dismissal that slipped past cancel
    // cannot clear a newer status.
    generation: Rc<Cell<u64>>,
    dismissal: RefCell<Option<T::Handle>>,
    success_dismiss: Duration,
    error_dismiss: Duration,
}

impl<T: Scheduler> TransactionStatusReporter<T> {
    pub fn new(scheduler: Rc<T>, success_dismiss: Duration, error_dismiss: Duration) -> Self {
        Self {
            scheduler,
            slot: Rc::new(RefCell::new(None)),
            generation: Rc::new(Cell::new(0)),
            dismissal: RefCell::new(None),
            success_dismiss,
            error_dismiss,
        }
    }

    pub fn pending(&self, message: impl Into<String>) {
        self.set(TransactionStatus::new(TxPhase::Pending, message), None);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.set(TransactionStatus::new(TxPhase::Success, message), Some(self.success_dismiss));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.set(TransactionStatus::new(TxPhase::Error, message), Some(self.error_dismiss));
    }

    pub fn current(&self) -> Option<TransactionStatus> {
        self.slot.borrow().clone()
    }

    pub fn clear(&self) {
        self.cancel_dismissal();
        self.generation.set(self.generation.get().wrapping_add(1));
        self.slot.borrow_mut().take();
    }

    fn set(&self, status: TransactionStatus, dismiss_after: Option<Duration>) {
        self.cancel_dismissal();
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        tracing::debug!("Transaction status {:?}: {}", status.phase, status.message);
        *self.slot.borrow_mut() = Some(status);

        if let Some(delay) = dismiss_after {
            let slot = Rc::clone(&self.slot);
            let current_generation = Rc::clone(&self.generation);
            let task: ScheduledTask = async move {
                if current_generation.get() == generation {
                    slot.borrow_mut().take();
                }
            }
            .boxed_local();
            *self.dismissal.borrow_mut() = Some(self.scheduler.schedule(delay, task));
        }
    }

    fn cancel_dismissal(&self) {
        if let Some(handle) = self.dismissal.borrow_mut().take() {
            self.scheduler.cancel(handle);
        }
    }
}

impl<T: Scheduler> Drop for TransactionStatusReporter<T> {
    fn drop(&mut self) {
        self.cancel_dismissal();
    }
}
