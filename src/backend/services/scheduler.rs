// src/backend/services/scheduler.rs
// Cancelable delayed tasks for lifecycle transitions and notification dismissal

use futures::future::LocalBoxFuture;
use ic_cdk_timers::TimerId;
use std::fmt::Debug;
use std::time::Duration;

pub type ScheduledTask = LocalBoxFuture<'static, ()>;

/// Runs a task once after a delay. Every scheduled task yields a handle that
/// cancels it; cancelling a task that already ran is a no-op.
pub trait Scheduler {
    type Handle: Copy + Eq + Debug;

    fn schedule(&self, delay: Duration, task: ScheduledTask) -> Self::Handle;

    fn cancel(&self, handle: Self::Handle);
}

/// Scheduler backed by the canister's `ic-cdk-timers` timers.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimerScheduler;

impl Scheduler for TimerScheduler {
    type Handle = TimerId;

    fn schedule(&self, delay: Duration, task: ScheduledTask) -> TimerId {
        ic_cdk_timers::set_timer(delay, move || ic_cdk::spawn(task))
    }

    fn cancel(&self, handle: TimerId) {
        ic_cdk_timers::clear_timer(handle);
    }
}
