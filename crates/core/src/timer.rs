//! Deferred execution
//!
//! A debounced function needs exactly one primitive from its host: run a
//! callback once after a delay, with the ability to cancel it before it runs.

use crate::error::{Result, SettleError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// Callback run by a scheduler when its timer fires
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// One-shot delayed callbacks with cancellation
pub trait Scheduler: Send + Sync + 'static {
    /// Handle identifying a scheduled callback
    type Handle: Send + 'static;

    /// Run `task` once after `delay`
    fn schedule(&self, delay: Duration, task: Task) -> Self::Handle;

    /// Cancel a scheduled callback
    ///
    /// Cancelling a callback that already ran is a no-op.
    fn cancel(&self, handle: Self::Handle);
}

/// Scheduler backed by tokio timers
///
/// Each scheduled callback is a spawned task sleeping until its deadline;
/// cancellation aborts the task.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    /// Bind to the runtime of the calling context
    ///
    /// Returns [`SettleError::NoRuntime`] outside of a tokio runtime.
    pub fn new() -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| SettleError::NoRuntime)?;
        Ok(Self { runtime })
    }

    /// Bind to an explicit runtime handle
    pub fn from_handle(runtime: Handle) -> Self {
        Self { runtime }
    }
}

impl Scheduler for TokioScheduler {
    type Handle = JoinHandle<()>;

    fn schedule(&self, delay: Duration, task: Task) -> JoinHandle<()> {
        // Deadline is fixed now, not when the spawned task is first polled
        let deadline = Instant::now() + delay;
        self.runtime.spawn(async move {
            sleep_until(deadline).await;
            task();
        })
    }

    fn cancel(&self, handle: JoinHandle<()>) {
        handle.abort();
    }
}
