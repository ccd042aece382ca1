//! Debounce wrapper
//!
//! Every call replaces the single pending timer of the instance. On the
//! trailing edge the timer carries the arguments of the call that scheduled
//! it and invokes the wrapped function when it fires. On the leading edge the
//! wrapped function runs synchronously on the first call of a burst and the
//! timer only marks the end of the burst.

use parking_lot::Mutex;
use settle_core::{DebounceConfig, Edge, Result, Scheduler, Task, TokioScheduler};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Wrap `func` so that bursts of calls collapse into one invocation
///
/// `wait` defaults to 200ms when `None` or zero. `immediate` selects the
/// leading edge instead of the trailing one.
///
/// Timers run on the tokio runtime of the calling context; returns
/// [`settle_core::SettleError::NoRuntime`] outside of one.
pub fn debounce<A, F>(func: F, wait: Option<Duration>, immediate: bool) -> Result<Debounced<A>>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    Debounced::from_config(func, &DebounceConfig::new(wait, immediate))
}

/// A debounced function
///
/// Cloning yields another handle to the same instance: clones share the
/// wrapped function and the pending timer.
pub struct Debounced<A, S: Scheduler = TokioScheduler> {
    func: Arc<dyn Fn(A) + Send + Sync>,
    pending: Arc<Mutex<Pending<S::Handle>>>,
    scheduler: Arc<S>,
    wait: Duration,
    edge: Edge,
}

/// Pending timer state of one instance
struct Pending<H> {
    /// Bumped on every call; a firing timer only acts if it is still current
    generation: u64,
    timer: Option<H>,
}

impl<H> Pending<H> {
    /// Clear the timer if `generation` is still the current one
    fn settle(&mut self, generation: u64) -> bool {
        if self.generation != generation {
            return false;
        }
        self.timer = None;
        true
    }
}

impl<A: Send + 'static> Debounced<A, TokioScheduler> {
    /// Build a tokio-backed debounced function from a config
    pub fn from_config<F>(func: F, config: &DebounceConfig) -> Result<Self>
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Ok(Self::with_scheduler(func, config, TokioScheduler::new()?))
    }
}

impl<A: Send + 'static, S: Scheduler> Debounced<A, S> {
    /// Build a debounced function on top of any scheduler
    pub fn with_scheduler<F>(func: F, config: &DebounceConfig, scheduler: S) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            pending: Arc::new(Mutex::new(Pending {
                generation: 0,
                timer: None,
            })),
            scheduler: Arc::new(scheduler),
            wait: config.wait(),
            edge: config.edge,
        }
    }

    /// Invoke the debounced function
    ///
    /// Never blocks. On the leading edge the wrapped function may run before
    /// this returns; a panic inside it propagates to the caller.
    pub fn call(&self, args: A) {
        let mut immediate_args = None;
        {
            let mut pending = self.pending.lock();
            let call_now = self.edge.is_leading() && pending.timer.is_none();

            let cancelled = match pending.timer.take() {
                Some(timer) => {
                    self.scheduler.cancel(timer);
                    true
                }
                None => false,
            };

            pending.generation = pending.generation.wrapping_add(1);
            let generation = pending.generation;

            let task = match self.edge {
                Edge::Trailing => self.invoke_on_fire(generation, args),
                Edge::Leading => {
                    if call_now {
                        immediate_args = Some(args);
                    }
                    self.settle_on_fire(generation)
                }
            };
            pending.timer = Some(self.scheduler.schedule(self.wait, task));

            trace!(edge = ?self.edge, call_now, cancelled, generation, "Debounced call");
        }

        // Lock released: the wrapped function may call back into us
        if let Some(args) = immediate_args {
            debug!("Invoking debounced function on leading edge");
            (self.func)(args);
        }
    }

    /// Whether a timer is currently pending
    pub fn is_pending(&self) -> bool {
        self.pending.lock().timer.is_some()
    }

    /// Effective wait window
    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    /// Timer for a trailing-edge call: invoke with this call's arguments
    fn invoke_on_fire(&self, generation: u64, args: A) -> Task {
        let func = self.func.clone();
        let pending = self.pending.clone();
        let wait = self.wait;

        Box::new(move || {
            if !pending.lock().settle(generation) {
                trace!(generation, "Superseded debounce timer fired, skipping");
                return;
            }
            debug!(?wait, "Debounce window elapsed, invoking");
            func(args);
        })
    }

    /// Timer for a leading-edge call: only ends the burst
    fn settle_on_fire(&self, generation: u64) -> Task {
        let pending = self.pending.clone();

        Box::new(move || {
            if pending.lock().settle(generation) {
                trace!(generation, "Leading-edge burst settled");
            }
        })
    }
}

impl<A, S: Scheduler> Clone for Debounced<A, S> {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
            pending: self.pending.clone(),
            scheduler: self.scheduler.clone(),
            wait: self.wait,
            edge: self.edge,
        }
    }
}

impl<A, S: Scheduler> std::fmt::Debug for Debounced<A, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debounced")
            .field("wait", &self.wait)
            .field("edge", &self.edge)
            .field("pending", &self.pending.lock().timer.is_some())
            .finish()
    }
}
