//! Virtual-clock scheduler
//!
//! Time only moves when [`ManualScheduler::advance`] is called, which makes
//! debounce timing fully deterministic in tests and simulations.

use crate::timer::{Scheduler, Task};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Scheduler driven by an explicit virtual clock
///
/// Clones share the same clock and timer queue.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<Mutex<Clock>>,
}

#[derive(Default)]
struct Clock {
    /// Virtual time elapsed since creation
    now: Duration,
    next_id: u64,
    /// Keyed by (deadline, id) so equal deadlines run in scheduling order
    timers: BTreeMap<(Duration, u64), Queued>,
}

struct Queued {
    scheduled_at: Duration,
    task: Task,
}

/// Handle to a timer queued on a [`ManualScheduler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualTimer {
    deadline: Duration,
    id: u64,
}

impl ManualTimer {
    /// Virtual time at which the timer fires
    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.inner.lock().now
    }

    /// Number of timers waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.inner.lock().timers.len()
    }

    /// Move the clock forward, firing every timer that falls due
    ///
    /// Timers fire in deadline order with the clock set to their deadline.
    /// Callbacks run without the clock locked, so they may schedule or cancel
    /// further timers; any that fall due within this advance also fire,
    /// except zero-delay timers, which wait for the next advance. A callback
    /// that reschedules itself with no delay therefore cannot stall the clock.
    pub fn advance(&self, by: Duration) {
        let (target, horizon) = {
            let clock = self.inner.lock();
            (clock.now + by, clock.next_id)
        };
        while let Some(task) = self.pop_due(target, horizon) {
            task();
        }
        let mut clock = self.inner.lock();
        clock.now = clock.now.max(target);
    }

    /// Next timer due by `target`; timers with id >= `horizon` were scheduled
    /// during the current advance
    fn pop_due(&self, target: Duration, horizon: u64) -> Option<Task> {
        let mut clock = self.inner.lock();
        let key = clock
            .timers
            .iter()
            .take_while(|(key, _)| key.0 <= target)
            .find(|(key, queued)| key.1 < horizon || key.0 > queued.scheduled_at)
            .map(|(key, _)| *key)?;
        clock.now = clock.now.max(key.0);
        clock.timers.remove(&key).map(|queued| queued.task)
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualTimer;

    fn schedule(&self, delay: Duration, task: Task) -> ManualTimer {
        let mut clock = self.inner.lock();
        let timer = ManualTimer {
            deadline: clock.now + delay,
            id: clock.next_id,
        };
        clock.next_id += 1;
        let scheduled_at = clock.now;
        clock.timers.insert((timer.deadline, timer.id), Queued { scheduled_at, task });
        timer
    }

    fn cancel(&self, handle: ManualTimer) {
        self.inner.lock().timers.remove(&(handle.deadline, handle.id));
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let clock = self.inner.lock();
        f.debug_struct("ManualScheduler")
            .field("now", &clock.now)
            .field("pending", &clock.timers.len())
            .finish()
    }
}
