//! Cancellable dismissal timers.
//!
//! A `DismissScheduler` runs a callback once after a delay and hands back
//! a `TimerHandle`. Cancelling the handle guarantees the callback will not
//! run if it has not started yet.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Scheduling primitive used by the store to arm dismissal timers.
pub trait DismissScheduler: Send + Sync {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;
}

/// Handle to a scheduled callback.
#[derive(Debug)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
    task: Option<AbortHandle>,
}

impl TimerHandle {
    fn new(cancelled: Arc<AtomicBool>, task: Option<AbortHandle>) -> Self {
        Self { cancelled, task }
    }

    /// Prevent the callback from running. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Runs timers as sleeping tasks on a tokio runtime.
#[derive(Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Scheduler bound to the runtime of the calling task, if any.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl DismissScheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if !flag.load(Ordering::SeqCst) {
                callback();
            }
        });
        TimerHandle::new(cancelled, Some(task.abort_handle()))
    }
}

/// Virtual-clock scheduler. Time only moves when `advance` is called.
///
/// Used by tests and by headless drivers that replay a session.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<Mutex<ManualInner>>,
    seq: Arc<AtomicU64>,
}

#[derive(Default)]
struct ManualInner {
    now: Duration,
    pending: Vec<PendingTimer>,
}

struct PendingTimer {
    due: Duration,
    seq: u64,
    cancelled: Arc<AtomicBool>,
    callback: TimerCallback,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.inner.lock().now
    }

    /// Number of timers that are armed and not cancelled.
    pub fn pending(&self) -> usize {
        self.inner
            .lock()
            .pending
            .iter()
            .filter(|t| !t.cancelled.load(Ordering::SeqCst))
            .count()
    }

    /// Move the clock forward, firing due timers in deadline order.
    ///
    /// Callbacks run without the scheduler lock held, so they may arm new
    /// timers; those fire in the same call if they fall due before the
    /// target time. Returns the number of callbacks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.inner.lock().now + by;
        let mut fired = 0;

        while let Some(timer) = self.pop_due(target) {
            if !timer.cancelled.load(Ordering::SeqCst) {
                (timer.callback)();
                fired += 1;
            }
        }

        self.inner.lock().now = target;
        fired
    }

    fn pop_due(&self, target: Duration) -> Option<PendingTimer> {
        let mut inner = self.inner.lock();
        inner.pending.retain(|t| !t.cancelled.load(Ordering::SeqCst));
        let index = inner
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= target)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, _)| i)?;
        let timer = inner.pending.swap_remove(index);
        inner.now = inner.now.max(timer.due);
        Some(timer)
    }
}

impl DismissScheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut inner = self.inner.lock();
        let due = inner.now + delay;
        inner.pending.push(PendingTimer {
            due,
            seq: self.seq.fetch_add(1, Ordering::SeqCst),
            cancelled: Arc::clone(&cancelled),
            callback,
        });
        TimerHandle::new(cancelled, None)
    }
}
