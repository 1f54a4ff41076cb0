//! # Task Scheduling
//!
//! The dispatch core never awaits handler code itself. It hands every
//! interaction task and every timeout timer to a [`Scheduler`], which decides
//! how and where they run.
//!
//! - [`TokioScheduler`] spawns onto a tokio runtime and logs task failures.
//! - [`InlineScheduler`] runs tasks to completion on the calling thread and
//!   holds timers until they are fired explicitly, for deterministic tests.

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{debug, error, info_span, Instrument};

use crate::error::{FormError, Result};

/// A unit of scheduled work. Errors are owned by the scheduler.
pub type TaskFuture = BoxFuture<'static, anyhow::Result<()>>;

/// Deferred callback fired once a timer's deadline passes.
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Task submission and timer primitive used by forms and the registry
pub trait Scheduler: Send + Sync {
    /// Run `task` independently of the caller. Must not wait for it.
    fn schedule(&self, label: String, task: TaskFuture);

    /// Invoke `callback` once `deadline` has passed unless cancelled first.
    fn call_at(&self, label: String, deadline: Instant, callback: TimerCallback) -> TimerHandle;
}

/// Cancellation handle for a pending timer
#[derive(Debug)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
    abort: Option<AbortHandle>,
}

impl TimerHandle {
    fn new(cancelled: Arc<AtomicBool>, abort: Option<AbortHandle>) -> Self {
        Self { cancelled, abort }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        if let Some(abort) = &self.abort {
            abort.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Scheduler backed by a tokio runtime
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Bind to the runtime the caller is currently running on.
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| FormError::Scheduler(format!("no tokio runtime available: {e}")))
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, label: String, task: TaskFuture) {
        let span = info_span!("scheduled_task", task = %label);
        self.handle.spawn(
            async move {
                if let Err(e) = task.await {
                    error!(task = %label, error = %e, "❌ Scheduled task failed");
                }
            }
            .instrument(span),
        );
    }

    fn call_at(&self, label: String, deadline: Instant, callback: TimerCallback) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let join = self.handle.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if !flag.load(Ordering::Acquire) {
                debug!(timer = %label, "⏰ Timer fired");
                callback();
            }
        });
        TimerHandle::new(cancelled, Some(join.abort_handle()))
    }
}

struct PendingTimer {
    label: String,
    deadline: Instant,
    cancelled: Arc<AtomicBool>,
    callback: TimerCallback,
}

/// Synchronous scheduler for tests and single-threaded embedding.
///
/// Tasks run to completion inside `schedule`, so they must not submit nested
/// blocking work (for example by dispatching through the same registry).
#[derive(Default)]
pub struct InlineScheduler {
    completed: AtomicUsize,
    failures: Mutex<Vec<String>>,
    timers: Mutex<Vec<PendingTimer>>,
}

impl InlineScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks that ran to completion without error.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    /// `"<label>: <error>"` for every task that failed or panicked.
    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().clone()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers
            .lock()
            .iter()
            .filter(|timer| !timer.cancelled.load(Ordering::Acquire))
            .count()
    }

    /// Fire every live timer whose deadline is at or before `now`.
    pub fn fire_due(&self, now: Instant) -> usize {
        self.fire_where(|timer| timer.deadline <= now)
    }

    /// Fire every live timer regardless of its deadline.
    pub fn fire_all(&self) -> usize {
        self.fire_where(|_| true)
    }

    fn fire_where(&self, due: impl Fn(&PendingTimer) -> bool) -> usize {
        // Callbacks may arm new timers, so the lock is released before firing.
        let ready: Vec<PendingTimer> = {
            let mut timers = self.timers.lock();
            let (ready, pending): (Vec<_>, Vec<_>) = timers.drain(..).partition(|timer| due(timer));
            *timers = pending;
            ready
        };

        let mut fired = 0;
        for timer in ready {
            if timer.cancelled.load(Ordering::Acquire) {
                continue;
            }
            debug!(timer = %timer.label, "⏰ Timer fired");
            (timer.callback)();
            fired += 1;
        }
        fired
    }
}

impl Scheduler for InlineScheduler {
    fn schedule(&self, label: String, task: TaskFuture) {
        let outcome = futures::executor::block_on(AssertUnwindSafe(task).catch_unwind());
        match outcome {
            Ok(Ok(())) => {
                self.completed.fetch_add(1, Ordering::AcqRel);
            }
            Ok(Err(e)) => {
                error!(task = %label, error = %e, "❌ Scheduled task failed");
                self.failures.lock().push(format!("{label}: {e}"));
            }
            Err(_) => {
                error!(task = %label, "❌ Scheduled task panicked");
                self.failures.lock().push(format!("{label}: panicked"));
            }
        }
    }

    fn call_at(&self, label: String, deadline: Instant, callback: TimerCallback) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.timers.lock().push(PendingTimer {
            label,
            deadline,
            cancelled: cancelled.clone(),
            callback,
        });
        TimerHandle::new(cancelled, None)
    }
}

impl std::fmt::Debug for InlineScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InlineScheduler")
            .field("completed", &self.completed())
            .field("failures", &self.failures.lock().len())
            .field("pending_timers", &self.pending_timers())
            .finish()
    }
}
