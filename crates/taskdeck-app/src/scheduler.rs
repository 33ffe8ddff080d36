//! Deferred delivery of notices.
//!
//! Deferred notices are fire-and-forget: there is no cancellation and no
//! ordering guarantee relative to later store operations.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::notify::{Notice, Notifier, guard};

/// Accepts notices to be delivered after a delay.
pub trait Scheduler {
    /// Deliver `notice` once `delay` has elapsed.
    fn schedule(&self, delay: Duration, notice: Notice);
}

impl<T: Scheduler + ?Sized> Scheduler for Arc<T> {
    fn schedule(&self, delay: Duration, notice: Notice) {
        (**self).schedule(delay, notice);
    }
}

/// Delivers immediately, ignoring the delay.
#[derive(Debug, Clone, Default)]
pub struct InlineScheduler<N> {
    notifier: N,
}

impl<N: Notifier> InlineScheduler<N> {
    /// Deliver through `notifier`.
    pub const fn new(notifier: N) -> Self {
        Self { notifier }
    }
}

impl<N: Notifier> Scheduler for InlineScheduler<N> {
    fn schedule(&self, _delay: Duration, notice: Notice) {
        self.notifier.notify(&notice);
    }
}

/// A notice waiting in a [`ManualScheduler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deferred {
    /// Requested delay.
    pub delay: Duration,
    /// Notice captured at scheduling time.
    pub notice: Notice,
}

/// Queues notices until the owner drains them; clones share the queue.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    queue: Arc<Mutex<Vec<Deferred>>>,
}

impl ManualScheduler {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the queued notices in scheduling order.
    #[must_use]
    pub fn pending(&self) -> Vec<Deferred> {
        guard(&self.queue).clone()
    }

    /// Remove every queued notice, ordered by delay (ties keep scheduling order).
    pub fn drain(&self) -> Vec<Deferred> {
        let mut drained = std::mem::take(&mut *guard(&self.queue));
        drained.sort_by_key(|deferred| deferred.delay);
        drained
    }

    /// Drain the queue into `notifier`, returning how many notices were delivered.
    pub fn deliver_to(&self, notifier: &dyn Notifier) -> usize {
        let drained = self.drain();
        for deferred in &drained {
            notifier.notify(&deferred.notice);
        }
        drained.len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, notice: Notice) {
        guard(&self.queue).push(Deferred { delay, notice });
    }
}

/// Sleeps on a tokio runtime before delivering.
pub struct TokioScheduler {
    handle: Handle,
    notifier: Arc<dyn Notifier>,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl TokioScheduler {
    /// Spawn deliveries on `handle`, delivering through `notifier`.
    pub fn new(handle: Handle, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            handle,
            notifier,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Number of deliveries spawned and not yet awaited by [`settle`](Self::settle).
    #[must_use]
    pub fn outstanding(&self) -> usize {
        guard(&self.pending).len()
    }

    /// Wait for every spawned delivery to finish.
    pub async fn settle(&self) {
        let tasks = std::mem::take(&mut *guard(&self.pending));
        debug!(count = tasks.len(), "Waiting for deferred notices");
        for task in tasks {
            if let Err(err) = task.await {
                warn!(error = %err, "Deferred notice did not complete");
            }
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, notice: Notice) {
        let notifier = Arc::clone(&self.notifier);
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            notifier.notify(&notice);
        });
        let mut pending = guard(&self.pending);
        pending.retain(|spawned| !spawned.is_finished());
        pending.push(task);
    }
}
