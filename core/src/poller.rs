//! Repeating-fetch primitive driving live updates.
//!
//! A [`ResourcePoller`] owns one background tokio task per active schedule.
//! Starting it invokes the fetch immediately (so the first screen paint is
//! not delayed by the interval) and then on every tick. Each invocation runs
//! as its own task: a tick fires whether or not the previous fetch has
//! completed, so overlapping fetches for the same resource are possible.
//! Completion-order hazards are resolved by the [`FetchGate`] sequence guard,
//! not by serializing the fetches.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Host list and per-host overview refresh interval.
pub const HOST_LIST_INTERVAL: Duration = Duration::from_millis(5000);

/// Host detail and history refresh interval.
pub const DETAIL_INTERVAL: Duration = Duration::from_millis(5000);

/// Process list refresh interval.
pub const PROCESS_INTERVAL: Duration = Duration::from_millis(5000);

/// Network interface refresh interval.
pub const NETWORK_INTERVAL: Duration = Duration::from_millis(3000);

/// Background polling task state.
struct PollerTask {
    cancel: CancellationToken,
    join_handle: JoinHandle<()>,
}

/// Recurring-fetch state machine: `Idle` (no task) or `Active` (timer armed).
///
/// A fetch error never stops the schedule; the next tick fires regardless.
/// Stopping cancels the timer immediately, but fetches already in flight are
/// left to complete — their results are discarded at the gate.
pub struct ResourcePoller {
    name: &'static str,
    task: Mutex<Option<PollerTask>>,
}

impl ResourcePoller {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            task: Mutex::new(None),
        }
    }

    /// Arm the poller: invoke `fetch` immediately, then every `interval`.
    ///
    /// If the poller is already active, the previous timer is cancelled first
    /// so a single instance never runs two schedules.
    pub fn start<F, Fut, E>(&self, interval: Duration, mut fetch: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: std::fmt::Display + Send + 'static,
    {
        self.stop();

        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let name = self.name;

        let join_handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => {
                        debug!("Poller '{name}' cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        // Spawn the fetch so the next tick is never held up
                        // by a slow response.
                        let fut = fetch();
                        tokio::spawn(async move {
                            if let Err(e) = fut.await {
                                debug!("Poller '{name}' fetch failed: {e}");
                            }
                        });
                    }
                }
            }
        });

        debug!("Poller '{}' started (interval: {:?})", self.name, interval);

        let mut guard = self.task.lock().unwrap();
        *guard = Some(PollerTask {
            cancel,
            join_handle,
        });
    }

    /// Cancel the timer and return to `Idle`. No-op when already idle.
    pub fn stop(&self) {
        let task = self.task.lock().unwrap().take();
        if let Some(task) = task {
            task.cancel.cancel();
            task.join_handle.abort();
            debug!("Poller '{}' stopped", self.name);
        }
    }

    /// Whether a schedule is currently armed.
    pub fn is_active(&self) -> bool {
        self.task.lock().unwrap().is_some()
    }
}

impl Drop for ResourcePoller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Sequence-number guard resolving out-of-order fetch completions.
///
/// Each fetch is stamped via [`issue`](FetchGate::issue) before the request
/// goes out; its result is applied only if [`admit`](FetchGate::admit) accepts
/// the stamp. A response is admitted when no newer response has been admitted
/// yet, so responses apply in completion order and a slow poll N can never
/// clobber a faster poll N+1. Closing the gate rejects everything, which is
/// how in-flight responses are discarded after their owning view is left.
pub struct FetchGate {
    issued: AtomicU64,
    committed: AtomicU64,
}

const GATE_CLOSED: u64 = u64::MAX;

impl FetchGate {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            committed: AtomicU64::new(0),
        }
    }

    /// Stamp a new fetch. Sequence numbers start at 1 and only grow.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Try to commit the response stamped `seq`. Returns `false` if a newer
    /// response was already committed or the gate is closed.
    pub fn admit(&self, seq: u64) -> bool {
        let mut current = self.committed.load(Ordering::SeqCst);
        loop {
            if current >= seq {
                return false;
            }
            match self.committed.compare_exchange(
                current,
                seq,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Permanently reject all pending and future completions.
    pub fn close(&self) {
        self.committed.store(GATE_CLOSED, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.committed.load(Ordering::SeqCst) == GATE_CLOSED
    }
}

impl Default for FetchGate {
    fn default() -> Self {
        Self::new()
    }
}
