//! Lock-free counters describing what a pool has done so far.
//!
//! Every counter is updated with relaxed atomics by the pool's own tasks:
//! submitters bump `submitted`, the relay bumps `relayed`, executors maintain
//! the rest. Readers take a [`StatsSnapshot`], whose fields are individually
//! accurate but not mutually consistent while the pool is running.

use portable_atomic::{AtomicU64, AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct PoolStats {
    submitted: AtomicU64,
    relayed: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    panicked: AtomicU64,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// A point-in-time copy of [`PoolStats`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Units accepted by the submission channel.
    pub submitted: u64,
    /// Units moved from the submission channel to the distribution channel.
    pub relayed: u64,
    /// Executions that finished, whatever their outcome.
    pub completed: u64,
    /// Executions whose action returned an error.
    pub failed: u64,
    /// Executions whose action panicked.
    pub panicked: u64,
    /// Executions currently running.
    pub in_flight: usize,
    /// Highest value `in_flight` has reached.
    pub peak_in_flight: usize,
}

impl PoolStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            relayed: self.relayed.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
            in_flight: self.in_flight.load(Ordering::Relaxed),
            peak_in_flight: self.peak_in_flight.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_relayed(&self) {
        self.relayed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn begin_execution(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::Relaxed);
    }

    pub(crate) fn end_execution(&self, failed: bool, panicked: bool) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
        self.completed.fetch_add(1, Ordering::Relaxed);
        if panicked {
            self.panicked.fetch_add(1, Ordering::Relaxed);
        } else if failed {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }
}
