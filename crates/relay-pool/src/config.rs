//! Pool sizing.
//!
//! Both hand-off channels are `flume` channels shared by every sender and
//! receiver. A buffer of zero, the default for both stages, makes a channel a
//! rendezvous: a send completes only once a receiver takes the task. Larger
//! buffers let producers run further ahead of the executors before
//! backpressure kicks in.

/// Default number of executors.
pub const DEFAULT_WORKERS: usize = 4;

/// Default slot count of the submission channel (rendezvous).
pub const DEFAULT_SUBMISSION_BUFFER: usize = 0;

/// Default slot count of the distribution channel (rendezvous).
pub const DEFAULT_DISTRIBUTION_BUFFER: usize = 0;

/// Static configuration of a [`Pool`](crate::Pool).
///
/// `workers` is taken as-is: zero is allowed and produces a pool that never
/// executes anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub workers: usize,
    pub submission_buffer: usize,
    pub distribution_buffer: usize,
}

impl PoolConfig {
    pub const fn new(workers: usize) -> Self {
        Self {
            workers,
            submission_buffer: DEFAULT_SUBMISSION_BUFFER,
            distribution_buffer: DEFAULT_DISTRIBUTION_BUFFER,
        }
    }

    /// Slack between submitters and the relay. `0` is a direct hand-off.
    #[must_use]
    pub const fn with_submission_buffer(mut self, slots: usize) -> Self {
        self.submission_buffer = slots;
        self
    }

    /// Slack between the relay and the executors. `0` is a direct hand-off.
    #[must_use]
    pub const fn with_distribution_buffer(mut self, slots: usize) -> Self {
        self.distribution_buffer = slots;
        self
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}
