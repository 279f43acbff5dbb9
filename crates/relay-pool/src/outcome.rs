//! Where execution results go.
//!
//! Submission is fire-and-forget: nothing flows back to whoever submitted a
//! task. Executors instead hand every [`Outcome`] to the pool's
//! [`OutcomeSink`], which decides what to do with it.

use crate::error::TaskError;
use core::time::Duration;
use tokio::sync::mpsc;

/// The result of one task execution.
#[derive(Debug)]
pub struct Outcome {
    /// Index of the executor that ran the task.
    pub worker_id: usize,
    /// Wall time spent inside [`Task::execute`](crate::Task::execute).
    pub elapsed: Duration,
    pub result: Result<(), TaskError>,
}

impl Outcome {
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Receives the outcome of every execution.
///
/// `record` is called on the executor's task right after the unit finishes,
/// so it should return quickly.
pub trait OutcomeSink: Send + Sync + 'static {
    fn record(&self, outcome: Outcome);
}

impl<F> OutcomeSink for F
where
    F: Fn(Outcome) + Send + Sync + 'static,
{
    fn record(&self, outcome: Outcome) {
        self(outcome);
    }
}

/// Drops every outcome.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl OutcomeSink for DiscardSink {
    fn record(&self, _outcome: Outcome) {}
}

/// Logs failures at `warn` and successes at `trace`.
///
/// Only emits anything when the `tracing` feature is enabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl OutcomeSink for LogSink {
    fn record(&self, _outcome: Outcome) {
        #[cfg(feature = "tracing")]
        match &_outcome.result {
            Ok(()) => tracing::trace!(
                "Worker {} task succeeded in {:?}",
                _outcome.worker_id,
                _outcome.elapsed
            ),
            Err(e) => tracing::warn!(
                "Worker {} task error after {:?}: {}",
                _outcome.worker_id,
                _outcome.elapsed,
                e
            ),
        };
    }
}

/// Forwards every outcome over an unbounded channel.
///
/// Outcomes are silently dropped once the receiving half is gone.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Outcome>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Outcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl OutcomeSink for ChannelSink {
    fn record(&self, outcome: Outcome) {
        let _ = self.tx.send(outcome);
    }
}
