use crate::{
    error::{PoolError, Result},
    stats::PoolStats,
    task::Task,
};
use core::{fmt, time::Duration};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Sending handle onto a pool's submission channel.
///
/// Cheap to clone. The pool stops on its own once every clone has been
/// dropped. Submission is fire-and-forget: success means the task was
/// accepted, not that it ran. With the default rendezvous channel, "accepted"
/// means the relay has taken the task.
#[derive(Clone)]
pub struct Submitter {
    tx: flume::Sender<Task>,
    stats: Arc<PoolStats>,
    shutdown_token: CancellationToken,
}

impl Submitter {
    pub(super) const fn new(
        tx: flume::Sender<Task>,
        stats: Arc<PoolStats>,
        shutdown_token: CancellationToken,
    ) -> Self {
        Self {
            tx,
            stats,
            shutdown_token,
        }
    }

    /// Submits a task, waiting until the relay (or a buffer slot) takes it.
    ///
    /// # Errors
    ///
    /// - [`PoolError::ServiceShutdown`] if the pool is stopping, including
    ///   while this call is waiting.
    /// - [`PoolError::ChannelClosed`] if the pool is no longer running and was
    ///   not stopped through its shutdown token.
    pub async fn submit(&self, task: Task) -> Result<()> {
        if self.shutdown_token.is_cancelled() {
            return Err(PoolError::ServiceShutdown);
        }

        tokio::select! {
            biased;
            () = self.shutdown_token.cancelled() => return Err(PoolError::ServiceShutdown),
            sent = self.tx.send_async(task) => {
                if sent.is_err() {
                    return Err(self.closed());
                }
            }
        }

        self.stats.record_submitted();
        Ok(())
    }

    /// Submits a task only if it can be handed off right now: the relay is
    /// waiting for work, or a buffer slot is free.
    ///
    /// # Errors
    ///
    /// - [`PoolError::Full`] if the task would have to wait.
    /// - [`PoolError::ServiceShutdown`] / [`PoolError::ChannelClosed`] as for
    ///   [`submit`](Self::submit).
    pub fn try_submit(&self, task: Task) -> Result<()> {
        if self.shutdown_token.is_cancelled() {
            return Err(PoolError::ServiceShutdown);
        }

        match self.tx.try_send(task) {
            Ok(()) => {
                self.stats.record_submitted();
                Ok(())
            }
            Err(flume::TrySendError::Full(_)) => Err(PoolError::Full),
            Err(flume::TrySendError::Disconnected(_)) => Err(self.closed()),
        }
    }

    /// Submits a task, waiting at most `timeout` for the hand-off.
    ///
    /// Tries a non-blocking send first and only falls back to waiting when the
    /// channel is full.
    ///
    /// # Errors
    ///
    /// - [`PoolError::Overloaded`] if the task was not accepted in time.
    /// - [`PoolError::ServiceShutdown`] / [`PoolError::ChannelClosed`] as for
    ///   [`submit`](Self::submit).
    pub async fn submit_timeout(&self, task: Task, timeout: Duration) -> Result<()> {
        if self.shutdown_token.is_cancelled() {
            return Err(PoolError::ServiceShutdown);
        }

        let task = match self.tx.try_send(task) {
            Ok(()) => {
                self.stats.record_submitted();
                return Ok(());
            }
            Err(flume::TrySendError::Full(task)) => task,
            Err(flume::TrySendError::Disconnected(_)) => return Err(self.closed()),
        };

        match tokio::time::timeout(timeout, self.submit(task)).await {
            Ok(result) => result,
            Err(_) => Err(PoolError::Overloaded {
                details: format!("submission not accepted within {timeout:?}"),
            }),
        }
    }

    /// Returns `true` once the pool has stopped accepting tasks.
    pub fn is_closed(&self) -> bool {
        self.tx.is_disconnected() || self.shutdown_token.is_cancelled()
    }

    // The relay drops its receiver on cancellation too, so a closed channel
    // after a cancel is reported as a shutdown.
    fn closed(&self) -> PoolError {
        if self.shutdown_token.is_cancelled() {
            PoolError::ServiceShutdown
        } else {
            PoolError::ChannelClosed {
                context: String::from("submission channel closed"),
            }
        }
    }
}

impl fmt::Debug for Submitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submitter")
            .field("closed", &self.is_closed())
            .field("pending", &self.tx.len())
            .finish_non_exhaustive()
    }
}
