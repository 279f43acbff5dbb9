//! The worker pool.
//!
//! A [`Pool`] owns two hand-off channels and a fixed executor count:
//!
//! ```text
//! Submitter ──▶ submission channel ──▶ relay ──▶ distribution channel ──▶ worker 0..N
//! ```
//!
//! - Producers push [`Task`]s through a [`Submitter`].
//! - A single relay task moves each task, unmodified and in arrival order, from
//!   the submission channel to the distribution channel.
//! - `N` worker tasks each hold a clone of the distribution channel's
//!   receiver; whichever is idle claims the next task and runs it to completion
//!   before asking for another.
//!
//! Both channels are rendezvous channels by default: a send completes only
//! when the other side takes the task. A blocked executor stage therefore
//! stalls the relay, which in turn stalls submitters.
//!
//! The pool runs until its shutdown token is cancelled or every [`Submitter`]
//! has been dropped. Queued tasks are not drained on cancellation.

mod relay;
mod submitter;
mod worker;


pub use submitter::Submitter;

use crate::{
    config::PoolConfig,
    error::{PoolError, Result},
    outcome::{LogSink, OutcomeSink},
    stats::PoolStats,
    task::Task,
};
use relay::relay_loop;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use worker::worker_loop;

/// A fixed-size pool of executors fed through a relay stage.
pub struct Pool {
    worker_num: usize,
    entry_tx: flume::Sender<Task>,
    entry_rx: flume::Receiver<Task>,
    jobs_tx: flume::Sender<Task>,
    jobs_rx: flume::Receiver<Task>,
    sink: Arc<dyn OutcomeSink>,
    stats: Arc<PoolStats>,
    shutdown_token: CancellationToken,
}

impl Pool {
    /// Creates a pool with `capacity` executors and default buffer sizes.
    ///
    /// A capacity of zero is accepted; such a pool relays submissions but never
    /// executes them.
    pub fn new(capacity: usize) -> Self {
        Self::with_config(PoolConfig::new(capacity))
    }

    pub fn with_config(config: PoolConfig) -> Self {
        let (entry_tx, entry_rx) = flume::bounded(config.submission_buffer);
        let (jobs_tx, jobs_rx) = flume::bounded(config.distribution_buffer);

        Self {
            worker_num: config.workers,
            entry_tx,
            entry_rx,
            jobs_tx,
            jobs_rx,
            sink: Arc::new(LogSink),
            stats: Arc::new(PoolStats::new()),
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Replaces the sink that receives every execution [`Outcome`].
    ///
    /// [`Outcome`]: crate::Outcome
    #[must_use]
    pub fn with_sink(mut self, sink: impl OutcomeSink) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub const fn worker_num(&self) -> usize {
        self.worker_num
    }

    /// Returns a new handle onto the submission channel.
    pub fn submitter(&self) -> Submitter {
        Submitter::new(
            self.entry_tx.clone(),
            self.stats.clone(),
            self.shutdown_token.clone(),
        )
    }

    pub fn stats(&self) -> Arc<PoolStats> {
        self.stats.clone()
    }

    /// Token that stops the relay and every executor when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Spawns the executors and runs the relay on the current task.
    ///
    /// Returns once the relay has stopped and every executor has exited: after
    /// the shutdown token is cancelled, or after the last [`Submitter`] is
    /// dropped and the remaining tasks have been executed. Obtain submitters
    /// before calling this; the pool's own sending half is released here.
    pub async fn run(self) -> Result<()> {
        let Self {
            worker_num,
            entry_tx,
            entry_rx,
            jobs_tx,
            jobs_rx,
            sink,
            stats,
            shutdown_token,
        } = self;
        drop(entry_tx);

        if worker_num == 0 {
            #[cfg(feature = "tracing")]
            tracing::warn!("Pool started with zero workers; submitted tasks will never run");
        }

        #[cfg(feature = "tracing")]
        tracing::info!("Starting pool with {} workers", worker_num);

        let mut workers = Vec::with_capacity(worker_num);
        for worker_id in 0..worker_num {
            workers.push(tokio::spawn(worker_loop(
                worker_id,
                jobs_rx.clone(),
                sink.clone(),
                stats.clone(),
                shutdown_token.clone(),
            )));
        }

        // `jobs_rx` stays alive until the relay exits, so with zero workers the
        // relay parks on its first send instead of seeing a closed channel.
        relay_loop(entry_rx, jobs_tx, &stats, &shutdown_token).await;
        drop(jobs_rx);

        let exits = futures::future::join_all(workers).await;
        for (worker_id, exit) in exits.into_iter().enumerate() {
            if let Err(e) = exit {
                #[cfg(feature = "tracing")]
                tracing::error!("Worker {} exited abnormally: {}", worker_id, e);
                return Err(PoolError::WorkerCrashed {
                    worker_id,
                    reason: e.to_string(),
                });
            }
        }

        #[cfg(feature = "tracing")]
        tracing::info!("Pool stopped");
        Ok(())
    }

    /// Spawns [`run`](Self::run) onto the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn start(self) -> PoolHandle {
        let submitter = self.submitter();
        let stats = self.stats();
        let shutdown_token = self.shutdown_token();
        let join = tokio::spawn(self.run());

        PoolHandle {
            submitter,
            stats,
            shutdown_token,
            join,
        }
    }
}

/// A running pool, as returned by [`Pool::start`].
pub struct PoolHandle {
    submitter: Submitter,
    stats: Arc<PoolStats>,
    shutdown_token: CancellationToken,
    join: JoinHandle<Result<()>>,
}

impl PoolHandle {
    pub fn submitter(&self) -> Submitter {
        self.submitter.clone()
    }

    pub fn stats(&self) -> Arc<PoolStats> {
        self.stats.clone()
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Cancels the pool and waits for it to stop.
    ///
    /// Tasks still queued are dropped. Tasks already executing finish first.
    pub async fn shutdown(self) -> Result<()> {
        self.shutdown_token.cancel();
        Self::join(self.join).await
    }

    /// Releases this handle's submitter and waits for the pool to stop on its
    /// own, which happens once every other [`Submitter`] clone is gone and the
    /// queued tasks have run.
    pub async fn wait(self) -> Result<()> {
        drop(self.submitter);
        Self::join(self.join).await
    }

    async fn join(join: JoinHandle<Result<()>>) -> Result<()> {
        match join.await {
            Ok(result) => result,
            Err(e) => Err(PoolError::RelayCrashed {
                reason: e.to_string(),
            }),
        }
    }
}
