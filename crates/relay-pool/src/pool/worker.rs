use crate::{
    outcome::{Outcome, OutcomeSink},
    stats::PoolStats,
    task::Task,
};
use core::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Lifecycle of a single executor.
///
/// Repeatedly claims the next task from the shared distribution channel, runs
/// it to completion, and hands the outcome to `sink`. Only one task runs per
/// executor at a time. Exits when either:
/// - The distribution channel is closed and empty,
/// - The shutdown token is cancelled.
///
/// The token is checked before every receive, so once it is cancelled no
/// queued task is claimed. A task already executing is allowed to finish.
///
/// # Arguments
/// - `worker_id`: Index used in logs and in each [`Outcome`].
/// - `jobs`: This executor's clone of the distribution channel's receiver.
/// - `sink`: Destination of every execution outcome.
/// - `stats`: Pool counters.
/// - `shutdown_token`: Pool-wide stop signal.
pub(super) async fn worker_loop(
    worker_id: usize,
    jobs: flume::Receiver<Task>,
    sink: Arc<dyn OutcomeSink>,
    stats: Arc<PoolStats>,
    shutdown_token: CancellationToken,
) {
    #[cfg(feature = "tracing")]
    tracing::debug!("Worker {} started", worker_id);

    loop {
        let task = tokio::select! {
            biased;
            () = shutdown_token.cancelled() => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Worker {} shutdown via cancellation token", worker_id);
                break;
            }
            task = jobs.recv_async() => match task {
                Ok(task) => task,
                Err(_) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("Worker {} channel closed", worker_id);
                    break;
                }
            },
        };

        run_task(worker_id, &task, sink.as_ref(), &stats).await;

        #[cfg(feature = "tracing")]
        tracing::debug!("Worker {} finished a task", worker_id);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!("Worker {} stopped", worker_id);
}

async fn run_task(worker_id: usize, task: &Task, sink: &dyn OutcomeSink, stats: &PoolStats) {
    stats.begin_execution();
    let started = Instant::now();
    let result = task.execute().await;
    let elapsed = started.elapsed();

    let panicked = result.as_ref().is_err_and(|e| e.is_panic());
    stats.end_execution(result.is_err(), panicked);

    let outcome = Outcome {
        worker_id,
        elapsed,
        result,
    };
    // A panicking sink loses this outcome but must not take the executor down.
    if let Err(_payload) = std::panic::catch_unwind(AssertUnwindSafe(|| sink.record(outcome))) {
        #[cfg(feature = "tracing")]
        tracing::error!(
            "Worker {} outcome sink panicked: {}",
            worker_id,
            crate::task::panic_message(_payload.as_ref())
        );
    }
}
