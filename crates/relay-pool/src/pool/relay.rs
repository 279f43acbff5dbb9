use crate::{stats::PoolStats, task::Task};
use tokio_util::sync::CancellationToken;

/// Moves tasks from the submission channel to the distribution channel.
///
/// Tasks are forwarded one at a time, unmodified, in the order they were
/// received. Both the receive and the send suspend the relay, which is what
/// carries backpressure from the executors back to the submitters.
///
/// The loop exits when:
/// - the shutdown token is cancelled (a task held for sending is dropped),
/// - the submission channel is closed and empty,
/// - the distribution channel has no receiver left.
///
/// Cancellation is checked before either channel at every suspension point, so
/// a cancelled relay never forwards another task. `jobs_tx` is dropped on exit,
/// which lets idle executors observe a closed distribution channel once it is
/// empty.
pub(super) async fn relay_loop(
    entry_rx: flume::Receiver<Task>,
    jobs_tx: flume::Sender<Task>,
    stats: &PoolStats,
    shutdown_token: &CancellationToken,
) {
    #[cfg(feature = "tracing")]
    tracing::debug!("Relay started");

    loop {
        let task = tokio::select! {
            biased;
            () = shutdown_token.cancelled() => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Relay shutdown via cancellation token");
                break;
            }
            task = entry_rx.recv_async() => match task {
                Ok(task) => task,
                Err(_) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("Relay submission channel closed");
                    break;
                }
            },
        };

        tokio::select! {
            biased;
            () = shutdown_token.cancelled() => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Relay shutdown while handing off a task");
                break;
            }
            sent = jobs_tx.send_async(task) => {
                if sent.is_err() {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("Relay distribution channel closed");
                    break;
                }
                stats.record_relayed();
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!("Relay stopped");
}
