use crate::driver::config::DemoConfig;
use portable_atomic::{AtomicU64, Ordering};
use relay_pool::{Submitter, Task};
use std::sync::Arc;

/// The demo's unit of work: log the current local time.
pub fn timestamp_task() -> Task {
    Task::from_fn(|| {
        tracing::info!("Current time: {}", chrono::Local::now().to_rfc3339());
        Ok(())
    })
}

/// Submits `task` over and over until the configured limit is reached or the
/// pool stops accepting work.
///
/// `submitted` is shared with the caller, which reads it for the final report.
/// Returns the number of submissions this producer made.
pub async fn produce(
    submitter: Submitter,
    task: Task,
    config: DemoConfig,
    submitted: Arc<AtomicU64>,
) -> u64 {
    let mut made = 0;

    loop {
        if config.task_limit.is_some_and(|limit| made >= limit) {
            tracing::info!("Task limit of {} reached", made);
            break;
        }

        if let Err(e) = submitter.submit(task.clone()).await {
            tracing::info!("Producer stopped: {}", e);
            break;
        }
        made += 1;

        let total = submitted.fetch_add(1, Ordering::Relaxed) + 1;
        if total % config.report_every.get() == 0 {
            tracing::info!("{} tasks submitted so far", total);
        }

        if let Some(interval) = config.submit_interval {
            tokio::time::sleep(interval).await;
        }
    }

    made
}
