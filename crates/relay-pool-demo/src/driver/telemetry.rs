//! Log output for the demo.
//!
//! Events from the demo and from `relay-pool` (built with its `tracing`
//! feature) are printed through `tracing_subscriber::fmt`. The filter defaults
//! to `info,relay_pool=debug`, which shows progress notices, failing tasks and
//! every executor's "finished a task" notice; set `RUST_LOG` to change it.

use anyhow::Context;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,relay_pool=debug";

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true)
                .pretty(),
        )
        .try_init()
        .context("failed to install the tracing subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn default_filter_shows_worker_completions() {
        let filter = EnvFilter::try_new(DEFAULT_FILTER).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
        assert!(DEFAULT_FILTER.contains("relay_pool=debug"));
    }
}
