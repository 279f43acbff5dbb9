use anyhow::bail;
use clap::Parser;
use core::{num::NonZeroU64, time::Duration};
use relay_pool::PoolConfig;

/// Runtime configuration for the `relay-pool-demo` binary.
///
/// Every value can be given as a CLI flag or through the environment (a `.env`
/// file in the working directory is loaded first).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "relay-pool-demo",
    version,
    about = "Feeds a repeating timestamp task through a fixed-size worker pool"
)]
pub struct CliArgs {
    /// Number of executors in the pool.
    ///
    /// Environment variable: `NUM_WORKERS`
    #[arg(long, env = "NUM_WORKERS", default_value_t = 4)]
    pub num_workers: usize,

    /// Slots in the submission channel between the producer and the relay.
    ///
    /// `0` is a direct hand-off; larger values let the producer run further
    /// ahead of the executors before it is throttled.
    ///
    /// Environment variable: `SUBMISSION_BUFFER`
    #[arg(long, env = "SUBMISSION_BUFFER", default_value_t = 0)]
    pub submission_buffer: usize,

    /// Slots in the distribution channel between the relay and the executors.
    ///
    /// `0` is a direct hand-off.
    ///
    /// Environment variable: `DISTRIBUTION_BUFFER`
    #[arg(long, env = "DISTRIBUTION_BUFFER", default_value_t = 0)]
    pub distribution_buffer: usize,

    /// Stop submitting after this many tasks. `0` submits until interrupted.
    ///
    /// Environment variable: `TASK_LIMIT`
    #[arg(long, env = "TASK_LIMIT", default_value_t = 0)]
    pub task_limit: u64,

    /// Pause between two submissions, in milliseconds.
    ///
    /// Environment variable: `SUBMIT_INTERVAL_MS`
    #[arg(long, env = "SUBMIT_INTERVAL_MS", default_value_t = 0)]
    pub submit_interval_ms: u64,

    /// Log the running submission count every N submissions.
    ///
    /// Environment variable: `REPORT_EVERY`
    #[arg(long, env = "REPORT_EVERY", default_value_t = 1)]
    pub report_every: u64,
}

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub pool: PoolConfig,
    pub task_limit: Option<u64>,
    pub submit_interval: Option<Duration>,
    pub report_every: NonZeroU64,
}

impl TryFrom<CliArgs> for DemoConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.num_workers == 0 {
            bail!("NUM_WORKERS must be greater than 0");
        }

        let Some(report_every) = NonZeroU64::new(args.report_every) else {
            bail!("REPORT_EVERY must be greater than 0");
        };

        let pool = PoolConfig::new(args.num_workers)
            .with_submission_buffer(args.submission_buffer)
            .with_distribution_buffer(args.distribution_buffer);

        Ok(Self {
            pool,
            task_limit: (args.task_limit > 0).then_some(args.task_limit),
            submit_interval: (args.submit_interval_ms > 0)
                .then(|| Duration::from_millis(args.submit_interval_ms)),
            report_every,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(flags: &[&str]) -> anyhow::Result<DemoConfig> {
        let argv = core::iter::once("relay-pool-demo").chain(flags.iter().copied());
        DemoConfig::try_from(CliArgs::try_parse_from(argv)?)
    }

    #[test]
    fn explicit_flags() {
        let config = parse(&[
            "--num-workers",
            "8",
            "--submission-buffer",
            "16",
            "--distribution-buffer",
            "2",
            "--task-limit",
            "100",
            "--submit-interval-ms",
            "250",
            "--report-every",
            "10",
        ])
        .unwrap();

        assert_eq!(config.pool.workers, 8);
        assert_eq!(config.pool.submission_buffer, 16);
        assert_eq!(config.pool.distribution_buffer, 2);
        assert_eq!(config.task_limit, Some(100));
        assert_eq!(config.submit_interval, Some(Duration::from_millis(250)));
        assert_eq!(config.report_every.get(), 10);
    }

    #[test]
    fn zero_means_unbounded() {
        let config = parse(&["--task-limit", "0", "--submit-interval-ms", "0"]).unwrap();
        assert_eq!(config.task_limit, None);
        assert_eq!(config.submit_interval, None);
    }

    #[test]
    fn rejects_zero_workers() {
        let err = parse(&["--num-workers", "0"]).unwrap_err();
        assert!(err.to_string().contains("NUM_WORKERS"));
    }

    #[test]
    fn buffers_default_to_direct_hand_offs() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.pool.submission_buffer, 0);
        assert_eq!(config.pool.distribution_buffer, 0);
    }

    #[test]
    fn rejects_zero_report_interval() {
        let err = parse(&["--report-every", "0"]).unwrap_err();
        assert!(err.to_string().contains("REPORT_EVERY"));
    }
}
