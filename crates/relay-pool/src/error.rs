//! Error types for the worker pool.
//!
//! Two enums live here, one per side of the pool:
//!
//! - [`PoolError`] is returned by the pool's own API: submitting work and
//!   running the pool.
//! - [`TaskError`] describes how a single unit of work ended badly. It never
//!   travels back to the submitter; executors hand it to the pool's
//!   [`OutcomeSink`](crate::OutcomeSink).

use thiserror::Error;

/// Type-erased error produced by a task's action.
///
/// Anything convertible into this (a `&str`, a `String`, or any
/// `std::error::Error + Send + Sync`) can be returned from an action with `?`
/// or `.into()`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// What a task's action returns.
pub type ActionResult = Result<(), BoxError>;

pub type Result<T, E = PoolError> = core::result::Result<T, E>;

/// Errors surfaced by the pool's submission and run APIs.
#[derive(Error, Debug)]
pub enum PoolError {
    /// The submission or distribution channel has no receiver left.
    #[error("Channel closed: {context}")]
    ChannelClosed { context: String },

    /// A non-blocking submission could not be handed off immediately.
    #[error("Submission channel is full")]
    Full,

    /// A bounded submission could not be accepted in time.
    #[error("Pool is overloaded: {details}")]
    Overloaded { details: String },

    /// The pool's shutdown token has been cancelled.
    #[error("Pool is shutting down")]
    ServiceShutdown,

    /// An executor task terminated abnormally.
    #[error("Worker {worker_id} crashed: {reason}")]
    WorkerCrashed { worker_id: usize, reason: String },

    /// The task driving [`Pool::run`](crate::Pool::run) terminated abnormally.
    #[error("Relay crashed: {reason}")]
    RelayCrashed { reason: String },
}

/// How a single task execution failed.
#[derive(Error, Debug)]
pub enum TaskError {
    /// The action ran to completion and returned an error.
    #[error("task failed: {0}")]
    Failed(#[source] BoxError),

    /// The action panicked. The payload message is kept when it is a string.
    #[error("task panicked: {0}")]
    Panicked(String),
}

impl TaskError {
    /// Builds a [`TaskError::Failed`] from any displayable message.
    pub fn failed(msg: impl Into<BoxError>) -> Self {
        Self::Failed(msg.into())
    }

    pub const fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_error_messages() {
        let err = PoolError::ChannelClosed {
            context: "relay stopped".into(),
        };
        assert_eq!(err.to_string(), "Channel closed: relay stopped");
        assert_eq!(
            PoolError::ServiceShutdown.to_string(),
            "Pool is shutting down"
        );
        let err = PoolError::WorkerCrashed {
            worker_id: 3,
            reason: "join error".into(),
        };
        assert_eq!(err.to_string(), "Worker 3 crashed: join error");
    }

    #[test]
    fn task_error_keeps_source() {
        let io = std::io::Error::other("disk gone");
        let err = TaskError::Failed(Box::new(io));
        assert_eq!(err.to_string(), "task failed: disk gone");
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_panic());
    }

    #[test]
    fn task_error_from_message() {
        let err = TaskError::failed("boom");
        assert_eq!(err.to_string(), "task failed: boom");

        let err = TaskError::Panicked("index out of bounds".into());
        assert!(err.is_panic());
        assert_eq!(err.to_string(), "task panicked: index out of bounds");
    }
}
