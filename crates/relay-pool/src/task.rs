//! The unit of work executed by the pool.
//!
//! A [`Task`] holds exactly one action and exposes a single operation,
//! [`Task::execute`], that runs it to completion on the calling task. The
//! action is shared behind an `Arc`, so a task is cheap to clone and the same
//! task may be submitted any number of times; every execution runs the action
//! again.

use crate::error::{ActionResult, TaskError};
use core::{any::Any, fmt, future::Future, panic::AssertUnwindSafe};
use futures::{FutureExt, future::BoxFuture};
use std::sync::Arc;

type Action = Arc<dyn Fn() -> BoxFuture<'static, ActionResult> + Send + Sync>;

/// A deferred, possibly-failing action.
#[derive(Clone)]
pub struct Task {
    action: Action,
}

impl Task {
    /// Wraps an async action. Each call to [`execute`](Self::execute) invokes
    /// `action` and awaits the returned future.
    pub fn new<F, Fut>(action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult> + Send + 'static,
    {
        Self {
            action: Arc::new(move || action().boxed()),
        }
    }

    /// Wraps a synchronous action. It runs inline on whichever executor picks
    /// the task up, so it should not block for long.
    pub fn from_fn<F>(action: F) -> Self
    where
        F: Fn() -> ActionResult + Send + Sync + 'static,
    {
        Self {
            action: Arc::new(move || futures::future::ready(action()).boxed()),
        }
    }

    /// Runs the action once and reports how it ended.
    ///
    /// A panic raised while invoking or polling the action is caught and
    /// returned as [`TaskError::Panicked`].
    pub async fn execute(&self) -> Result<(), TaskError> {
        let run = AssertUnwindSafe(async { (self.action)().await });
        match run.catch_unwind().await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(TaskError::Failed(e)),
            Err(payload) => Err(TaskError::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        String::from("non-string panic payload")
    }
}
