//! # `relay-pool`: a fixed-size async worker pool
//!
//! `relay-pool` runs caller-supplied units of work on a fixed number of Tokio
//! tasks. Work flows through two bounded hand-off channels joined by a relay:
//!
//! ```text
//! producers ─▶ submission channel ─▶ relay ─▶ distribution channel ─▶ N executors
//! ```
//!
//! The pool accepts work, runs each submitted unit exactly once, and reports
//! nothing back to the submitter. What a unit does, and what happens to its
//! result, is up to the caller: failures and panics are caught per unit and
//! handed to a pluggable [`OutcomeSink`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use relay_pool::{Pool, Task};
//!
//! # async fn demo() -> relay_pool::Result<()> {
//! let pool = Pool::new(4);
//! let submitter = pool.submitter();
//!
//! tokio::spawn(async move {
//!     let task = Task::from_fn(|| {
//!         println!("tick");
//!         Ok(())
//!     });
//!     while submitter.submit(task.clone()).await.is_ok() {}
//! });
//!
//! pool.run().await
//! # }
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit worker, relay and outcome diagnostics through
//!   [`tracing`](https://docs.rs/tracing).

mod config;
mod error;
mod outcome;
mod pool;
mod stats;
mod task;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::outcome::*;
pub use crate::pool::*;
pub use crate::stats::*;
pub use crate::task::*;
