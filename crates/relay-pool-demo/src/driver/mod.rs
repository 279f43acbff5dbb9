//! Demo driver around the pool.
//!
//! ## Structure
//!
//! - [`config`] - CLI / environment configuration.
//! - [`producer`] - The repeating timestamp task and the loop submitting it.
//! - [`telemetry`] - Log subscriber setup.

pub mod config;
pub mod producer;
pub mod telemetry;
