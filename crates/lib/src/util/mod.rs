//! Shared helpers.
//!
//! - [`fs`] - existence checks and a pruning directory fold
//! - [`perf`] - wall-clock measurement of async operations

pub mod fs;
pub mod perf;
