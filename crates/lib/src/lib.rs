//! keel-lib: build orchestration core for keel
//!
//! This crate executes an already-resolved graph of package builds:
//! - `Task` / `TaskGraph`: the packages to build and their dependencies
//! - `build`: per-task rebuild decisions and the external builder seam
//! - `execute`: the bounded task queue, the dependency fold and the orchestrator
//! - `Config`: resolution of logical task paths against store and project roots

pub mod build;
pub mod config;
pub mod consts;
pub mod execute;
pub mod task;
pub mod util;

pub use config::{Config, ConfigOverrides};
pub use task::{Task, TaskGraph, TaskId};
