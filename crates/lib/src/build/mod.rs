//! Per-task build decisions and execution.
//!
//! Whether a task needs building is decided from its source type and what is
//! on disk; only tasks that need it reach the builder.
//!
//! # Submodules
//!
//! - [`decision`] - Force/build-only policy and the rebuild decision tree
//! - [`info`] - BuildInfo records written by the builder
//! - [`mtime`] - Source tree change detection
//! - [`executor`] - The [`Builder`] seam and single-task execution
//! - [`command`] - A [`Builder`] that spawns an external build program

pub mod command;
pub mod decision;
pub mod executor;
pub mod info;
pub mod mtime;

pub use command::CommandBuilder;
pub use decision::{BuildDecision, BuildOnlyMode, BuildReason, Classification, ForceMode, classify, decide};
pub use executor::{BuildOptions, Builder, build_package};
pub use info::{BuildInfo, read_build_info};
