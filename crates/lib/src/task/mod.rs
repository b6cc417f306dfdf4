//! Task model.
//!
//! A task is one resolved package instance to build. The caller constructs
//! the graph upstream; this crate only reads it.
//!
//! # Submodules
//!
//! - [`graph`] - Task arena with dependency edges and traversal orders
//! - [`path`] - Logical path handles resolved against [`Config`](crate::Config)

pub mod graph;
pub mod path;
mod types;

pub use graph::{GraphError, GraphFile, TaskGraph};
pub use path::{ConfigPath, ConfigPathError, PathRoot};
pub use types::*;
