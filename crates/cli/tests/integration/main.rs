//! CLI integration tests for keel.

mod build_tests;
mod status_tests;
