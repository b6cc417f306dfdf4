//! Integration tests for keel-lib orchestration.

mod common;
mod persistence_tests;
