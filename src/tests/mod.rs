//! Test modules for Oak.
//!
//! This module contains the crate-internal test suites:
//! - Configuration loading and validation
//! - Error types and reporting
//! - Property-based tests of the tree against a model map
//!
//! Unit tests live next to the code they exercise; multi-threaded tests of
//! the public API live in the `tests/` directory.


pub use test_utils::{non_empty_path_strategy, path_strategy, TestFixture, MAX_PATH_DEPTH};
