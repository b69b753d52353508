//! Path parsing error module.
//!
//! This module defines error types that may occur while turning textual
//! paths into segment sequences.

use thiserror::Error;

/// Errors that can occur while parsing a textual path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The configured separator is the empty string.
    #[error("Path separator must not be empty")]
    EmptySeparator,

    /// Two separators are adjacent, leaving an empty segment between them.
    #[error("Empty segment at position {position} in path '{path}'")]
    EmptySegment {
        /// The offending path
        path: String,
        /// Zero-based index of the empty segment
        position: usize,
    },
}
