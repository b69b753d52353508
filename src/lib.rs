//! Oak Library
//!
//! Oak is a concurrency-safe, in-memory tree keyed by sequences of string
//! segments. It is meant to be embedded as a lookup table, for example for
//! request routing or hierarchical configuration, and accessed by many
//! concurrent readers and writers without a global lock.
//!
//! # Architecture
//!
//! - [`tree::Node`] is the whole data structure: every node owns its value and
//!   children and guards them with its own reader/writer lock.
//! - [`routes::RouteTable`] wraps a shared root with textual paths and
//!   configuration-driven loading.
//! - [`config`] and [`error`] carry the ambient configuration and error types
//!   used by the route table and the `oak` binary.
//!
//! ```
//! use oak_lib::tree::Node;
//!
//! let root = Node::new();
//! root.set(&["cat"], "Categories");
//! root.set(&["cat", "news", "headlines"], "Headlines");
//!
//! assert_eq!(root.get(&["cat", "news"]), None);
//! assert_eq!(root.longest_match(&["cat", "news"]), Some("Categories"));
//! assert!(root.remove(&["cat"]));
//! assert_eq!(root.longest_match(&["cat", "news", "headlines"]), None);
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod tree;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

pub use tree::{Node, Snapshot};

/// Version information for Oak.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
