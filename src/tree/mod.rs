//! Oak Path Tree Implementation
//!
//! This module provides a concurrency-safe tree keyed by sequences of string
//! segments. It supports point lookup, insertion with overwrite,
//! longest-matching-ancestor lookup, subtree replacement and subtree removal,
//! which makes it a natural fit for route tables and hierarchical
//! configuration.
//!
//! # Concurrency Safety
//!
//! * **Per-node locks**: every [`Node`] carries its own reader/writer lock
//!   guarding its value and child table, and nothing inside its children.
//!
//! * **Lock coupling**: an operation holds the lock of every ancestor on its
//!   path while working on the child. Reads couple shared locks, writes couple
//!   exclusive locks.
//!
//! * **Top-down ordering**: locks are only ever acquired from the root towards
//!   the leaves, which rules out deadlock between operations.
//!
//! * **Ownership as garbage collection**: children are owned by their parent's
//!   table, so removing an entry drops the whole subtree.
//!
//! Each operation is atomic with respect to itself only. A reader walking down
//! while writers touch other levels may see different levels at different
//! moments; there is no whole-tree snapshot isolation.

mod node;
pub mod path;
mod snapshot;

pub use node::Node;
pub use path::{join_path, split_path};
pub use snapshot::Snapshot;
