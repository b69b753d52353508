//! Detached, serializable copies of a subtree.
//!
//! A [`Snapshot`] is a plain owned value with no locks inside. It is what
//! the route table prints for inspection, and it is the usual way to build
//! a fresh tree off to the side before swapping it in with
//! [`Node::replace`](super::Node::replace).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::node::{Node, NodeState};

/// Owned copy of a node and all of its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot<V> {
    /// Value held by the node, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<V>,

    /// Children keyed by segment, in sorted order.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, Snapshot<V>>,
}

impl<V> Snapshot<V> {
    /// Snapshot of an empty node.
    pub fn empty() -> Self {
        Self {
            value: None,
            children: BTreeMap::new(),
        }
    }

    /// Number of valued nodes in the snapshot.
    pub fn len(&self) -> usize {
        usize::from(self.value.is_some())
            + self.children.values().map(Snapshot::len).sum::<usize>()
    }

    /// Returns `true` if no node in the snapshot holds a value.
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.children.values().all(Snapshot::is_empty)
    }
}

impl<V> Default for Snapshot<V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<V: Clone> Node<V> {
    /// Copies this subtree into a [`Snapshot`].
    ///
    /// Each level is copied while it and all of its ancestors are
    /// read-locked, so writers to the copied region wait until the copy of
    /// their subtree is done.
    pub fn snapshot(&self) -> Snapshot<V> {
        let state = self.state.read();
        Snapshot {
            value: state.value.clone(),
            children: state
                .children
                .iter()
                .map(|(segment, child)| (segment.clone(), child.snapshot()))
                .collect(),
        }
    }
}

impl<V> From<Snapshot<V>> for Node<V> {
    fn from(snapshot: Snapshot<V>) -> Self {
        Node::from_state(NodeState {
            value: snapshot.value,
            children: snapshot
                .children
                .into_iter()
                .map(|(segment, child)| (segment, Node::from(child)))
                .collect(),
        })
    }
}
