//! Node implementation for the Oak path tree.
//!
//! A [`Node`] is both a vertex and a whole tree: it owns an optional value
//! and a table of children keyed by path segment. Every node guards its own
//! state with a reader/writer lock, and locks are always acquired from the
//! root towards the leaves. A parent's guard stays alive for the full
//! duration of the recursive call into the child (lock coupling), so there is
//! no fixed global lock and no bottom-up acquisition that could deadlock.

use std::fmt;
use std::mem;

use fnv::FnvBuildHasher;
use hashbrown::HashMap;
use parking_lot::RwLock;

/// Child table of a node. Each entry is exclusively owned by its parent.
pub(crate) type Children<V> = HashMap<String, Node<V>, FnvBuildHasher>;

/// State guarded by a node's lock.
pub(crate) struct NodeState<V> {
    /// Stored payload; `None` for scaffolding nodes created during insertion.
    pub(crate) value: Option<V>,

    /// Children keyed by segment.
    pub(crate) children: Children<V>,
}

impl<V> NodeState<V> {
    pub(crate) fn empty() -> Self {
        Self {
            value: None,
            children: Children::default(),
        }
    }
}

/// A vertex of the path tree.
///
/// The root of a table is simply a `Node` created by the caller, usually
/// behind an `Arc` so that many threads can share it. Interior nodes are
/// created on demand by [`Node::set`] and destroyed only by [`Node::remove`],
/// [`Node::replace`] or [`Node::clear`] on themselves or an ancestor.
///
/// # Type Parameters
///
/// * `V` - Payload stored at nodes. The tree imposes no schema on it.
pub struct Node<V> {
    pub(crate) state: RwLock<NodeState<V>>,
}

impl<V> Node<V> {
    /// Creates an empty node with no value and no children.
    pub fn new() -> Self {
        Self::from_state(NodeState::empty())
    }

    /// Creates a childless node holding `value`.
    pub fn with_value(value: V) -> Self {
        Self::from_state(NodeState {
            value: Some(value),
            children: Children::default(),
        })
    }

    pub(crate) fn from_state(state: NodeState<V>) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    fn into_state(self) -> NodeState<V> {
        self.state.into_inner()
    }

    /// Looks up the value stored at `path`.
    ///
    /// The empty path denotes this node. Traversal follows existing children
    /// only; a node that exists but holds no value yields `None`, exactly like
    /// a path that does not resolve at all.
    ///
    /// # Arguments
    ///
    /// * `path` - Segments to follow from this node.
    ///
    /// # Returns
    ///
    /// A clone of the stored value, or `None` if there is none.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<V>
    where
        V: Clone,
    {
        self.get_with(path, V::clone)
    }

    /// Like [`Node::get`], but hands a reference to the stored value to `f`
    /// instead of cloning it.
    ///
    /// `f` runs while every node on the path is read-locked. It must not call
    /// into this tree at all, not even for a read: shared locks are not
    /// reentrant, and a writer queued on any node of the path would leave
    /// the nested call waiting forever. Return what you need from `f` and
    /// act on it once `get_with` has returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use oak_lib::Node;
    ///
    /// let tree = Node::new();
    /// tree.set(&["alias"], "target".to_string());
    /// tree.set(&["target"], "resolved".to_string());
    ///
    /// // Copy the alias out first, then follow it with a second lookup.
    /// let next = tree.get_with(&["alias"], |name| name.clone()).unwrap();
    /// assert_eq!(tree.get(&[next]).as_deref(), Some("resolved"));
    /// ```
    pub fn get_with<S, F, R>(&self, path: &[S], f: F) -> Option<R>
    where
        S: AsRef<str>,
        F: FnOnce(&V) -> R,
    {
        let state = self.state.read();

        match path.split_first() {
            None => state.value.as_ref().map(f),
            Some((segment, rest)) => state.children.get(segment.as_ref())?.get_with(rest, f),
        }
    }

    /// Returns `true` if `path` resolves to a node that holds a value.
    pub fn contains<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.get_with(path, |_| ()).is_some()
    }

    /// Longest-prefix lookup.
    ///
    /// Walks `path` as far as existing children allow and returns the value
    /// of the deepest node along the way that holds one. The node at the full
    /// path wins over any of its ancestors when it exists and holds a value.
    ///
    /// # Arguments
    ///
    /// * `path` - Segments to follow from this node.
    ///
    /// # Returns
    ///
    /// A clone of the deepest value seen, or `None` if no node from this one
    /// down to the deepest resolvable point holds a value.
    pub fn longest_match<S: AsRef<str>>(&self, path: &[S]) -> Option<V>
    where
        V: Clone,
    {
        self.longest_match_with(path, V::clone)
    }

    /// Like [`Node::longest_match`], but hands a reference to the matched
    /// value to `f` instead of cloning it.
    ///
    /// The same rule as for [`Node::get_with`] applies: `f` runs under the
    /// read-lock chain and must not call into this tree.
    pub fn longest_match_with<S, F, R>(&self, path: &[S], f: F) -> Option<R>
    where
        S: AsRef<str>,
        F: FnOnce(&V) -> R,
    {
        let mut f = Some(f);
        self.deepest_value(path, &mut f)
    }

    // `f` is consumed by whichever level produces the result; deeper levels
    // get the first chance while every ancestor is still read-locked.
    fn deepest_value<S, F, R>(&self, path: &[S], f: &mut Option<F>) -> Option<R>
    where
        S: AsRef<str>,
        F: FnOnce(&V) -> R,
    {
        let state = self.state.read();

        if let Some((segment, rest)) = path.split_first() {
            if let Some(child) = state.children.get(segment.as_ref()) {
                if let Some(found) = child.deepest_value(rest, f) {
                    return Some(found);
                }
            }
        }

        let value = state.value.as_ref()?;
        f.take().map(|f| f(value))
    }

    /// Stores `value` at `path`, creating missing intermediate nodes.
    ///
    /// Any value previously stored at exactly `path` is overwritten; values at
    /// ancestors, siblings and descendants are left alone. This node's
    /// exclusive lock is held for the whole descent, so two writers whose
    /// paths share a prefix are serialized at the shared ancestor while
    /// writers under disjoint children proceed in parallel.
    ///
    /// # Arguments
    ///
    /// * `path` - Segments to follow from this node.
    /// * `value` - Value to store.
    pub fn set<S: AsRef<str>>(&self, path: &[S], value: V) {
        let mut state = self.state.write();

        match path.split_first() {
            None => state.value = Some(value),
            Some((segment, rest)) => {
                // Lookup and insertion happen inside one exclusive section, so
                // concurrent writers can never both create the same child.
                let child = state
                    .children
                    .entry_ref(segment.as_ref())
                    .or_insert_with(Node::new);
                child.set(rest, value);
            }
        }
    }

    /// Removes and returns the value stored at `path`.
    ///
    /// The node itself stays in the tree, together with its children, even
    /// when it ends up with neither a value nor children.
    pub fn clear_value<S: AsRef<str>>(&self, path: &[S]) -> Option<V> {
        let mut state = self.state.write();

        match path.split_first() {
            None => state.value.take(),
            Some((segment, rest)) => state.children.get(segment.as_ref())?.clear_value(rest),
        }
    }

    /// Detaches the subtree rooted at `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Segments to follow from this node.
    ///
    /// # Returns
    ///
    /// `true` if a node was removed. `false` if the path does not resolve, or
    /// if it is empty: a node can never remove itself, only its contents can
    /// be cleared.
    pub fn remove<S: AsRef<str>>(&self, path: &[S]) -> bool {
        let Some((segment, rest)) = path.split_first() else {
            return false;
        };

        let mut state = self.state.write();

        if rest.is_empty() {
            let detached = state.children.remove(segment.as_ref());
            // The subtree is dropped after the lock is released.
            drop(state);
            return detached.is_some();
        }

        match state.children.get(segment.as_ref()) {
            Some(child) => child.remove(rest),
            None => false,
        }
    }

    /// Replaces the node at `path` with the contents of `node`.
    ///
    /// The target adopts the replacement's value and children wholesale and
    /// its previous contents are discarded. With the empty path the contents
    /// of this node are swapped in place, so external references to it stay
    /// valid and observe the new table.
    ///
    /// # Arguments
    ///
    /// * `path` - Segments to follow from this node.
    /// * `node` - Replacement value and children.
    ///
    /// # Returns
    ///
    /// `true` if the target existed and was replaced, `false` otherwise (in
    /// which case `node` is dropped).
    pub fn replace<S: AsRef<str>>(&self, path: &[S], node: Node<V>) -> bool {
        let mut state = self.state.write();

        match path.split_first() {
            None => {
                let previous = mem::replace(&mut *state, node.into_state());
                drop(state);
                drop(previous);
                true
            }
            Some((segment, rest)) => match state.children.get(segment.as_ref()) {
                Some(child) => child.replace(rest, node),
                None => false,
            },
        }
    }

    /// Drops this node's value and every child. The node itself stays valid.
    pub fn clear(&self) {
        let previous = mem::replace(&mut *self.state.write(), NodeState::empty());
        drop(previous);
    }

    /// Counts the nodes holding a value in this subtree, this node included.
    ///
    /// This walks the whole subtree under read-lock coupling, so it is O(n).
    pub fn len(&self) -> usize {
        let state = self.state.read();
        let own = usize::from(state.value.is_some());
        own + state.children.values().map(Node::len).sum::<usize>()
    }

    /// Returns `true` if no node in this subtree holds a value, i.e. when
    /// [`Node::len`] would return 0. Empty scaffolding nodes left behind by
    /// [`Node::clear_value`] or [`Node::remove`] do not count.
    pub fn is_empty(&self) -> bool {
        let state = self.state.read();
        state.value.is_none() && state.children.values().all(Node::is_empty)
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.state.read().children.len()
    }
}

impl<V> Default for Node<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(Vec<String>, V)> for Node<V> {
    fn from_iter<I: IntoIterator<Item = (Vec<String>, V)>>(iter: I) -> Self {
        let root = Node::new();
        for (path, value) in iter {
            root.set(&path, value);
        }
        root
    }
}

impl<V: fmt::Debug> fmt::Debug for Node<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Formatting must never block on a writer holding this node.
        match self.state.try_read() {
            Some(state) => f
                .debug_struct("Node")
                .field("value", &state.value)
                .field("children", &state.children)
                .finish(),
            None => f.debug_struct("Node").field("state", &"<locked>").finish(),
        }
    }
}
