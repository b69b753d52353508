//! Route table built on top of the path tree.
//!
//! [`RouteTable`] is the string-facing front end: it splits textual paths on
//! the configured separator, stores route targets in a shared [`Node`] and
//! answers exact or longest-prefix lookups. Reloading builds a complete new
//! tree off to the side and swaps it into the existing root, so handles
//! obtained through [`RouteTable::root`] stay valid across reloads.

use std::sync::Arc;

use crate::config::{LookupMode, OakConfig, RouteEntry, TableConfig, Validate};
use crate::error::OakResult;
use crate::tree::{split_path, Node, Snapshot};

/// String-keyed route table sharing a single tree root.
#[derive(Debug, Clone)]
pub struct RouteTable {
    root: Arc<Node<String>>,
    separator: String,
    default_mode: LookupMode,
}

impl RouteTable {
    /// Creates an empty route table.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `table` is invalid.
    pub fn new(table: &TableConfig) -> OakResult<Self> {
        table.validate()?;
        Ok(Self {
            root: Arc::new(Node::new()),
            separator: table.separator.clone(),
            default_mode: table.default_mode,
        })
    }

    /// Creates a route table holding `routes`.
    ///
    /// Later entries overwrite earlier ones with the same path. Every entry
    /// is validated the same way [`ConfigLoader`](crate::config::ConfigLoader)
    /// validates routes read from a file.
    pub fn from_routes(table: &TableConfig, routes: &[RouteEntry]) -> OakResult<Self> {
        let mut route_table = Self::new(table)?;
        route_table.root = Arc::new(route_table.build_tree(routes)?);
        Ok(route_table)
    }

    /// Creates a route table from a configuration.
    ///
    /// The whole configuration is validated first, so a hand-built
    /// `OakConfig` is held to the same rules as a loaded one.
    pub fn from_config(config: &OakConfig) -> OakResult<Self> {
        config.validate()?;
        Self::from_routes(&config.table, &config.routes)
    }

    /// Shared handle to the root node.
    pub fn root(&self) -> Arc<Node<String>> {
        Arc::clone(&self.root)
    }

    /// Separator used to split textual paths.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Resolves `path` using the configured default lookup.
    pub fn lookup(&self, path: &str) -> OakResult<Option<String>> {
        self.lookup_with(path, self.default_mode)
    }

    /// Resolves `path` using the given lookup.
    pub fn lookup_with(&self, path: &str, mode: LookupMode) -> OakResult<Option<String>> {
        let segments = split_path(path, &self.separator)?;
        let target = match mode {
            LookupMode::Exact => self.root.get(&segments),
            LookupMode::Longest => self.root.longest_match(&segments),
        };

        tracing::debug!(path, ?mode, found = target.is_some(), "Route lookup");
        Ok(target)
    }

    /// Longest-prefix lookup of `path`.
    pub fn resolve(&self, path: &str) -> OakResult<Option<String>> {
        self.lookup_with(path, LookupMode::Longest)
    }

    /// Exact lookup of `path`.
    pub fn lookup_exact(&self, path: &str) -> OakResult<Option<String>> {
        self.lookup_with(path, LookupMode::Exact)
    }

    /// Stores `target` at `path`, overwriting any previous target there.
    pub fn insert<T: Into<String>>(&self, path: &str, target: T) -> OakResult<()> {
        let route = RouteEntry::new(path, target);
        route.validate()?;
        let segments = split_path(path, &self.separator)?;
        self.root.set(&segments, route.target);
        tracing::debug!(path, "Route inserted");
        Ok(())
    }

    /// Removes the route at `path` together with every route below it.
    ///
    /// The root path can never be removed, so `"/"` always yields `false`.
    pub fn remove(&self, path: &str) -> OakResult<bool> {
        let segments = split_path(path, &self.separator)?;
        let removed = self.root.remove(&segments);
        tracing::debug!(path, removed, "Route removal");
        Ok(removed)
    }

    /// Replaces the whole table with `routes`.
    ///
    /// The new tree is built before the root is touched, so a malformed route
    /// leaves the current table untouched, and readers see either the old or
    /// the new table at the root.
    pub fn reload(&self, routes: &[RouteEntry]) -> OakResult<()> {
        let tree = self.build_tree(routes)?;
        self.root.replace(&[] as &[&str], tree);
        tracing::info!(routes = routes.len(), "Route table reloaded");
        Ok(())
    }

    /// Number of stored routes.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Returns `true` if the table holds no routes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Detached copy of the whole table.
    pub fn snapshot(&self) -> Snapshot<String> {
        self.root.snapshot()
    }

    fn build_tree(&self, routes: &[RouteEntry]) -> OakResult<Node<String>> {
        let tree = Node::new();
        for route in routes {
            route.validate()?;
            let segments = split_path(&route.path, &self.separator)?;
            tree.set(&segments, route.target.clone());
        }
        Ok(tree)
    }
}
