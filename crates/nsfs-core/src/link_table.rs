// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Name-keyed link index
//!
//! The link table maps a bare name (not a path) to the node it was last
//! associated with. It does not own anything: removing a node from the tree
//! leaves its entry behind, and readers treat such stale entries as absent.

use std::collections::HashMap;

use crate::error::NsResult;
use crate::tree::Tree;
use crate::types::NodeId;

#[derive(Clone, Debug, Default)]
pub(crate) struct LinkTable {
    entries: HashMap<String, NodeId>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `name` with `id`, replacing any prior association
    pub fn register(&mut self, name: &str, id: NodeId) {
        if let Some(previous) = self.entries.insert(name.to_string(), id) {
            if previous != id {
                tracing::trace!(entry = name, %previous, %id, "link table entry replaced");
            }
        }
    }

    /// Raw lookup, possibly stale
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.entries.get(name).copied()
    }

    /// Lookup that ignores entries whose node no longer exists
    pub fn resolve(&self, tree: &Tree, name: &str) -> Option<NodeId> {
        self.get(name).filter(|id| tree.contains(*id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn stale_entries(&self, tree: &Tree) -> usize {
        self.entries.values().filter(|id| !tree.contains(**id)).count()
    }

    /// Create a symlink under `parent` and register it by name.
    /// The target is stored verbatim and never validated.
    pub fn create_symlink(
        &mut self,
        tree: &mut Tree,
        parent: NodeId,
        name: &str,
        target: &str,
    ) -> NsResult<NodeId> {
        let id = tree.create_symlink(parent, name, target)?;
        self.register(name, id);
        Ok(id)
    }

    /// Create a file under `parent` holding a copy of the content of the file
    /// registered as `existing`.
    ///
    /// Returns `Ok(None)` without touching the tree when `existing` is absent,
    /// stale, or not a file. The copy is independent of the source afterwards.
    pub fn create_hard_link(
        &mut self,
        tree: &mut Tree,
        parent: NodeId,
        new_name: &str,
        existing: &str,
    ) -> NsResult<Option<NodeId>> {
        let Some(content) = self
            .resolve(tree, existing)
            .and_then(|id| tree.get(id))
            .and_then(|node| node.content())
            .map(str::to_string)
        else {
            tracing::debug!(new_name, existing, "hard link source missing or not a file");
            return Ok(None);
        };

        let id = tree.create_file(parent, new_name, content)?;
        self.register(new_name, id);
        Ok(Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_root(tree: &Tree) -> LinkTable {
        let mut links = LinkTable::new();
        links.register("/", tree.root());
        links
    }

    #[test]
    fn test_register_overwrites() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.create_file(root, "x", String::new()).unwrap();
        let b = tree.create_file(root, "x", String::new()).unwrap();

        let mut links = LinkTable::new();
        links.register("x", a);
        links.register("x", b);
        assert_eq!(links.get("x"), Some(b));
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_symlink_is_registered_verbatim() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut links = LinkTable::new();

        let id = links
            .create_symlink(&mut tree, root, "s", "/home/user/file1.txt")
            .unwrap();
        assert_eq!(links.get("s"), Some(id));
        assert_eq!(tree.get(id).unwrap().target(), Some("/home/user/file1.txt"));
    }

    #[test]
    fn test_hard_link_copies_content() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut links = table_with_root(&tree);
        let src = tree.create_file(root, "a.txt", "hello".to_string()).unwrap();
        links.register("a.txt", src);

        let copy = links
            .create_hard_link(&mut tree, root, "b.txt", "a.txt")
            .unwrap()
            .unwrap();
        assert_ne!(copy, src);
        assert_eq!(tree.get(copy).unwrap().content(), Some("hello"));
        assert_eq!(links.get("b.txt"), Some(copy));
    }

    #[test]
    fn test_hard_link_to_directory_is_noop() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut links = table_with_root(&tree);

        let result = links.create_hard_link(&mut tree, root, "h", "/").unwrap();
        assert!(result.is_none());
        assert!(tree.children(root).is_empty());
        assert_eq!(links.get("h"), None);
    }

    #[test]
    fn test_hard_link_to_missing_is_noop() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut links = LinkTable::new();
        assert!(links.create_hard_link(&mut tree, root, "h", "ghost").unwrap().is_none());
    }

    #[test]
    fn test_stale_entries_are_tolerated() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut links = LinkTable::new();
        let f = tree.create_file(root, "f", "data".to_string()).unwrap();
        links.register("f", f);

        assert!(tree.detach_child(root, f));
        tree.destroy(f);

        assert_eq!(links.get("f"), Some(f));
        assert_eq!(links.resolve(&tree, "f"), None);
        assert_eq!(links.stale_entries(&tree), 1);
        assert!(links.create_hard_link(&mut tree, root, "g", "f").unwrap().is_none());
    }
}
