// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Path-keyed value store
//!
//! A trie over path segments, independent of the namespace tree. A path can
//! only be inserted once its parent path exists, and never overwritten.

use std::collections::HashMap;

#[derive(Clone, Debug)]
struct IndexNode<V> {
    value: Option<V>,
    children: HashMap<String, IndexNode<V>>,
}

impl<V> IndexNode<V> {
    fn new(value: Option<V>) -> Self {
        Self {
            value,
            children: HashMap::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PathIndex<V> {
    root: IndexNode<V>,
    len: usize,
}

impl<V> Default for PathIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PathIndex<V> {
    pub fn new() -> Self {
        Self {
            root: IndexNode::new(None),
            len: 0,
        }
    }

    /// Segments of an absolute path; `None` if the path is not absolute or
    /// has an empty segment (`/`, `//a`, `/a/`).
    fn segments(path: &str) -> Option<Vec<&str>> {
        let rest = path.strip_prefix('/')?;
        let segments: Vec<&str> = rest.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(segments)
    }

    /// Insert `value` at `path`.
    ///
    /// Returns false if the path is invalid, already present, or any of its
    /// ancestors is missing.
    pub fn insert(&mut self, path: &str, value: V) -> bool {
        let Some(segments) = Self::segments(path) else {
            return false;
        };
        let Some((leaf, parents)) = segments.split_last() else {
            return false;
        };

        let mut node = &mut self.root;
        for segment in parents {
            match node.children.get_mut(*segment) {
                Some(child) => node = child,
                None => return false,
            }
        }
        if node.children.contains_key(*leaf) {
            return false;
        }
        node.children.insert(leaf.to_string(), IndexNode::new(Some(value)));
        self.len += 1;
        true
    }

    pub fn search(&self, path: &str) -> Option<&V> {
        let segments = Self::segments(path)?;
        let mut node = &self.root;
        for segment in segments {
            node = node.children.get(segment)?;
        }
        node.value.as_ref()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.search(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_requires_parent() {
        let mut index = PathIndex::new();
        assert!(!index.insert("/a/b", 2));
        assert!(index.insert("/a", 1));
        assert!(index.insert("/a/b", 2));
        assert_eq!(index.search("/a/b"), Some(&2));
        assert_eq!(index.search("/a"), Some(&1));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_insert_never_overwrites() {
        let mut index = PathIndex::new();
        assert!(index.insert("/leet", 1));
        assert!(!index.insert("/leet", 2));
        assert_eq!(index.search("/leet"), Some(&1));
    }

    #[test]
    fn test_search_missing() {
        let mut index = PathIndex::new();
        index.insert("/a", "x");
        assert_eq!(index.search("/c"), None);
        assert_eq!(index.search("/a/b"), None);
        assert!(!index.contains("/b"));
        assert!(index.contains("/a"));
    }

    #[test]
    fn test_invalid_paths() {
        let mut index: PathIndex<u32> = PathIndex::new();
        assert!(!index.insert("", 1));
        assert!(!index.insert("/", 1));
        assert!(!index.insert("a", 1));
        assert!(!index.insert("/a/", 1));
        assert!(!index.insert("//a", 1));
        assert_eq!(index.search("/"), None);
        assert!(index.is_empty());
    }
}
