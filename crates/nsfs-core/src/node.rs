// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Namespace tree nodes

use crate::types::{Entry, EntryKind, NodeId};

/// Node payload, one variant per entry kind
#[derive(Clone, Debug)]
pub(crate) enum NodeKind {
    Directory {
        children: Vec<NodeId>, // insertion order, duplicates allowed
    },
    File {
        content: String,
    },
    Symlink {
        target: String, // stored verbatim, resolved only when followed
    },
}

/// Namespace node
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl Node {
    pub(crate) fn directory(id: NodeId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            parent: None,
            kind: NodeKind::Directory {
                children: Vec::new(),
            },
        }
    }

    pub(crate) fn file(id: NodeId, name: &str, content: String) -> Self {
        Self {
            id,
            name: name.to_string(),
            parent: None,
            kind: NodeKind::File { content },
        }
    }

    pub(crate) fn symlink(id: NodeId, name: &str, target: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            parent: None,
            kind: NodeKind::Symlink {
                target: target.to_string(),
            },
        }
    }

    pub fn entry_kind(&self) -> EntryKind {
        match &self.kind {
            NodeKind::Directory { .. } => EntryKind::Directory,
            NodeKind::File { .. } => EntryKind::File,
            NodeKind::Symlink { .. } => EntryKind::Symlink,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    /// True if the node has the given name and, when a filter is set, that kind
    pub fn matches(&self, name: &str, kind: Option<EntryKind>) -> bool {
        self.name == name && kind.map_or(true, |k| k == self.entry_kind())
    }

    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Directory { children } => children,
            _ => &[],
        }
    }

    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content } => Some(content),
            _ => None,
        }
    }

    pub fn target(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Symlink { target } => Some(target),
            _ => None,
        }
    }

    pub fn to_entry(&self) -> Entry {
        Entry {
            id: self.id,
            name: self.name.clone(),
            kind: self.entry_kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_filtered_match() {
        let file = Node::file(NodeId(1), "x", String::new());
        assert!(file.matches("x", None));
        assert!(file.matches("x", Some(EntryKind::File)));
        assert!(!file.matches("x", Some(EntryKind::Directory)));
        assert!(!file.matches("y", None));
    }

    #[test]
    fn test_accessors_by_kind() {
        let link = Node::symlink(NodeId(2), "s", "/home/user/file1.txt");
        assert_eq!(link.target(), Some("/home/user/file1.txt"));
        assert_eq!(link.content(), None);
        assert!(link.children().is_empty());

        let dir = Node::directory(NodeId(3), "d");
        assert!(dir.is_dir());
        assert_eq!(dir.to_entry().kind, EntryKind::Directory);
    }
}
