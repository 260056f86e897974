// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Core type definitions for NSFS

use serde::{Deserialize, Serialize};

/// Arena identifier of a node in the namespace tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// The root directory is always allocated first
    pub const ROOT: NodeId = NodeId(0);

    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node kind discriminant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Directory => write!(f, "dir"),
            EntryKind::File => write!(f, "file"),
            EntryKind::Symlink => write!(f, "symlink"),
        }
    }
}

/// Read-only view of a node handed out by the namespace
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: NodeId,
    pub name: String,
    pub kind: EntryKind,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }
}

/// Event kinds for namespace change notifications
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Created { path: String, kind: EntryKind },
    Removed { path: String },
    Modified { path: String },
    Moved { from: String, to: String },
}

/// Event sink trait for receiving namespace change notifications
#[cfg_attr(test, mockall::automock)]
pub trait EventSink: Send + Sync {
    fn on_event(&self, evt: &EventKind);
}

/// Opaque event subscription identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

impl SubscriptionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Namespace statistics
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceStats {
    pub directories: u32,
    pub files: u32,
    pub symlinks: u32,
    pub link_entries: u32,
    /// Link table entries whose node has since been destroyed
    pub stale_link_entries: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_json_shape() {
        let entry = Entry {
            id: NodeId::new(3),
            name: "file1.txt".to_string(),
            kind: EntryKind::File,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value, serde_json::json!({ "id": 3, "name": "file1.txt", "kind": "file" }));
    }

    #[test]
    fn test_event_kind_round_trip() {
        let event = EventKind::Moved {
            from: "/a/f".to_string(),
            to: "/a/b/f".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: EventKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeId::ROOT.to_string(), "#0");
        assert_eq!(EntryKind::Directory.to_string(), "dir");
        assert_eq!(EntryKind::Symlink.to_string(), "symlink");
    }
}
