// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Node arena and directory hierarchy

use std::collections::HashMap;

use crate::error::{NsError, NsResult};
use crate::node::{Node, NodeKind};
use crate::types::{EntryKind, NodeId};

pub const ROOT_NAME: &str = "/";

/// Arena of nodes; directories own their children through `Vec<NodeId>`
#[derive(Clone, Debug)]
pub(crate) struct Tree {
    nodes: HashMap<NodeId, Node>,
    next_node_id: u64,
}

impl Tree {
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(NodeId::ROOT, Node::directory(NodeId::ROOT, ROOT_NAME));
        Self {
            nodes,
            next_node_id: NodeId::ROOT.0 + 1,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn allocate_node_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    pub fn create_directory(&mut self, parent: NodeId, name: &str) -> NsResult<NodeId> {
        let id = self.allocate_node_id();
        self.insert_child(parent, Node::directory(id, name))
    }

    pub fn create_file(&mut self, parent: NodeId, name: &str, content: String) -> NsResult<NodeId> {
        let id = self.allocate_node_id();
        self.insert_child(parent, Node::file(id, name, content))
    }

    pub fn create_symlink(&mut self, parent: NodeId, name: &str, target: &str) -> NsResult<NodeId> {
        let id = self.allocate_node_id();
        self.insert_child(parent, Node::symlink(id, name, target))
    }

    fn insert_child(&mut self, parent: NodeId, node: Node) -> NsResult<NodeId> {
        let id = node.id;
        self.ensure_directory(parent)?;
        self.nodes.insert(id, node);
        self.add_child(parent, id)?;
        Ok(id)
    }

    fn ensure_directory(&self, id: NodeId) -> NsResult<()> {
        match self.nodes.get(&id) {
            Some(node) if node.is_dir() => Ok(()),
            Some(_) => Err(NsError::NotADirectory(self.path_of(id))),
            None => Err(NsError::NotFound(id.to_string())),
        }
    }

    /// Append an arena node to a directory's children. No uniqueness check.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> NsResult<()> {
        self.insert_child_at(parent, usize::MAX, child)
    }

    /// Insert an arena node among a directory's children at `index`, clamped
    /// to the end.
    pub fn insert_child_at(&mut self, parent: NodeId, index: usize, child: NodeId) -> NsResult<()> {
        if !self.nodes.contains_key(&child) {
            return Err(NsError::NotFound(child.to_string()));
        }
        let parent_node = self
            .nodes
            .get_mut(&parent)
            .ok_or_else(|| NsError::NotFound(parent.to_string()))?;
        match &mut parent_node.kind {
            NodeKind::Directory { children } => {
                let index = index.min(children.len());
                children.insert(index, child);
            }
            _ => return Err(NsError::NotADirectory(parent_node.name.clone())),
        }
        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = Some(parent);
        }
        Ok(())
    }

    /// Remove `child` (by identity) from `parent`'s children without freeing it.
    pub fn detach_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(parent_node) = self.nodes.get_mut(&parent) else {
            return false;
        };
        let NodeKind::Directory { children } = &mut parent_node.kind else {
            return false;
        };
        let Some(pos) = children.iter().position(|c| *c == child) else {
            return false;
        };
        children.remove(pos);
        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = None;
        }
        true
    }

    /// Free a detached node and everything below it. The root is never freed.
    pub fn destroy(&mut self, id: NodeId) {
        if id == self.root() {
            return;
        }
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                pending.extend_from_slice(node.children());
            }
        }
    }

    /// Position of `child` among `parent`'s children
    pub fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|c| *c == child)
    }

    pub fn children(&self, dir: NodeId) -> &[NodeId] {
        self.nodes.get(&dir).map(|n| n.children()).unwrap_or(&[])
    }

    /// First child of `dir` named `name`, optionally filtered by kind
    pub fn find_child(&self, dir: NodeId, name: &str, kind: Option<EntryKind>) -> Option<NodeId> {
        self.children(dir)
            .iter()
            .copied()
            .find(|c| self.nodes.get(c).is_some_and(|n| n.matches(name, kind)))
    }

    /// Every child of `dir` named `name`, in insertion order
    pub fn find_children(&self, dir: NodeId, name: &str) -> Vec<NodeId> {
        self.children(dir)
            .iter()
            .copied()
            .filter(|c| self.nodes.get(c).is_some_and(|n| n.name == name))
            .collect()
    }

    /// True if `dir` holds no file anywhere in its subtree.
    ///
    /// Directories containing only empty directories are empty; symlinks are
    /// not files and do not count. Recomputed on every call from an explicit
    /// work list.
    pub fn is_empty(&self, dir: NodeId) -> bool {
        let mut pending = vec![dir];
        while let Some(next) = pending.pop() {
            for child in self.children(next) {
                match self.nodes.get(child).map(|n| &n.kind) {
                    Some(NodeKind::File { .. }) => return false,
                    Some(NodeKind::Directory { .. }) => pending.push(*child),
                    Some(NodeKind::Symlink { .. }) | None => {}
                }
            }
        }
        true
    }

    /// Absolute path of a node, `/` for the root
    pub fn path_of(&self, id: NodeId) -> String {
        let mut components = Vec::new();
        let mut current = self.nodes.get(&id);
        while let Some(node) = current {
            let Some(parent) = node.parent else {
                break;
            };
            components.push(node.name.as_str());
            current = self.nodes.get(&parent);
        }
        if components.is_empty() {
            return ROOT_NAME.to_string();
        }
        components.reverse();
        format!("/{}", components.join("/"))
    }

    pub fn child_path(&self, parent: NodeId, name: &str) -> String {
        let parent_path = self.path_of(parent);
        if parent_path == ROOT_NAME {
            format!("/{name}")
        } else {
            format!("{parent_path}/{name}")
        }
    }

    /// (directories, files, symlinks) currently alive
    pub fn counts(&self) -> (u32, u32, u32) {
        self.nodes.values().fold((0, 0, 0), |(d, f, s), node| match node.kind {
            NodeKind::Directory { .. } => (d + 1, f, s),
            NodeKind::File { .. } => (d, f + 1, s),
            NodeKind::Symlink { .. } => (d, f, s + 1),
        })
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
