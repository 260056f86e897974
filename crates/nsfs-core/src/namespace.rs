// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Namespace façade: current directory state and all public operations

#[cfg(feature = "events")]
use std::collections::HashMap;
#[cfg(feature = "events")]
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::config::{DuplicatePolicy, MoveAnchor, NamespaceConfig};
use crate::error::{NsError, NsResult};
use crate::link_table::LinkTable;
use crate::node::NodeKind;
use crate::path::{resolve_dir_strict, resolve_entry_strict, resolve_or_create_dirs, split_leaf, tokenize};
use crate::tree::{Tree, ROOT_NAME};
use crate::types::{Entry, EntryKind, EventKind, NamespaceStats, NodeId};
#[cfg(feature = "events")]
use crate::types::{EventSink, SubscriptionId};

/// In-memory hierarchical namespace.
///
/// Operations taking a bare name are scoped to the current directory.
/// Operations taking a path resolve it from the root, except `move_file`
/// whose destination is anchored according to [`MoveAnchor`].
pub struct Namespace {
    config: NamespaceConfig,
    tree: Tree,
    links: LinkTable,
    current: NodeId,
    #[cfg(feature = "events")]
    next_subscription_id: u64,
    #[cfg(feature = "events")]
    event_subscriptions: HashMap<SubscriptionId, Arc<dyn EventSink>>,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

impl Namespace {
    pub fn new() -> Self {
        Self::with_config(NamespaceConfig::default())
    }

    pub fn with_config(config: NamespaceConfig) -> Self {
        let tree = Tree::new();
        let mut links = LinkTable::new();
        links.register(ROOT_NAME, tree.root());
        let current = tree.root();
        Self {
            config,
            tree,
            links,
            current,
            #[cfg(feature = "events")]
            next_subscription_id: 1,
            #[cfg(feature = "events")]
            event_subscriptions: HashMap::new(),
        }
    }

    pub fn config(&self) -> &NamespaceConfig {
        &self.config
    }

    fn validate_name(name: &str) -> NsResult<()> {
        if name.is_empty() || name.contains('/') {
            return Err(NsError::InvalidName(name.to_string()));
        }
        Ok(())
    }

    fn ensure_name_available(&self, parent: NodeId, name: &str) -> NsResult<()> {
        if self.config.duplicate_names == DuplicatePolicy::Reject
            && self.tree.find_child(parent, name, None).is_some()
        {
            return Err(NsError::AlreadyExists(self.tree.child_path(parent, name)));
        }
        Ok(())
    }

    fn entry(&self, id: NodeId) -> Option<Entry> {
        self.tree.get(id).map(|n| n.to_entry())
    }

    fn entries(&self, ids: &[NodeId]) -> Vec<Entry> {
        ids.iter().filter_map(|id| self.entry(*id)).collect()
    }

    // Directories

    /// Append a new empty directory to the current directory
    pub fn create_directory(&mut self, name: &str) -> NsResult<()> {
        Self::validate_name(name)?;
        self.ensure_name_available(self.current, name)?;
        let id = self.tree.create_directory(self.current, name)?;
        let path = self.tree.path_of(id);
        debug!(path = %path, "created directory");
        self.emit_event(EventKind::Created {
            path,
            kind: EntryKind::Directory,
        });
        Ok(())
    }

    /// Create every missing directory of `path`, starting at the root
    pub fn create_directory_full_path(&mut self, path: &str) -> NsResult<()> {
        let tokens = tokenize(path);
        let root = self.tree.root();
        if resolve_dir_strict(&self.tree, root, &tokens).is_ok() {
            return Ok(());
        }
        let id = resolve_or_create_dirs(&mut self.tree, root, &tokens, self.config.duplicate_names)?;
        let path = self.tree.path_of(id);
        debug!(path = %path, "created directory path");
        self.emit_event(EventKind::Created {
            path,
            kind: EntryKind::Directory,
        });
        Ok(())
    }

    /// Remove the first directory named `name` in the current directory,
    /// together with everything below it
    pub fn remove_directory(&mut self, name: &str) -> bool {
        let Some(id) = self.tree.find_child(self.current, name, Some(EntryKind::Directory)) else {
            return false;
        };
        self.remove_node(id)
    }

    fn remove_node(&mut self, id: NodeId) -> bool {
        let path = self.tree.path_of(id);
        if !self.tree.detach_child(self.current, id) {
            return false;
        }
        self.tree.destroy(id);
        debug!(path = %path, "removed");
        self.emit_event(EventKind::Removed { path });
        true
    }

    /// Navigate to `path`, always resolved from the root.
    ///
    /// Nothing changes unless every segment resolves to a directory.
    pub fn change_directory(&mut self, path: &str) -> NsResult<()> {
        let tokens = tokenize(path);
        match resolve_dir_strict(&self.tree, self.tree.root(), &tokens) {
            Ok(id) => {
                self.current = id;
                debug!(path = %self.tree.path_of(id), "changed directory");
                Ok(())
            }
            Err(segment) => {
                warn!(segment, path, "Directory not found: {}", segment);
                Err(NsError::DirectoryNotFound {
                    segment: segment.to_string(),
                    path: path.to_string(),
                })
            }
        }
    }

    pub fn current_directory(&self) -> Entry {
        self.tree
            .get(self.current)
            .map(|n| n.to_entry())
            .unwrap_or_else(|| Entry {
                id: self.current,
                name: ROOT_NAME.to_string(),
                kind: EntryKind::Directory,
            })
    }

    pub fn current_path(&self) -> String {
        self.tree.path_of(self.current)
    }

    pub fn list_current_directory(&self) -> Vec<Entry> {
        self.entries(self.tree.children(self.current))
    }

    /// Whether the directory at `path` (from the root) holds no file in its subtree
    pub fn is_empty(&self, path: &str) -> NsResult<bool> {
        let tokens = tokenize(path);
        let dir = resolve_dir_strict(&self.tree, self.tree.root(), &tokens).map_err(|segment| {
            NsError::DirectoryNotFound {
                segment: segment.to_string(),
                path: path.to_string(),
            }
        })?;
        Ok(self.tree.is_empty(dir))
    }

    // Files

    /// Append a new empty file to the current directory and register it in
    /// the link table under its bare name
    pub fn create_file(&mut self, name: &str) -> NsResult<()> {
        Self::validate_name(name)?;
        self.create_file_in(self.current, name)
    }

    /// Create the parent directories of `path` from the root, then the file
    pub fn create_file_full_path(&mut self, path: &str) -> NsResult<()> {
        let tokens = tokenize(path);
        let (parents, name) =
            split_leaf(&tokens).ok_or_else(|| NsError::InvalidPath(path.to_string()))?;
        let root = self.tree.root();
        let parent =
            resolve_or_create_dirs(&mut self.tree, root, parents, self.config.duplicate_names)?;
        self.create_file_in(parent, name)
    }

    fn create_file_in(&mut self, parent: NodeId, name: &str) -> NsResult<()> {
        self.ensure_name_available(parent, name)?;
        let id = self.tree.create_file(parent, name, String::new())?;
        self.links.register(name, id);
        let path = self.tree.path_of(id);
        debug!(path = %path, "created file");
        self.emit_event(EventKind::Created {
            path,
            kind: EntryKind::File,
        });
        Ok(())
    }

    /// Remove the first file named `name` in the current directory
    pub fn remove_file(&mut self, name: &str) -> bool {
        let Some(id) = self.tree.find_child(self.current, name, Some(EntryKind::File)) else {
            return false;
        };
        self.remove_node(id)
    }

    /// Replace the content of the first file named `name` in the current directory
    pub fn write_file(&mut self, name: &str, content: &str) -> bool {
        let Some(id) = self.tree.find_child(self.current, name, Some(EntryKind::File)) else {
            return false;
        };
        let Some(NodeKind::File { content: existing }) =
            self.tree.get_mut(id).map(|n| &mut n.kind)
        else {
            return false;
        };
        content.clone_into(existing);
        let path = self.tree.path_of(id);
        debug!(path = %path, len = content.len(), "wrote file");
        self.emit_event(EventKind::Modified { path });
        true
    }

    /// Content of the first file named `name` in the current directory
    pub fn get_file_contents(&self, name: &str) -> Option<&str> {
        self.tree
            .find_child(self.current, name, Some(EntryKind::File))
            .and_then(|id| self.tree.get(id))
            .and_then(|n| n.content())
    }

    /// Move the first file named `name` out of the current directory into the
    /// directory named by `new_path`, creating missing directories.
    ///
    /// Every token of `new_path` is a directory; the file keeps its name.
    pub fn move_file(&mut self, name: &str, new_path: &str) -> bool {
        let Some(file) = self.tree.find_child(self.current, name, Some(EntryKind::File)) else {
            return false;
        };
        let from = self.tree.path_of(file);
        let anchor = match self.config.move_anchor {
            MoveAnchor::CurrentDirectory => self.current,
            MoveAnchor::Root => self.tree.root(),
        };

        let tokens = tokenize(new_path);
        let dest = match resolve_or_create_dirs(
            &mut self.tree,
            anchor,
            &tokens,
            self.config.duplicate_names,
        ) {
            Ok(dest) => dest,
            Err(err) => {
                warn!(%err, from = %from, new_path, "move destination rejected");
                return false;
            }
        };

        if self.config.duplicate_names == DuplicatePolicy::Reject
            && self.tree.find_children(dest, name).iter().any(|c| *c != file)
        {
            warn!(from = %from, new_path, "move would duplicate a sibling name");
            return false;
        }

        let index = self.tree.child_index(self.current, file).unwrap_or(usize::MAX);
        self.tree.detach_child(self.current, file);
        if let Err(err) = self.tree.add_child(dest, file) {
            warn!(%err, from = %from, "move failed, restoring file");
            if let Err(restore_err) = self.tree.insert_child_at(self.current, index, file) {
                error!(%restore_err, from = %from, "restore failed, dropping detached file");
                self.tree.destroy(file);
                self.emit_event(EventKind::Removed { path: from });
            }
            return false;
        }

        let to = self.tree.path_of(file);
        debug!(from = %from, to = %to, "moved file");
        self.emit_event(EventKind::Moved { from, to });
        true
    }

    /// Every direct child of the current directory named `name`, in order
    pub fn find_items_by_name(&self, name: &str) -> Vec<Entry> {
        self.entries(&self.tree.find_children(self.current, name))
    }

    // Links

    /// Create a symlink in the current directory; `target` is stored as given
    pub fn create_symlink(&mut self, name: &str, target: &str) -> NsResult<()> {
        Self::validate_name(name)?;
        self.ensure_name_available(self.current, name)?;
        let id = self
            .links
            .create_symlink(&mut self.tree, self.current, name, target)?;
        let path = self.tree.path_of(id);
        debug!(path = %path, target, "created symlink");
        self.emit_event(EventKind::Created {
            path,
            kind: EntryKind::Symlink,
        });
        Ok(())
    }

    /// Create `new_name` in the current directory as a content copy of the
    /// file registered as `existing`.
    ///
    /// Returns `Ok(false)` and changes nothing when `existing` is unknown,
    /// stale, or not a file.
    pub fn create_hard_link(&mut self, new_name: &str, existing: &str) -> NsResult<bool> {
        Self::validate_name(new_name)?;
        if self.linked_file_contents(existing).is_none() {
            debug!(new_name, existing, "hard link source missing or not a file");
            return Ok(false);
        }
        self.ensure_name_available(self.current, new_name)?;
        let Some(id) = self
            .links
            .create_hard_link(&mut self.tree, self.current, new_name, existing)?
        else {
            return Ok(false);
        };
        let path = self.tree.path_of(id);
        debug!(path = %path, existing, "created hard link");
        self.emit_event(EventKind::Created {
            path,
            kind: EntryKind::File,
        });
        Ok(true)
    }

    /// Target of the first symlink named `name` in the current directory
    pub fn read_link(&self, name: &str) -> Option<&str> {
        self.tree
            .find_child(self.current, name, Some(EntryKind::Symlink))
            .and_then(|id| self.tree.get(id))
            .and_then(|n| n.target())
    }

    /// Resolve the first symlink named `name` in the current directory.
    ///
    /// The target is looked up from the root on every call, following chained
    /// symlinks up to the configured depth.
    pub fn follow_symlink(&self, name: &str) -> NsResult<Entry> {
        let mut target = self
            .read_link(name)
            .ok_or_else(|| NsError::NotASymlink(self.tree.child_path(self.current, name)))?
            .to_string();

        for _ in 0..self.config.max_symlink_depth {
            let next = {
                let tokens = tokenize(&target);
                let node = resolve_entry_strict(&self.tree, self.tree.root(), &tokens)
                    .and_then(|id| self.tree.get(id))
                    .ok_or_else(|| NsError::NotFound(target.clone()))?;
                match node.target() {
                    Some(next) => next.to_string(),
                    None => return Ok(node.to_entry()),
                }
            };
            target = next;
        }
        Err(NsError::SymlinkLoop(self.tree.child_path(self.current, name)))
    }

    /// Link table lookup by bare name; stale entries resolve to `None`
    pub fn linked_entry(&self, name: &str) -> Option<Entry> {
        self.links
            .resolve(&self.tree, name)
            .and_then(|id| self.entry(id))
    }

    pub fn linked_file_contents(&self, name: &str) -> Option<&str> {
        self.links
            .resolve(&self.tree, name)
            .and_then(|id| self.tree.get(id))
            .and_then(|n| n.content())
    }

    pub fn linked_symlink_target(&self, name: &str) -> Option<&str> {
        self.links
            .resolve(&self.tree, name)
            .and_then(|id| self.tree.get(id))
            .and_then(|n| n.target())
    }

    // Statistics

    pub fn stats(&self) -> NamespaceStats {
        let (directories, files, symlinks) = self.tree.counts();
        NamespaceStats {
            directories,
            files,
            symlinks,
            link_entries: self.links.len() as u32,
            stale_link_entries: self.links.stale_entries(&self.tree) as u32,
        }
    }

    // Event subscription operations

    #[cfg(feature = "events")]
    pub fn subscribe_events(&mut self, sink: Arc<dyn EventSink>) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_subscription_id);
        self.next_subscription_id += 1;
        self.event_subscriptions.insert(id, sink);
        id
    }

    #[cfg(feature = "events")]
    pub fn unsubscribe_events(&mut self, sub: SubscriptionId) -> NsResult<()> {
        if self.event_subscriptions.remove(&sub).is_none() {
            return Err(NsError::SubscriptionNotFound);
        }
        Ok(())
    }

    #[cfg(feature = "events")]
    fn emit_event(&self, event: EventKind) {
        if !self.config.track_events {
            return;
        }
        for sink in self.event_subscriptions.values() {
            sink.on_event(&event);
        }
    }

    #[cfg(not(feature = "events"))]
    fn emit_event(&self, _event: EventKind) {}
}
