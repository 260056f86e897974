// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Path tokenization and directory resolution

use crate::config::DuplicatePolicy;
use crate::error::{NsError, NsResult};
use crate::tree::Tree;
use crate::types::{EntryKind, NodeId};

/// Split a path on `/`, skipping empty tokens: `/a//b/` yields `["a", "b"]`.
pub fn tokenize(path: &str) -> Vec<&str> {
    path.split('/').filter(|t| !t.is_empty()).collect()
}

/// Split tokens into parent tokens and the final leaf token
pub fn split_leaf<'a, 'p>(tokens: &'a [&'p str]) -> Option<(&'a [&'p str], &'p str)> {
    tokens.split_last().map(|(leaf, parents)| (parents, *leaf))
}

/// Walk `tokens` below `start`, creating any missing directory along the way.
///
/// Lookups only consider directories, so a file sharing a token's name is
/// skipped and a directory of that name is created beside it. Under
/// `DuplicatePolicy::Reject` that creation fails instead. Otherwise this only
/// fails if `start` is not a live directory.
pub(crate) fn resolve_or_create_dirs(
    tree: &mut Tree,
    start: NodeId,
    tokens: &[&str],
    policy: DuplicatePolicy,
) -> NsResult<NodeId> {
    let mut current = start;
    for token in tokens {
        current = match tree.find_child(current, token, Some(EntryKind::Directory)) {
            Some(child) => child,
            None => {
                if policy == DuplicatePolicy::Reject && tree.find_child(current, token, None).is_some() {
                    return Err(NsError::AlreadyExists(tree.child_path(current, token)));
                }
                tracing::trace!(parent = %current, name = %token, "auto-creating directory");
                tree.create_directory(current, token)?
            }
        };
    }
    Ok(current)
}

/// Walk `tokens` below `start` without creating anything.
///
/// Returns the first token that has no matching child directory as the error.
pub(crate) fn resolve_dir_strict<'p>(
    tree: &Tree,
    start: NodeId,
    tokens: &[&'p str],
) -> Result<NodeId, &'p str> {
    let mut current = start;
    for token in tokens {
        current = tree
            .find_child(current, token, Some(EntryKind::Directory))
            .ok_or(*token)?;
    }
    Ok(current)
}

/// Resolve a path to an entry of any kind: directories for every token but the
/// last, first child of any kind for the last. No tokens resolves to `start`.
pub(crate) fn resolve_entry_strict(tree: &Tree, start: NodeId, tokens: &[&str]) -> Option<NodeId> {
    let Some((parents, leaf)) = split_leaf(tokens) else {
        return Some(start);
    };
    let parent = resolve_dir_strict(tree, start, parents).ok()?;
    tree.find_child(parent, leaf, None)
}
