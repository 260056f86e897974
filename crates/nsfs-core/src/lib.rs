// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! NSFS Core: in-memory hierarchical namespace
//!
//! Directories, files and symlinks live in an arena tree addressed by
//! `NodeId`. A name-keyed link table backs hard links and symlink lookup.
//! `Namespace` tracks a current directory and exposes every operation.

pub mod config;
pub mod error;
pub(crate) mod link_table;
pub mod namespace;
pub(crate) mod node;
pub mod path;
pub mod path_index;
pub mod shared;
pub(crate) mod tree;
pub mod types;

// Re-export key types
pub use config::{DuplicatePolicy, MoveAnchor, NamespaceConfig, DEFAULT_MAX_SYMLINK_DEPTH};
pub use error::{NsError, NsResult};
pub use namespace::Namespace;
pub use path::tokenize;
pub use path_index::PathIndex;
pub use shared::SharedNamespace;
pub use types::{Entry, EntryKind, EventKind, EventSink, NamespaceStats, NodeId, SubscriptionId};
