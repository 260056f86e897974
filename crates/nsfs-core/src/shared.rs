// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Reader-writer wrapper for sharing one namespace between threads
//!
//! `Namespace` itself holds no locks. This wrapper takes one exclusive lock
//! per mutating call and a shared lock for reads.

use std::sync::{Arc, PoisonError, RwLock};

use crate::config::NamespaceConfig;
use crate::namespace::Namespace;

#[derive(Clone, Default)]
pub struct SharedNamespace {
    inner: Arc<RwLock<Namespace>>,
}

impl SharedNamespace {
    pub fn new(namespace: Namespace) -> Self {
        Self {
            inner: Arc::new(RwLock::new(namespace)),
        }
    }

    pub fn with_config(config: NamespaceConfig) -> Self {
        Self::new(Namespace::with_config(config))
    }

    /// Run `f` under a shared lock
    pub fn read<R>(&self, f: impl FnOnce(&Namespace) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run `f` under the exclusive lock
    pub fn write<R>(&self, f: impl FnOnce(&mut Namespace) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
