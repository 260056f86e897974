// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Namespace configuration
//!
//! All fields are optional in the TOML source; missing keys fall back to the
//! defaults, which reproduce the permissive behavior (duplicate sibling names
//! allowed, moves anchored at the current directory).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NsError, NsResult};

/// How sibling name collisions are handled on creation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Append regardless; lookups resolve to the first match
    #[default]
    Allow,
    /// Fail with `AlreadyExists` if any sibling carries the same name
    Reject,
}

/// Where the destination path of `move_file` is resolved from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveAnchor {
    #[default]
    CurrentDirectory,
    Root,
}

pub const DEFAULT_MAX_SYMLINK_DEPTH: u32 = 40;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct NamespaceConfig {
    pub duplicate_names: DuplicatePolicy,
    pub move_anchor: MoveAnchor,
    /// Deliver change events to subscribers
    pub track_events: bool,
    /// Upper bound on chained symlinks followed by `follow_symlink`
    pub max_symlink_depth: u32,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            duplicate_names: DuplicatePolicy::Allow,
            move_anchor: MoveAnchor::CurrentDirectory,
            track_events: true,
            max_symlink_depth: DEFAULT_MAX_SYMLINK_DEPTH,
        }
    }
}

impl NamespaceConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(s: &str) -> NsResult<Self> {
        let config: NamespaceConfig =
            toml::from_str(s).map_err(|e| NsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file from disk
    pub fn load(path: &Path) -> NsResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> NsResult<()> {
        if self.max_symlink_depth == 0 {
            return Err(NsError::Config(
                "max-symlink-depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = NamespaceConfig::from_toml_str("").unwrap();
        assert_eq!(config, NamespaceConfig::default());
    }

    #[test]
    fn test_parse_all_fields() {
        let config = NamespaceConfig::from_toml_str(
            r#"
            duplicate-names = "reject"
            move-anchor = "root"
            track-events = false
            max-symlink-depth = 8
            "#,
        )
        .unwrap();

        assert_eq!(config.duplicate_names, DuplicatePolicy::Reject);
        assert_eq!(config.move_anchor, MoveAnchor::Root);
        assert!(!config.track_events);
        assert_eq!(config.max_symlink_depth, 8);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let err = NamespaceConfig::from_toml_str(r#"duplicate-names = "sometimes""#).unwrap_err();
        assert!(matches!(err, NsError::Config(_)));
    }

    #[test]
    fn test_zero_symlink_depth_is_rejected() {
        let err = NamespaceConfig::from_toml_str("max-symlink-depth = 0").unwrap_err();
        assert!(matches!(err, NsError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"move-anchor = "root""#).unwrap();

        let config = NamespaceConfig::load(file.path()).unwrap();
        assert_eq!(config.move_anchor, MoveAnchor::Root);
        assert_eq!(config.duplicate_names, DuplicatePolicy::Allow);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = NamespaceConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, NsError::Io(_)));
    }
}
