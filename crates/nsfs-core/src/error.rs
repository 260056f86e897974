// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for NSFS Core

use std::io;

/// Core namespace error type
#[derive(thiserror::Error, Debug)]
pub enum NsError {
    #[error("directory not found: {segment} (while resolving {path})")]
    DirectoryNotFound { segment: String, path: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("name not allowed: {0:?}")]
    InvalidName(String),
    #[error("invalid path: {0:?}")]
    InvalidPath(String),
    #[error("not a directory: {0}")]
    NotADirectory(String),
    #[error("not a symlink: {0}")]
    NotASymlink(String),
    #[error("too many levels of symbolic links: {0}")]
    SymlinkLoop(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("event subscription not found")]
    SubscriptionNotFound,
}

pub type NsResult<T> = Result<T, NsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_not_found_message_names_segment() {
        let err = NsError::DirectoryNotFound {
            segment: "nope".to_string(),
            path: "/a/nope".to_string(),
        };
        assert_eq!(err.to_string(), "directory not found: nope (while resolving /a/nope)");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: NsError = io_err.into();
        assert!(matches!(err, NsError::Io(_)));
    }
}
