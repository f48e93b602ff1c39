/// Error types for loading, configuration, and tree construction.
///
/// Fatal conditions are `Result` errors. Per-file problems discovered while
/// loading are not errors: they are collected as
/// [`SkippedEntry`](crate::loader::SkippedEntry) records on the catalog.
use std::path::PathBuf;
use thiserror::Error;

/// Tree construction failures.
///
/// The builder never silently resolves an inconsistent input: any of these
/// aborts the whole build and no partial forest is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A relative path is empty or contains a disallowed segment.
    #[error("invalid document path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// A path is needed both as a file and as a directory, or two distinct
    /// siblings would share the same display name.
    #[error("conflicting tree node at {path:?} (collides with {existing:?})")]
    ConflictingNode { path: String, existing: String },

    /// Two documents share the same relative path.
    #[error("duplicate document path {path:?}")]
    DuplicatePath { path: String },
}

/// Fatal loader failures.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("documents root does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("documents root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Root resolution failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot determine the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}
