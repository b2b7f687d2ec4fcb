//! Error types for tagit-core

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using tagit-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tagit-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Tag name is empty or whitespace-only
    #[error("Cannot add an empty tag: {0:?}")]
    InvalidTag(String),

    /// A tag with the same name is already registered
    #[error("A tag with the same name already exists: {0}")]
    DuplicateTag(String),

    /// Tag name is not part of the registry
    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    /// Renaming a file to a new tag encoding failed
    #[error("Failed to rename [{}] to [{}]: {source}", from.display(), to.display())]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Moving a file failed
    #[error("Failed to move [{}] to [{}]: {source}", from.display(), to.display())]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Destination directory already holds a file with the same original name
    #[error("A file with the same original name already exists: {0}")]
    Conflict(String),

    /// Path is not tracked by the repository
    #[error("File is not tracked: {}", .0.display())]
    NotTracked(PathBuf),

    /// Path is not a directory
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Persisted state could not be deserialized
    #[error("Persisted state at {} is corrupt: {reason}", path.display())]
    PersistCorrupt { path: PathBuf, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
