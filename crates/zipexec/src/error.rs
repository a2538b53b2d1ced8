//! Error types for the rewriter.

use std::path::PathBuf;

use thiserror::Error;
use zip::result::ZipError;

/// Errors that can occur while rewriting an archive.
#[derive(Debug, Error)]
pub enum Error {
    /// Source missing or unreadable.
    #[error("failed to open source archive {}: {source}", path.display())]
    OpenSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source is not a valid ZIP archive.
    #[error("invalid source archive: {0}")]
    InvalidArchive(#[source] ZipError),

    /// Source and destination are the same file.
    #[error("source and destination are the same file: {}", .0.display())]
    SameFile(PathBuf),

    /// Destination could not be created.
    #[error("failed to create destination archive {}: {source}", path.display())]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source entry header could not be read.
    #[error("failed to read entry #{index}: {source}")]
    ReadEntry {
        index: usize,
        #[source]
        source: ZipError,
    },

    /// Source entry payload could not be read (bad data, CRC mismatch, ...).
    #[error("failed to read payload of {name}: {source}")]
    ReadPayload {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Destination entry could not be written.
    #[error("failed to write entry {name}: {source}")]
    WriteEntry {
        name: String,
        #[source]
        source: ZipError,
    },

    /// Central directory of the destination could not be written.
    #[error("failed to finalize destination archive: {0}")]
    Finish(#[source] ZipError),
}

/// Result type for rewrite operations.
pub type Result<T> = std::result::Result<T, Error>;
