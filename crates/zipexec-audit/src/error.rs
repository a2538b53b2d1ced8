//! Error types for the audit crate.

use thiserror::Error;

/// Errors that can occur while reading a central directory.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Invalid ZIP magic bytes.
    #[error("invalid ZIP signature: expected {expected:#010x}, got {actual:#010x}")]
    InvalidSignature { expected: u32, actual: u32 },

    /// Could not find the end of central directory record.
    #[error("could not find end of central directory record")]
    EocdNotFound,

    /// ZIP64 record not found when expected.
    #[error("ZIP64 end of central directory not found")]
    Zip64EocdNotFound,
}

/// Result type for audit operations.
pub type Result<T> = std::result::Result<T, Error>;
