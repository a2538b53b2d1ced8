//! Repackage ZIP archives so every entry is a Unix executable.
//!
//! Some packaging tools drop the execute bits from deployment artifacts,
//! which leaves a serverless function's `bootstrap` binary unrunnable. This
//! crate copies an archive entry by entry and gives every entry:
//!
//! - external attributes `0x81ed0000` (regular file, mode `0755`)
//! - creation system `3` (Unix)
//! - the current local time as its timestamp
//! - deflate compression
//!
//! Names, payloads and entry order are preserved.
//!
//! # Example
//!
//! ```no_run
//! zipexec::rewrite_permissions("function.zip", "function-exec.zip")?;
//!
//! let missing = zipexec::audit::non_executable_entries("function-exec.zip")?;
//! assert!(missing.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Use [`Rewriter`] to change the permission bits, the deflate level or the
//! time source.

mod clock;
mod error;
mod metadata;
mod options;
mod rewrite;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Error, Result};
pub use metadata::{entry_metadata, EntryMetadata, CREATE_SYSTEM_UNIX, EXECUTABLE_EXTERNAL_ATTRIBUTES};
pub use options::{RewriteOptions, DEFAULT_PERMISSIONS};
pub use rewrite::{rewrite_permissions, Rewriter};

// Re-export the central directory reader
pub use zipexec_audit as audit;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{entry_metadata, rewrite_permissions, RewriteOptions, Rewriter};
    pub use zipexec_audit::{CentralDirectory, CentralEntry};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
