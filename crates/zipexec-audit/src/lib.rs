//! Raw ZIP central directory reader.
//!
//! The central directory carries the per-entry fields that decide how an
//! archive extracts on Unix: the creation system in the high byte of
//! "version made by" and the file mode in the high half of the external
//! attributes. This crate reads those fields directly, including ZIP64
//! archives, without decompressing anything.
//!
//! # Example
//!
//! ```no_run
//! use zipexec_audit::CentralDirectory;
//!
//! let directory = CentralDirectory::open("function.zip")?;
//!
//! for entry in directory.iter() {
//!     println!("{:o} {}", entry.unix_mode().unwrap_or(0), entry.name());
//! }
//! # Ok::<(), zipexec_audit::Error>(())
//! ```

mod directory;
mod entry;
mod error;
mod reader;
pub mod zip;

pub use directory::{non_executable_entries, CentralDirectory};
pub use entry::{CentralEntry, DosDateTime};
pub use error::{Error, Result};
