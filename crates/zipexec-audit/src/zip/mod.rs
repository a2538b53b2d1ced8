//! ZIP format structures.
//!
//! Only the records needed to walk the central directory: the EOCD, its
//! ZIP64 counterparts and the central directory file header.

pub mod central_dir;
mod eocd;

pub use central_dir::CentralDirectoryHeader;
pub use eocd::{Eocd64Locator, Eocd64Record, EocdRecord};

/// Creation systems ("version made by" high byte) from APPNOTE 4.4.2.
pub mod system {
    /// MS-DOS and OS/2 (FAT / VFAT / FAT32).
    pub const DOS: u8 = 0;
    /// UNIX.
    pub const UNIX: u8 = 3;
}

/// Unix file type bits found in the high half of the external attributes.
pub mod mode {
    /// File type mask.
    pub const S_IFMT: u32 = 0o170000;
    /// Regular file.
    pub const S_IFREG: u32 = 0o100000;
    /// Directory.
    pub const S_IFDIR: u32 = 0o040000;
    /// Execute bits for user, group and other.
    pub const EXECUTE: u32 = 0o111;
}
