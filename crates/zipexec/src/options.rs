//! Rewrite configuration.

use zipexec_audit::zip::mode;

/// Permission bits applied when none are configured (`rwxr-xr-x`).
pub const DEFAULT_PERMISSIONS: u32 = 0o755;

/// Options controlling how destination entries are written.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewriteOptions {
    /// Unix permission bits for every entry. Only the low nine bits are kept;
    /// the regular-file type is always added.
    pub permissions: u32,
    /// Deflate level, `None` for the library default.
    pub compression_level: Option<i64>,
}

impl RewriteOptions {
    /// Set the Unix permission bits.
    pub fn permissions(mut self, permissions: u32) -> Self {
        self.permissions = permissions;
        self
    }

    /// Set the deflate compression level.
    pub fn compression_level(mut self, level: Option<i64>) -> Self {
        self.compression_level = level;
        self
    }

    /// Full Unix mode written for each entry: regular file plus permissions.
    #[inline]
    pub fn unix_mode(&self) -> u32 {
        mode::S_IFREG | (self.permissions & 0o777)
    }

    /// External attributes word: the Unix mode in the high 16 bits.
    #[inline]
    pub fn external_attributes(&self) -> u32 {
        self.unix_mode() << 16
    }
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            permissions: DEFAULT_PERMISSIONS,
            compression_level: None,
        }
    }
}
