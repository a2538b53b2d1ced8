//! Central directory entry.

use crate::zip::{mode, system};

/// An entry as recorded in the central directory.
///
/// Holds the raw metadata fields, with ZIP64 values already resolved. The
/// file data itself is never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CentralEntry {
    pub(crate) name: String,
    pub(crate) version_made_by: u16,
    pub(crate) version_needed: u16,
    pub(crate) flags: u16,
    pub(crate) compression_method: u16,
    pub(crate) dos_datetime: u32,
    pub(crate) crc32: u32,
    pub(crate) compressed_size: u64,
    pub(crate) uncompressed_size: u64,
    pub(crate) external_attributes: u32,
    pub(crate) local_header_offset: u64,
}

impl CentralEntry {
    /// Get the file name/path.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw "version made by" field.
    #[inline]
    pub fn version_made_by(&self) -> u16 {
        self.version_made_by
    }

    /// Minimum version needed to extract.
    #[inline]
    pub fn version_needed(&self) -> u16 {
        self.version_needed
    }

    /// General purpose bit flag.
    #[inline]
    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// Creation system tag, `3` for Unix.
    #[inline]
    pub fn create_system(&self) -> u8 {
        (self.version_made_by >> 8) as u8
    }

    /// Compression method (0 = stored, 8 = deflate).
    #[inline]
    pub fn compression_method(&self) -> u16 {
        self.compression_method
    }

    /// CRC-32 of the uncompressed data.
    #[inline]
    pub fn crc32(&self) -> u32 {
        self.crc32
    }

    #[inline]
    pub fn compressed_size(&self) -> u64 {
        self.compressed_size
    }

    #[inline]
    pub fn uncompressed_size(&self) -> u64 {
        self.uncompressed_size
    }

    /// External file attributes word.
    #[inline]
    pub fn external_attributes(&self) -> u32 {
        self.external_attributes
    }

    /// Offset of the local file header.
    #[inline]
    pub fn local_header_offset(&self) -> u64 {
        self.local_header_offset
    }

    /// Unix mode from the high 16 bits of the external attributes.
    ///
    /// Returns `None` unless the entry was created on a Unix system, since
    /// other systems give those bits a different meaning.
    pub fn unix_mode(&self) -> Option<u32> {
        if self.create_system() == system::UNIX {
            Some(self.external_attributes >> 16)
        } else {
            None
        }
    }

    /// Check if this entry represents a directory.
    pub fn is_dir(&self) -> bool {
        self.name.ends_with('/')
            || self
                .unix_mode()
                .is_some_and(|m| m & mode::S_IFMT == mode::S_IFDIR)
    }

    /// Check if this entry extracts as a regular file executable by user,
    /// group and other.
    pub fn is_executable(&self) -> bool {
        self.unix_mode().is_some_and(|m| {
            m & mode::S_IFMT == mode::S_IFREG && m & mode::EXECUTE == mode::EXECUTE
        })
    }

    /// Last modification time decoded from the DOS date/time fields.
    pub fn last_modified(&self) -> DosDateTime {
        DosDateTime::from_packed(self.dos_datetime)
    }
}

/// A broken-down DOS timestamp (two second resolution).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DosDateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DosDateTime {
    /// Decode the packed central directory layout.
    ///
    /// - Time: bits 0-4 = seconds/2, bits 5-10 = minutes, bits 11-15 = hours
    /// - Date: bits 16-20 = day, bits 21-24 = month, bits 25-31 = year-1980
    pub fn from_packed(datetime: u32) -> Self {
        Self {
            year: 1980 + ((datetime >> 25) & 0x7F) as u16,
            month: ((datetime >> 21) & 0x0F) as u8,
            day: ((datetime >> 16) & 0x1F) as u8,
            hour: ((datetime >> 11) & 0x1F) as u8,
            minute: ((datetime >> 5) & 0x3F) as u8,
            second: ((datetime & 0x1F) * 2) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, version_made_by: u16, external_attributes: u32) -> CentralEntry {
        CentralEntry {
            name: name.to_string(),
            version_made_by,
            version_needed: 20,
            flags: 0,
            compression_method: 8,
            dos_datetime: 0,
            crc32: 0,
            compressed_size: 0,
            uncompressed_size: 0,
            external_attributes,
            local_header_offset: 0,
        }
    }

    #[test]
    fn test_unix_mode_requires_unix_system() {
        let unix = entry("bootstrap", 0x031e, 0x81ed_0000);
        assert_eq!(unix.create_system(), 3);
        assert_eq!(unix.unix_mode(), Some(0o100755));
        assert!(unix.is_executable());

        let dos = entry("bootstrap", 0x0014, 0x81ed_0000);
        assert_eq!(dos.create_system(), 0);
        assert_eq!(dos.unix_mode(), None);
        assert!(!dos.is_executable());
    }

    #[test]
    fn test_executable_needs_all_execute_bits() {
        assert!(!entry("a", 0x031e, 0x81a4_0000).is_executable()); // 0644
        assert!(!entry("a", 0x031e, 0x81c0_0000).is_executable()); // 0700
        assert!(entry("a", 0x031e, 0x81ff_0000).is_executable()); // 0777
    }

    #[test]
    fn test_is_dir() {
        assert!(entry("dir/", 0x0014, 0x10).is_dir());
        assert!(entry("dir", 0x031e, 0x41ed_0000).is_dir());
        assert!(!entry("dir/b.bin", 0x031e, 0x81ed_0000).is_dir());
        // directories are never reported as executable files
        assert!(!entry("dir", 0x031e, 0x41ed_0000).is_executable());
    }

    #[test]
    fn test_dos_datetime_decode() {
        // 2024-06-15 13:45:30
        let date = ((2024 - 1980) << 9) | (6 << 5) | 15;
        let time = (13 << 11) | (45 << 5) | (30 / 2);
        let decoded = DosDateTime::from_packed((date << 16) | time);

        assert_eq!(
            decoded,
            DosDateTime {
                year: 2024,
                month: 6,
                day: 15,
                hour: 13,
                minute: 45,
                second: 30,
            }
        );
    }
}
