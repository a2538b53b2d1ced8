//! Destination entry metadata.

use chrono::{Datelike, NaiveDateTime, Timelike};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime};
use zipexec_audit::zip::system;

use crate::clock::{Clock, SystemClock};
use crate::options::RewriteOptions;

/// External attributes of a regular file with mode `0755`.
pub const EXECUTABLE_EXTERNAL_ATTRIBUTES: u32 = 0x81ed_0000;

/// Creation system tag for Unix.
pub const CREATE_SYSTEM_UNIX: u8 = system::UNIX;

/// Payload size above which ZIP64 records are requested. Deflate can expand
/// incompressible input slightly, so this stays below 4 GiB.
const ZIP64_THRESHOLD: u64 = 0xFFC0_0000;

/// Metadata for one entry of the destination archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMetadata {
    name: String,
    last_modified: DateTime,
    external_attributes: u32,
    /// Always Unix. Informational only: `zip::ZipWriter` records Unix as the
    /// creation system for every entry it writes, so this value is not
    /// passed to the writer.
    create_system: u8,
}

impl EntryMetadata {
    /// Build metadata stamped with the time reported by `clock`.
    pub fn with_clock<C: Clock + ?Sized>(name: &str, clock: &C, options: &RewriteOptions) -> Self {
        Self {
            name: name.to_string(),
            last_modified: dos_datetime(clock.now()),
            external_attributes: options.external_attributes(),
            create_system: CREATE_SYSTEM_UNIX,
        }
    }

    /// Entry name/path.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn last_modified(&self) -> DateTime {
        self.last_modified
    }

    #[inline]
    pub fn external_attributes(&self) -> u32 {
        self.external_attributes
    }

    /// Creation system tag the destination entry carries.
    ///
    /// The writer stores Unix on its own; this mirrors it rather than
    /// controlling it.
    #[inline]
    pub fn create_system(&self) -> u8 {
        self.create_system
    }

    /// Unix mode held in the high 16 bits of the external attributes.
    #[inline]
    pub fn unix_mode(&self) -> u32 {
        self.external_attributes >> 16
    }

    /// Writer options for a payload of `payload_len` bytes.
    ///
    /// The writer records Unix as the creation system and adds the
    /// regular-file type to the permission bits.
    pub fn file_options(&self, payload_len: u64, options: &RewriteOptions) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(options.compression_level)
            .unix_permissions(self.unix_mode() & 0o777)
            .last_modified_time(self.last_modified)
            .large_file(needs_zip64(payload_len))
    }
}

/// Whether a payload of `payload_len` bytes must be written with ZIP64 records.
#[inline]
pub(crate) fn needs_zip64(payload_len: u64) -> bool {
    payload_len >= ZIP64_THRESHOLD
}

/// Build metadata for `name` with the current local time and the default
/// executable attributes.
pub fn entry_metadata(name: &str) -> EntryMetadata {
    EntryMetadata::with_clock(name, &SystemClock, &RewriteOptions::default())
}

/// Convert a local time to a DOS timestamp, clamped to 1980..=2107.
pub(crate) fn dos_datetime(local: NaiveDateTime) -> DateTime {
    if local.year() < 1980 {
        return DateTime::default();
    }
    if local.year() > 2107 {
        return DateTime::from_date_and_time(2107, 12, 31, 23, 59, 58).unwrap_or_default();
    }

    DateTime::from_date_and_time(
        local.year() as u16,
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        local.second() as u8,
    )
    .unwrap_or_default()
}
