//! Central directory reader.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use tracing::{debug, instrument, trace};

use crate::entry::CentralEntry;
use crate::reader::ByteCursor;
use crate::zip::central_dir::extra_field;
use crate::zip::{CentralDirectoryHeader, Eocd64Locator, Eocd64Record, EocdRecord};
use crate::{Error, Result};

/// Longest possible archive comment plus the fixed EOCD record.
const EOCD_SEARCH_WINDOW: usize = 0xFFFF + EocdRecord::SIZE_WITH_SIGNATURE;

/// The parsed central directory of a ZIP archive.
#[derive(Debug, Clone)]
pub struct CentralDirectory {
    entries: Vec<CentralEntry>,
}

impl CentralDirectory {
    /// Map an archive from disk and parse its central directory.
    #[instrument(level = "trace", skip_all, fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        if file.metadata()?.len() == 0 {
            // mapping an empty file fails on some platforms
            return Err(Error::EocdNotFound);
        }
        let mmap = unsafe { Mmap::map(&file)? };

        Self::parse(&mmap)
    }

    /// Parse the central directory of an in-memory archive.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let eocd_offset = find_eocd(data)?;
        let mut cursor = ByteCursor::new(&data[eocd_offset..]);

        cursor.expect_signature(EocdRecord::SIGNATURE)?;
        let eocd: EocdRecord = cursor.read_struct()?;

        let (total_entries, central_dir_offset) = if eocd.is_zip64() {
            read_zip64_eocd(data, eocd_offset)?
        } else {
            (
                eocd.central_dir_count_total as u64,
                eocd.central_dir_offset as u64,
            )
        };
        debug!(total_entries, central_dir_offset, "found end of central directory");

        let start = central_dir_offset as usize;
        if start > data.len() {
            return Err(Error::UnexpectedEof {
                needed: start,
                available: data.len(),
            });
        }

        // The count comes from the file; cap the reservation by what could fit.
        let max_possible = (data.len() - start) / (4 + std::mem::size_of::<CentralDirectoryHeader>());
        let mut entries = Vec::with_capacity((total_entries as usize).min(max_possible));

        let mut cursor = ByteCursor::new(&data[start..]);
        for _ in 0..total_entries {
            entries.push(read_entry(&mut cursor)?);
        }

        Ok(Self { entries })
    }

    /// Get the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in central directory order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &CentralEntry> + '_ {
        self.entries.iter()
    }

    /// Get entry by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&CentralEntry> {
        self.entries.get(index)
    }

    /// Find an entry by its exact name.
    pub fn find(&self, name: &str) -> Option<&CentralEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    /// File entries that would not extract as executable.
    pub fn non_executable(&self) -> impl Iterator<Item = &CentralEntry> + '_ {
        self.entries
            .iter()
            .filter(|e| !e.is_dir() && !e.is_executable())
    }
}

impl IntoIterator for CentralDirectory {
    type Item = CentralEntry;
    type IntoIter = std::vec::IntoIter<CentralEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Names of the file entries in the archive at `path` that are not
/// executable by user, group and other.
pub fn non_executable_entries<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let directory = CentralDirectory::open(path)?;

    Ok(directory
        .non_executable()
        .map(|e| e.name().to_string())
        .collect())
}

fn find_eocd(data: &[u8]) -> Result<usize> {
    if data.len() < EocdRecord::SIZE_WITH_SIGNATURE {
        return Err(Error::EocdNotFound);
    }

    let search_start = data.len().saturating_sub(EOCD_SEARCH_WINDOW);
    let search_end = data.len() - EocdRecord::SIZE_WITH_SIGNATURE + 4;

    memchr::memmem::rfind(&data[search_start..search_end], &EocdRecord::MAGIC)
        .map(|pos| search_start + pos)
        .ok_or(Error::EocdNotFound)
}

fn read_zip64_eocd(data: &[u8], eocd_offset: usize) -> Result<(u64, u64)> {
    // The locator sits immediately before the EOCD record.
    let locator_offset = eocd_offset
        .checked_sub(Eocd64Locator::SIZE_WITH_SIGNATURE)
        .ok_or(Error::Zip64EocdNotFound)?;

    let mut cursor = ByteCursor::new(&data[locator_offset..]);
    if cursor.read_u32()? != Eocd64Locator::SIGNATURE {
        return Err(Error::Zip64EocdNotFound);
    }
    let locator: Eocd64Locator = cursor.read_struct()?;

    let eocd64_offset = locator.zip64_eocd_offset as usize;
    if eocd64_offset >= data.len() {
        return Err(Error::Zip64EocdNotFound);
    }

    let mut cursor = ByteCursor::new(&data[eocd64_offset..]);
    cursor.expect_signature(Eocd64Record::SIGNATURE)?;
    let eocd64: Eocd64Record = cursor.read_struct()?;

    Ok((eocd64.central_dir_count_total, eocd64.central_dir_offset))
}

fn read_entry(cursor: &mut ByteCursor<'_>) -> Result<CentralEntry> {
    cursor.expect_signature(CentralDirectoryHeader::SIGNATURE)?;
    let header: CentralDirectoryHeader = cursor.read_struct()?;

    let name_bytes = cursor.read_bytes(header.file_name_length as usize)?;
    let name = String::from_utf8_lossy(name_bytes).into_owned();

    let mut compressed_size = header.compressed_size as u64;
    let mut uncompressed_size = header.uncompressed_size as u64;
    let mut local_header_offset = header.local_header_offset as u64;

    let extra = cursor.read_bytes(header.extra_field_length as usize)?;
    let mut extra = ByteCursor::new(extra);
    while extra.remaining() >= 4 {
        let id = extra.read_u16()?;
        let size = extra.read_u16()? as usize;
        let field = extra.read_bytes(size)?;

        if id != extra_field::ZIP64 {
            continue;
        }

        // Only the values whose header field holds the sentinel are present,
        // in this fixed order.
        let mut zip64 = ByteCursor::new(field);
        if header.uncompressed_size == u32::MAX {
            uncompressed_size = zip64.read_u64()?;
        }
        if header.compressed_size == u32::MAX {
            compressed_size = zip64.read_u64()?;
        }
        if header.local_header_offset == u32::MAX {
            local_header_offset = zip64.read_u64()?;
        }
    }

    cursor.advance(header.file_comment_length as usize);

    trace!(
        name = %name,
        version_made_by = { header.version_made_by },
        external_attrs = { header.external_attrs },
        "read central directory entry"
    );

    Ok(CentralEntry {
        name,
        version_made_by: header.version_made_by,
        version_needed: header.version_needed,
        flags: header.flags,
        compression_method: header.compression_method,
        dos_datetime: header.last_modified,
        crc32: header.crc32,
        compressed_size,
        uncompressed_size,
        external_attributes: header.external_attrs,
        local_header_offset,
    })
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use ::zip::write::SimpleFileOptions;
    use ::zip::{CompressionMethod, ZipWriter};

    use zerocopy::IntoBytes;

    use super::*;

    fn build(entries: &[(&str, &[u8], SimpleFileOptions)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data, options) in entries {
            writer.start_file(*name, *options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_parse_entries_in_order() {
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let exec = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o755);
        let data = build(&[("a.txt", b"alpha", stored), ("dir/b.bin", b"\x00\x01\x02", exec)]);

        let directory = CentralDirectory::parse(&data).unwrap();
        assert_eq!(directory.len(), 2);

        let a = directory.get(0).unwrap();
        assert_eq!(a.name(), "a.txt");
        assert_eq!(a.compression_method(), 0);
        assert_eq!(a.uncompressed_size(), 5);
        assert_eq!(a.create_system(), 3);
        assert_eq!(a.unix_mode(), Some(0o100644));
        assert!(!a.is_executable());

        let b = directory.find("dir/b.bin").unwrap();
        assert_eq!(b.compression_method(), 8);
        assert_eq!(b.external_attributes() >> 16, 0x81ed);
        assert!(b.is_executable());

        let names: Vec<_> = directory.non_executable().map(|e| e.name()).collect();
        assert_eq!(names, ["a.txt"]);
    }

    #[test]
    fn test_parse_zip64_archive() {
        // More entries than the 16-bit EOCD count can hold.
        let count = 70_000;
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for i in 0..count {
            writer.start_file(format!("f{}", i), options).unwrap();
        }
        let data = writer.finish().unwrap().into_inner();

        let eocd = find_eocd(&data).unwrap();
        let mut cursor = ByteCursor::new(&data[eocd..]);
        cursor.expect_signature(EocdRecord::SIGNATURE).unwrap();
        assert!(cursor.read_struct::<EocdRecord>().unwrap().is_zip64());

        let directory = CentralDirectory::parse(&data).unwrap();
        assert_eq!(directory.len(), count);
        assert_eq!(directory.get(count - 1).unwrap().name(), "f69999");
    }

    #[test]
    fn test_parse_zip64_extra_field() {
        let name = b"huge.bin";
        let uncompressed: u64 = 0x1_2345_6789;
        let compressed: u64 = 0x1_0000_0001;
        let local_offset: u64 = 0x2_0000_0000;

        let mut extra = Vec::new();
        extra.extend_from_slice(&0x7875u16.to_le_bytes()); // unrelated field first
        extra.extend_from_slice(&3u16.to_le_bytes());
        extra.extend_from_slice(&[1, 0, 0]);
        extra.extend_from_slice(&extra_field::ZIP64.to_le_bytes());
        extra.extend_from_slice(&24u16.to_le_bytes());
        extra.extend_from_slice(&uncompressed.to_le_bytes());
        extra.extend_from_slice(&compressed.to_le_bytes());
        extra.extend_from_slice(&local_offset.to_le_bytes());

        let header = CentralDirectoryHeader {
            version_made_by: 0x032d,
            version_needed: 45,
            flags: 0,
            compression_method: 8,
            last_modified: 0,
            crc32: 0xDEAD_BEEF,
            compressed_size: u32::MAX,
            uncompressed_size: u32::MAX,
            file_name_length: name.len() as u16,
            extra_field_length: extra.len() as u16,
            file_comment_length: 0,
            disk_number_start: 0,
            internal_attrs: 0,
            external_attrs: 0x81ed_0000,
            local_header_offset: u32::MAX,
        };

        let mut data = Vec::new();
        data.extend_from_slice(&CentralDirectoryHeader::SIGNATURE.to_le_bytes());
        data.extend_from_slice(header.as_bytes());
        data.extend_from_slice(name);
        data.extend_from_slice(&extra);
        let central_dir_size = data.len() as u64;

        let eocd64_offset = data.len() as u64;
        let eocd64 = Eocd64Record {
            record_size: (std::mem::size_of::<Eocd64Record>() - 8) as u64,
            version_made_by: 0x032d,
            version_needed: 45,
            disk_number: 0,
            central_dir_disk: 0,
            central_dir_count_disk: 1,
            central_dir_count_total: 1,
            central_dir_size,
            central_dir_offset: 0,
        };
        data.extend_from_slice(&Eocd64Record::SIGNATURE.to_le_bytes());
        data.extend_from_slice(eocd64.as_bytes());

        let locator = Eocd64Locator {
            zip64_eocd_disk: 0,
            zip64_eocd_offset: eocd64_offset,
            total_disks: 1,
        };
        data.extend_from_slice(&Eocd64Locator::SIGNATURE.to_le_bytes());
        data.extend_from_slice(locator.as_bytes());

        let eocd = EocdRecord {
            disk_number: 0,
            central_dir_disk: 0,
            central_dir_count_disk: 0xFFFF,
            central_dir_count_total: 0xFFFF,
            central_dir_size: 0xFFFF_FFFF,
            central_dir_offset: 0xFFFF_FFFF,
            comment_length: 0,
        };
        data.extend_from_slice(&EocdRecord::SIGNATURE.to_le_bytes());
        data.extend_from_slice(eocd.as_bytes());

        let directory = CentralDirectory::parse(&data).unwrap();
        assert_eq!(directory.len(), 1);

        let entry = directory.get(0).unwrap();
        assert_eq!(entry.name(), "huge.bin");
        assert_eq!(entry.uncompressed_size(), uncompressed);
        assert_eq!(entry.compressed_size(), compressed);
        assert_eq!(entry.local_header_offset(), local_offset);
        assert_eq!(entry.crc32(), 0xDEAD_BEEF);
        assert!(entry.is_executable());
    }

    #[test]
    fn test_zip64_locator_missing() {
        let eocd = EocdRecord {
            disk_number: 0,
            central_dir_disk: 0,
            central_dir_count_disk: 0xFFFF,
            central_dir_count_total: 0xFFFF,
            central_dir_size: 0xFFFF_FFFF,
            central_dir_offset: 0xFFFF_FFFF,
            comment_length: 0,
        };
        let mut data = vec![0u8; 32];
        data.extend_from_slice(&EocdRecord::SIGNATURE.to_le_bytes());
        data.extend_from_slice(eocd.as_bytes());

        assert!(matches!(
            CentralDirectory::parse(&data),
            Err(Error::Zip64EocdNotFound)
        ));
    }

    #[test]
    fn test_parse_empty_archive() {
        let data = build(&[]);
        let directory = CentralDirectory::parse(&data).unwrap();

        assert!(directory.is_empty());
        assert_eq!(directory.non_executable().count(), 0);
    }

    #[test]
    fn test_parse_with_archive_comment() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.set_comment("built by the release pipeline");
        writer
            .start_file("bootstrap", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"#!/bin/sh\n").unwrap();
        let data = writer.finish().unwrap().into_inner();

        let directory = CentralDirectory::parse(&data).unwrap();
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.get(0).unwrap().name(), "bootstrap");
    }

    #[test]
    fn test_rejects_non_zip() {
        assert!(matches!(
            CentralDirectory::parse(b"not a zip archive at all, just some text"),
            Err(Error::EocdNotFound)
        ));
        assert!(matches!(CentralDirectory::parse(b""), Err(Error::EocdNotFound)));
    }

    #[test]
    fn test_rejects_truncated_central_directory() {
        let data = build(&[("a.txt", b"alpha", SimpleFileOptions::default())]);
        let eocd = find_eocd(&data).unwrap();

        // Point the central directory one byte too far.
        let mut corrupted = data.clone();
        let offset_field = eocd + 16;
        let offset = u32::from_le_bytes(corrupted[offset_field..offset_field + 4].try_into().unwrap());
        corrupted[offset_field..offset_field + 4].copy_from_slice(&(offset + 1).to_le_bytes());

        assert!(matches!(
            CentralDirectory::parse(&corrupted),
            Err(Error::InvalidSignature { expected: CentralDirectoryHeader::SIGNATURE, .. })
        ));
    }

    #[test]
    fn test_open_and_list_non_executable() {
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let data = build(&[("bootstrap", b"#!/bin/sh\necho hi\n", stored)]);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&data).unwrap();
        file.flush().unwrap();

        assert_eq!(non_executable_entries(file.path()).unwrap(), ["bootstrap"]);
    }

    #[test]
    fn test_open_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            CentralDirectory::open(file.path()),
            Err(Error::EocdNotFound)
        ));
    }
}
