//! Archive rewriter.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use tracing::{debug, instrument, trace, warn};
use zip::result::ZipError;
use zip::{ZipArchive, ZipWriter};

use crate::clock::{Clock, SystemClock};
use crate::metadata::EntryMetadata;
use crate::options::RewriteOptions;
use crate::{Error, Result};

/// Upper bound on the buffer reserved up front from a declared entry size.
const MAX_PREALLOCATION: u64 = 16 * 1024 * 1024;

/// Rewrite the archive at `src` into `dst` with every entry marked as an
/// executable regular file, stamped with the current local time.
///
/// `dst` is created or truncated. If the rewrite fails after `dst` was
/// created, the partial file is removed.
pub fn rewrite_permissions<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<()> {
    Rewriter::new().rewrite_file(src, dst)
}

/// Copies archives entry by entry, replacing each entry's metadata.
#[derive(Debug, Clone, Default)]
pub struct Rewriter<C = SystemClock> {
    options: RewriteOptions,
    clock: C,
}

impl Rewriter<SystemClock> {
    /// Create a rewriter with default options and the system clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a rewriter with the given options and the system clock.
    pub fn with_options(options: RewriteOptions) -> Self {
        Self {
            options,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> Rewriter<C> {
    /// Replace the time source.
    pub fn clock<D: Clock>(self, clock: D) -> Rewriter<D> {
        Rewriter {
            options: self.options,
            clock,
        }
    }

    /// Get the rewrite options.
    #[inline]
    pub fn options(&self) -> &RewriteOptions {
        &self.options
    }

    /// Rewrite the archive at `src` into a new archive at `dst`.
    #[instrument(level = "debug", skip_all, fields(src = %src.as_ref().display(), dst = %dst.as_ref().display()))]
    pub fn rewrite_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, src: P, dst: Q) -> Result<()> {
        let (src, dst) = (src.as_ref(), dst.as_ref());

        let source = File::open(src).map_err(|source| Error::OpenSource {
            path: src.to_path_buf(),
            source,
        })?;
        let mut archive =
            ZipArchive::new(BufReader::new(source)).map_err(Error::InvalidArchive)?;

        // Creating the destination truncates it, which would destroy the source.
        if is_same_file(src, dst) {
            return Err(Error::SameFile(dst.to_path_buf()));
        }

        let destination = File::create(dst).map_err(|source| Error::CreateDestination {
            path: dst.to_path_buf(),
            source,
        })?;

        let result = self
            .copy_entries(&mut archive, BufWriter::new(destination))
            .and_then(finish_destination);

        if let Err(err) = result {
            // The writer and its file handle are dropped by now.
            if let Err(remove_err) = fs::remove_file(dst) {
                warn!(%remove_err, "could not remove partial destination archive");
            }
            return Err(err);
        }

        Ok(())
    }

    /// Rewrite an archive read from `reader` into `writer`, returning the
    /// writer once the central directory has been written.
    pub fn rewrite<R: Read + Seek, W: Write + Seek>(&self, reader: R, writer: W) -> Result<W> {
        let mut archive = ZipArchive::new(reader).map_err(Error::InvalidArchive)?;
        self.copy_entries(&mut archive, writer)
    }

    fn copy_entries<R: Read + Seek, W: Write + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        writer: W,
    ) -> Result<W> {
        debug!(entries = archive.len(), "rewriting archive");

        let mut zip = ZipWriter::new(writer);

        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|source| Error::ReadEntry { index, source })?;

            let name = entry.name().to_string();
            let mut payload = Vec::with_capacity(entry.size().min(MAX_PREALLOCATION) as usize);
            entry
                .read_to_end(&mut payload)
                .map_err(|source| Error::ReadPayload {
                    name: name.clone(),
                    source,
                })?;

            let metadata = EntryMetadata::with_clock(&name, &self.clock, &self.options);
            let options = metadata.file_options(payload.len() as u64, &self.options);

            zip.start_file(metadata.name(), options)
                .map_err(|source| Error::WriteEntry {
                    name: name.clone(),
                    source,
                })?;
            zip.write_all(&payload)
                .map_err(|e| Error::WriteEntry {
                    name: name.clone(),
                    source: ZipError::Io(e),
                })?;

            trace!(
                name = %name,
                size = payload.len(),
                mode = metadata.unix_mode(),
                "rewrote entry"
            );
        }

        zip.finish().map_err(Error::Finish)
    }
}

/// Flush buffered output and sync the destination so write-back and close
/// errors surface instead of being dropped with the handle.
fn finish_destination(writer: BufWriter<File>) -> Result<()> {
    let file = writer
        .into_inner()
        .map_err(|e| Error::Finish(ZipError::Io(e.into_error())))?;
    file.sync_all().map_err(|e| Error::Finish(ZipError::Io(e)))
}

/// Whether both paths name the same file, hard links included.
#[cfg(unix)]
fn is_same_file(src: &Path, dst: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(src), fs::metadata(dst)) {
        (Ok(src), Ok(dst)) => src.dev() == dst.dev() && src.ino() == dst.ino(),
        _ => false,
    }
}

/// Whether both paths name the same file. Hard links are not detected.
#[cfg(not(unix))]
fn is_same_file(src: &Path, dst: &Path) -> bool {
    match (fs::canonicalize(src), fs::canonicalize(dst)) {
        (Ok(src), Ok(dst)) => src == dst,
        _ => false,
    }
}
