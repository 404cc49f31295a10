//! Zip archive extraction.

use crate::error::{DatasetError, Result, ResultExt};
use std::fs::File;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Unpack the zip archive at `archive` into `dest`, returning the number of
/// entries it contained.
///
/// Entries whose names would escape `dest` are rejected by the zip reader.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive).context(format!("Opening {}", archive.display()))?;

    let mut zip = ZipArchive::new(file).map_err(|e| {
        DatasetError::Archive(format!("{} is not a valid zip archive: {}", archive.display(), e))
    })?;
    let entries = zip.len();

    zip.extract(dest).map_err(|e| {
        DatasetError::Zip(e).with_context(format!("Extracting {}", archive.display()))
    })?;

    debug!("Extracted {} entries into {}", entries, dest.display());
    Ok(entries)
}
