//! Downloader trait for abstracting the remote dataset host.

use crate::error::Result;
use crate::source::DatasetSource;
use std::path::Path;

/// Trait for backends that can materialise a dataset into a directory.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a fetcher can be shared.
pub trait DatasetDownloader: Send + Sync {
    /// Download `source` and leave its unpacked files inside `dest`.
    ///
    /// `dest` may not exist yet; implementations create it. Files already
    /// present in `dest` are overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or rejected, the
    /// transfer fails, or the archive cannot be unpacked. Nothing is retried.
    fn download(&self, source: &DatasetSource, dest: &Path) -> Result<()>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

impl<T: DatasetDownloader + ?Sized> DatasetDownloader for &T {
    fn download(&self, source: &DatasetSource, dest: &Path) -> Result<()> {
        (**self).download(source, dest)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: DatasetDownloader + ?Sized> DatasetDownloader for Box<T> {
    fn download(&self, source: &DatasetSource, dest: &Path) -> Result<()> {
        (**self).download(source, dest)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: DatasetDownloader + ?Sized> DatasetDownloader for std::sync::Arc<T> {
    fn download(&self, source: &DatasetSource, dest: &Path) -> Result<()> {
        (**self).download(source, dest)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
