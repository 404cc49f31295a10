//! Dataset fetcher.
//!
//! Stages a remote dataset under a fixed local directory:
//!
//! 1. the previous data directory is removed (absence is reported, not an error)
//! 2. the dataset is downloaded into a staging directory named after the
//!    download's default output folder (e.g. `netflix-shows`)
//! 3. the staging directory is renamed to the canonical data directory
//!
//! A failed fetch removes the partial staging directory. Two fetches
//! against the same directory must not run concurrently.

use crate::config::FetchConfig;
use crate::download::{DatasetDownloader, KaggleDownloader};
use crate::error::{DatasetError, Result, ResultExt};
use crate::source::DatasetSource;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Message reported when there is no previous data directory to remove.
pub const DATA_NOT_FOUND_MESSAGE: &str = "Data not found, creating new data directory";

/// What happened to the previous data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cleanup {
    /// An existing directory was deleted with all its contents.
    Removed,
    /// There was nothing to delete.
    Absent,
}

/// Result of a successful fetch.
#[derive(Debug, Clone, Serialize)]
pub struct FetchOutcome {
    /// Dataset that was downloaded.
    pub source: DatasetSource,
    /// Location of the freshly populated data directory.
    pub data_dir: PathBuf,
    /// State of the data directory before the fetch.
    pub previous: Cleanup,
    /// Whether the download was skipped because a staged copy already existed.
    pub reused_staging: bool,
    /// Number of regular files now under `data_dir`.
    pub file_count: usize,
}

/// Remove `path` recursively.
///
/// Only a missing directory is tolerated, and [`DATA_NOT_FOUND_MESSAGE`] is
/// printed to stdout in that case. Permission and other errors are returned
/// to the caller.
pub fn clear_data_dir(path: &Path) -> Result<Cleanup> {
    match fs::remove_dir_all(path) {
        Ok(()) => {
            debug!("Removed previous data directory {}", path.display());
            Ok(Cleanup::Removed)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            println!("{}", DATA_NOT_FOUND_MESSAGE);
            Ok(Cleanup::Absent)
        }
        Err(e) => Err(DatasetError::Io(e).with_context(format!("Removing {}", path.display()))),
    }
}

/// Staging directory that is deleted on drop unless promoted.
#[derive(Debug)]
pub struct StagingDir {
    path: PathBuf,
    reused: bool,
    armed: bool,
}

impl StagingDir {
    /// Acquire the staging path.
    ///
    /// With `force`, a leftover directory is discarded first. Without it an
    /// existing directory is kept and reported through [`StagingDir::reused`].
    pub fn acquire(path: PathBuf, force: bool) -> Result<Self> {
        let exists = path.is_dir();
        if exists && force {
            debug!("Discarding stale staging directory {}", path.display());
            fs::remove_dir_all(&path).context(format!("Removing {}", path.display()))?;
        }

        Ok(Self {
            reused: exists && !force,
            path,
            armed: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a previously staged download is being reused.
    pub fn reused(&self) -> bool {
        self.reused
    }

    /// Move the staged directory to `target`, disarming the cleanup guard.
    pub fn promote(mut self, target: &Path) -> Result<PathBuf> {
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context(format!("Creating {}", parent.display()))?;
        }
        fs::rename(&self.path, target).context(format!(
            "Moving {} to {}",
            self.path.display(),
            target.display()
        ))?;
        self.armed = false;
        Ok(target.to_path_buf())
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        // A reused directory predates this fetch and is left alone
        if !self.armed || self.reused {
            return;
        }
        match fs::remove_dir_all(&self.path) {
            Ok(()) => debug!("Removed partial staging directory {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove staging directory {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// Fetches a dataset into the configured data directory.
pub struct DatasetFetcher<D> {
    config: FetchConfig,
    downloader: D,
}

impl<D: DatasetDownloader> DatasetFetcher<D> {
    pub fn new(config: FetchConfig, downloader: D) -> Self {
        Self { config, downloader }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Replace the data directory with a fresh copy of the dataset.
    ///
    /// # Errors
    ///
    /// Removal errors other than "not found", credential, network, archive
    /// and rename failures are all returned unchanged in kind. No retries.
    pub fn download_dataset(&self) -> Result<FetchOutcome> {
        let source = self.config.source()?;
        let data_dir = self.config.data_path();

        let previous = clear_data_dir(&data_dir)?;

        let staging = StagingDir::acquire(
            self.config.work_dir.join(source.folder_name()),
            self.config.force,
        )?;

        if staging.reused() {
            info!(
                "{} already exists, skipping download (use force to re-download)",
                staging.path().display()
            );
        } else {
            debug!("Using downloader {}", self.downloader.name());
            self.downloader
                .download(&source, staging.path())
                .context(format!("Downloading {}", source))?;
        }

        let reused_staging = staging.reused();
        let data_dir = staging.promote(&data_dir)?;
        let file_count = count_files(&data_dir)?;

        info!(
            "Dataset {} ready in {} ({} files)",
            source,
            data_dir.display(),
            file_count
        );

        Ok(FetchOutcome {
            source,
            data_dir,
            previous,
            reused_staging,
            file_count,
        })
    }
}

impl DatasetFetcher<KaggleDownloader> {
    /// Fetcher backed by the Kaggle API.
    ///
    /// Credentials are looked up when the download starts, after the old
    /// data directory has been cleared.
    pub fn kaggle(config: FetchConfig) -> Result<Self> {
        let downloader = KaggleDownloader::from_fetch_config(&config)?;
        Ok(Self::new(config, downloader))
    }
}

/// Fetch the default dataset into `./data`, forcing a fresh download.
pub fn download_dataset() -> Result<FetchOutcome> {
    DatasetFetcher::kaggle(FetchConfig::default())?.download_dataset()
}

fn count_files(dir: &Path) -> Result<usize> {
    let mut count = 0;
    for entry in fs::read_dir(dir).context(format!("Reading {}", dir.display()))? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            count += count_files(&entry.path())?;
        } else if file_type.is_file() {
            count += 1;
        }
    }
    Ok(count)
}
