//! Configuration for the dataset fetcher.
//!
//! This module provides [`FetchConfig`] and its builder. The defaults
//! reproduce the plain `download_dataset()` behaviour: fetch the Netflix
//! titles dataset into `./data`, forcing a fresh download.

use crate::source::{DEFAULT_SOURCE_URL, DatasetSource};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default Kaggle API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://www.kaggle.com/api/v1";

/// Default name of the canonical data directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default timeout for the archive download in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Configuration for a dataset fetch.
///
/// Use [`FetchConfig::builder()`] to create a validated configuration.
///
/// # Example
///
/// ```rust,ignore
/// use lex_datasets::FetchConfig;
///
/// let config = FetchConfig::builder()
///     .source_url("https://www.kaggle.com/datasets/heptapod/titanic")
///     .work_dir("/tmp/scratch")
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Kaggle dataset page URL (or `owner/slug` id) to download.
    /// Default: the Netflix titles dataset
    pub source_url: String,

    /// Name of the canonical data directory, relative to `work_dir`.
    /// Default: "data"
    pub data_dir: PathBuf,

    /// Directory the fetch operates in.
    /// Default: "." (the process working directory)
    pub work_dir: PathBuf,

    /// Re-download even if the download tool's output directory already exists.
    /// Default: true
    pub force: bool,

    /// Base URL of the Kaggle API (useful for proxies or mirrors).
    /// Default: "https://www.kaggle.com/api/v1"
    pub api_base_url: String,

    /// Timeout for the archive download in seconds.
    /// Default: 300
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            work_dir: PathBuf::from("."),
            force: true,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl FetchConfig {
    /// Create a new configuration builder.
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        DatasetSource::parse(&self.source_url)
            .map_err(|_| ConfigValidationError::InvalidSource(self.source_url.clone()))?;

        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyDataDir);
        }

        if self.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout(self.timeout_secs));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(ConfigValidationError::InvalidApiBaseUrl(
                self.api_base_url.clone(),
            ));
        }

        Ok(())
    }

    /// The parsed dataset source.
    pub fn source(&self) -> crate::Result<DatasetSource> {
        DatasetSource::parse(&self.source_url)
    }

    /// Absolute-or-relative path of the canonical data directory.
    pub fn data_path(&self) -> PathBuf {
        self.work_dir.join(&self.data_dir)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid dataset source '{0}' (expected a Kaggle dataset URL or owner/slug)")]
    InvalidSource(String),

    #[error("Data directory must not be empty")]
    EmptyDataDir,

    #[error("Invalid timeout: {0} (must be at least 1 second)")]
    InvalidTimeout(u64),

    #[error("Invalid API base URL '{0}' (must start with http:// or https://)")]
    InvalidApiBaseUrl(String),
}

impl From<ConfigValidationError> for crate::DatasetError {
    fn from(err: ConfigValidationError) -> Self {
        crate::DatasetError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`FetchConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct FetchConfigBuilder {
    source_url: Option<String>,
    data_dir: Option<PathBuf>,
    work_dir: Option<PathBuf>,
    force: Option<bool>,
    api_base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl FetchConfigBuilder {
    /// Set the dataset page URL or `owner/slug` id.
    pub fn source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Set the canonical data directory name.
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Set the directory the fetch operates in.
    pub fn work_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(path.into());
        self
    }

    /// Enable or disable forced re-download.
    pub fn force(mut self, force: bool) -> Self {
        self.force = Some(force);
        self
    }

    /// Set a custom Kaggle API base URL.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set the download timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `FetchConfig` or an error if validation fails.
    pub fn build(self) -> Result<FetchConfig, ConfigValidationError> {
        let config = FetchConfig {
            source_url: self
                .source_url
                .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            data_dir: self
                .data_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            work_dir: self.work_dir.unwrap_or_else(|| PathBuf::from(".")),
            force: self.force.unwrap_or(true),
            api_base_url: self
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.work_dir, PathBuf::from("."));
        assert!(config.force);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = FetchConfig::builder()
            .source_url("heptapod/titanic")
            .data_dir("raw")
            .work_dir("/tmp/fetch")
            .force(false)
            .api_base_url("http://localhost:8080/api/v1")
            .timeout_secs(10)
            .build()
            .unwrap();

        assert_eq!(config.source().unwrap().id(), "heptapod/titanic");
        assert_eq!(config.data_path(), PathBuf::from("/tmp/fetch/raw"));
        assert!(!config.force);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_validation_invalid_source() {
        let result = FetchConfig::builder()
            .source_url("https://example.com/x/y")
            .build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidSource(_)
        ));
    }

    #[test]
    fn test_validation_empty_data_dir() {
        let result = FetchConfig::builder().data_dir("").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyDataDir
        ));
    }

    #[test]
    fn test_validation_zero_timeout() {
        let result = FetchConfig::builder().timeout_secs(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidTimeout(0)
        ));
    }

    #[test]
    fn test_validation_bad_api_base() {
        let result = FetchConfig::builder().api_base_url("ftp://mirror").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidApiBaseUrl(_)
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "source_url": "https://www.kaggle.com/datasets/heptapod/titanic",
            "data_dir": "titanic",
            "work_dir": "scratch",
            "force": false,
            "api_base_url": "https://www.kaggle.com/api/v1",
            "timeout_secs": 60
        }"#;

        let config: FetchConfig = serde_json::from_str(json).expect("valid config json");
        assert!(config.validate().is_ok());
        assert_eq!(config.data_path(), PathBuf::from("scratch/titanic"));
        assert!(!config.force);
    }
}
