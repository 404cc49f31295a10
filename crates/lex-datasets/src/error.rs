//! Error types for dataset fetching and inspection.
//!
//! All fallible library operations return [`DatasetError`]. Errors are
//! serializable as `{code, message}` so callers can forward them to a
//! frontend or emit them as JSON from the CLI.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the dataset utilities.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Column was not found in the table.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// No Kaggle credentials could be located.
    #[error("Kaggle credentials not found: {0}")]
    MissingCredentials(String),

    /// The dataset source URL could not be turned into a dataset id.
    #[error("Invalid dataset source '{0}'")]
    InvalidSource(String),

    /// The remote rejected the supplied credentials.
    #[error("Authentication failed for dataset '{dataset}' (HTTP {status})")]
    Authentication { dataset: String, status: u16 },

    /// The remote answered with a non-success status.
    #[error("Download of '{dataset}' failed with HTTP {status}: {message}")]
    DownloadFailed {
        dataset: String,
        status: u16,
        message: String,
    },

    /// The downloaded archive could not be unpacked.
    #[error("Failed to extract archive: {0}")]
    Archive(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Zip container error.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DatasetError>,
    },
}

impl DatasetError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DatasetError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, preserved through [`DatasetError::with_context`].
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::MissingCredentials(_) => "MISSING_CREDENTIALS",
            Self::InvalidSource(_) => "INVALID_SOURCE",
            Self::Authentication { .. } => "AUTHENTICATION_FAILED",
            Self::DownloadFailed { .. } => "DOWNLOAD_FAILED",
            Self::Archive(_) => "ARCHIVE_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Http(_) => "HTTP_REQUEST_ERROR",
            Self::Zip(_) => "ZIP_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the failure came from the network side of a fetch.
    pub fn is_download_failure(&self) -> bool {
        match self {
            Self::Authentication { .. }
            | Self::DownloadFailed { .. }
            | Self::MissingCredentials(_)
            | Self::Http(_) => true,
            Self::WithContext { source, .. } => source.is_download_failure(),
            _ => false,
        }
    }
}

impl Serialize for DatasetError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("DatasetError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| DatasetError::Io(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| DatasetError::Polars(e).with_context(context))
    }
}
