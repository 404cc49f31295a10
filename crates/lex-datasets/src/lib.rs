//! Dataset fetching and null inspection utilities.
//!
//! # Overview
//!
//! - **Dataset Fetcher**: replaces a local `data` directory with a fresh
//!   download of a Kaggle dataset (by default the Netflix titles dataset)
//! - **Null Inspector**: reports which columns of a polars [`DataFrame`]
//!   contain nulls and extracts the rows where a given column is null
//!
//! The two components are independent; the inspector is usually pointed at
//! a CSV that the fetcher placed under `data/`.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_datasets::{check_for_null_entries, download_dataset, filter_incomplete_entries, load_csv};
//!
//! // Fetch into ./data (needs Kaggle credentials)
//! let outcome = download_dataset()?;
//!
//! let df = load_csv(outcome.data_dir.join("netflix_titles.csv"))?;
//! let report = check_for_null_entries(&df);
//! for column in report.columns_with_nulls() {
//!     println!("{column} has missing values");
//! }
//!
//! let no_director = filter_incomplete_entries(&df, "director")?;
//! println!("{} titles without a director", no_director.height());
//! ```
//!
//! # Custom fetches
//!
//! ```rust,ignore
//! use lex_datasets::{DatasetFetcher, FetchConfig};
//!
//! let config = FetchConfig::builder()
//!     .source_url("https://www.kaggle.com/datasets/heptapod/titanic")
//!     .data_dir("titanic")
//!     .build()?;
//!
//! let outcome = DatasetFetcher::kaggle(config)?.download_dataset()?;
//! ```
//!
//! [`DataFrame`]: polars::prelude::DataFrame

pub mod config;
pub mod credentials;
pub mod download;
pub mod error;
pub mod fetcher;
pub mod inspect;
pub mod source;

// Re-exports for convenient access
pub use config::{ConfigValidationError, FetchConfig, FetchConfigBuilder};
pub use credentials::KaggleCredentials;
pub use download::{DatasetDownloader, KaggleConfig, KaggleDownloader};
pub use error::{DatasetError, Result, ResultExt};
pub use fetcher::{
    Cleanup, DATA_NOT_FOUND_MESSAGE, DatasetFetcher, FetchOutcome, StagingDir, clear_data_dir,
    download_dataset,
};
pub use inspect::{
    ColumnNullStatus, NullReport, check_for_null_entries, filter_incomplete_entries, load_csv,
};
pub use source::{DEFAULT_SOURCE_URL, DatasetSource};
