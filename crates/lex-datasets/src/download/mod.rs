//! Download backends for the dataset fetcher.
//!
//! The fetcher talks to remote sources through the [`DatasetDownloader`]
//! trait. [`KaggleDownloader`] is the production backend; tests and
//! embedders can supply their own implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_datasets::download::{DatasetDownloader, KaggleDownloader};
//! use lex_datasets::{DatasetSource, KaggleCredentials};
//!
//! let credentials = KaggleCredentials::resolve(std::path::Path::new("."))?;
//! let downloader = KaggleDownloader::new(credentials)?;
//! downloader.download(&DatasetSource::default(), std::path::Path::new("netflix-shows"))?;
//! ```

mod archive;
mod kaggle;
mod provider;

pub use archive::extract_archive;
pub use kaggle::{KaggleConfig, KaggleDownloader};
pub use provider::DatasetDownloader;
