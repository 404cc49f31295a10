//! Dataset source identifiers.
//!
//! A [`DatasetSource`] is parsed from a Kaggle dataset page URL
//! (`https://www.kaggle.com/shivamb/netflix-shows/notebooks`,
//! `https://www.kaggle.com/datasets/shivamb/netflix-shows`) or from a bare
//! `owner/slug` id.

use crate::error::{DatasetError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Page URL of the Netflix titles dataset fetched by default.
pub const DEFAULT_SOURCE_URL: &str = "https://www.kaggle.com/shivamb/netflix-shows/notebooks";

/// A Kaggle dataset, identified by owner and slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSource {
    owner: String,
    slug: String,
}

impl DatasetSource {
    /// Parse a dataset page URL or an `owner/slug` id.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || DatasetError::InvalidSource(input.to_string());

        let segments: Vec<String> = match Url::parse(trimmed) {
            Ok(url) => {
                let host = url.host_str().ok_or_else(invalid)?;
                if host != "kaggle.com" && !host.ends_with(".kaggle.com") {
                    return Err(invalid());
                }
                url.path_segments()
                    .map(|parts| {
                        parts
                            .filter(|p| !p.is_empty())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default()
            }
            Err(_) => trimmed
                .split('/')
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        };

        // "/datasets/owner/slug" and "/owner/slug/..." both name the same dataset
        let mut parts = segments.into_iter().skip_while(|s| s == "datasets");
        let owner = parts.next().ok_or_else(invalid)?;
        let slug = parts.next().ok_or_else(invalid)?;

        if !is_valid_segment(&owner) || !is_valid_segment(&slug) {
            return Err(invalid());
        }

        Ok(Self { owner, slug })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// `owner/slug`, as used by the Kaggle API.
    pub fn id(&self) -> String {
        format!("{}/{}", self.owner, self.slug)
    }

    /// Directory name the download tool writes into before relocation.
    pub fn folder_name(&self) -> &str {
        &self.slug
    }

    /// File name of the downloaded archive.
    pub fn archive_name(&self) -> String {
        format!("{}.zip", self.slug)
    }
}

impl Default for DatasetSource {
    fn default() -> Self {
        Self {
            owner: "shivamb".to_string(),
            slug: "netflix-shows".to_string(),
        }
    }
}

impl FromStr for DatasetSource {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.slug)
    }
}

fn is_valid_segment(segment: &str) -> bool {
    segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_notebooks_url() {
        let source = DatasetSource::parse(DEFAULT_SOURCE_URL).unwrap();
        assert_eq!(source.owner(), "shivamb");
        assert_eq!(source.slug(), "netflix-shows");
        assert_eq!(source.id(), "shivamb/netflix-shows");
        assert_eq!(source.folder_name(), "netflix-shows");
        assert_eq!(source, DatasetSource::default());
    }

    #[test]
    fn test_parse_datasets_url() {
        let source =
            DatasetSource::parse("https://www.kaggle.com/datasets/shivamb/netflix-shows").unwrap();
        assert_eq!(source.id(), "shivamb/netflix-shows");
    }

    #[test]
    fn test_parse_bare_id() {
        let source: DatasetSource = "heptapod/titanic".parse().unwrap();
        assert_eq!(source.owner(), "heptapod");
        assert_eq!(source.archive_name(), "titanic.zip");
        assert_eq!(source.to_string(), "heptapod/titanic");
    }

    #[test]
    fn test_rejects_foreign_host() {
        let err = DatasetSource::parse("https://example.com/shivamb/netflix-shows").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SOURCE");
    }

    #[test]
    fn test_rejects_incomplete_url() {
        assert!(DatasetSource::parse("https://www.kaggle.com/shivamb").is_err());
        assert!(DatasetSource::parse("https://www.kaggle.com/datasets").is_err());
        assert!(DatasetSource::parse("").is_err());
    }

    #[test]
    fn test_rejects_path_traversal() {
        assert!(DatasetSource::parse("../netflix-shows").is_err());
        assert!(DatasetSource::parse("owner/..").is_err());
    }
}
