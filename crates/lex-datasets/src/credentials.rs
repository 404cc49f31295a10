//! Kaggle API credential discovery.
//!
//! Lookup order:
//! 1. `kaggle.json` in the working directory
//! 2. `KAGGLE_USERNAME` / `KAGGLE_KEY` environment variables
//! 3. `$KAGGLE_CONFIG_DIR/kaggle.json`
//! 4. `~/.kaggle/kaggle.json`

use crate::error::{DatasetError, Result, ResultExt};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CREDENTIALS_FILE: &str = "kaggle.json";

/// Username and API key for the Kaggle API.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct KaggleCredentials {
    pub username: String,
    pub key: String,
}

impl fmt::Debug for KaggleCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KaggleCredentials")
            .field("username", &self.username)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl KaggleCredentials {
    pub fn new(username: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            key: key.into(),
        }
    }

    /// Resolve credentials from the process environment.
    pub fn resolve(work_dir: &Path) -> Result<Self> {
        Self::resolve_with(work_dir, |name| std::env::var(name).ok())
    }

    /// Resolve credentials using `env` to read environment variables.
    pub fn resolve_with<F>(work_dir: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let local = work_dir.join(CREDENTIALS_FILE);
        if local.is_file() {
            debug!("Using Kaggle credentials from {}", local.display());
            return Self::from_file(&local);
        }

        let username = env("KAGGLE_USERNAME").filter(|v| !v.trim().is_empty());
        let key = env("KAGGLE_KEY").filter(|v| !v.trim().is_empty());
        if let (Some(username), Some(key)) = (username, key) {
            debug!("Using Kaggle credentials from environment");
            return Ok(Self::new(username, key));
        }

        let mut searched = vec![local];
        let config_dirs = [
            env("KAGGLE_CONFIG_DIR").map(PathBuf::from),
            env("HOME").map(|home| PathBuf::from(home).join(".kaggle")),
        ];
        for dir in config_dirs.into_iter().flatten() {
            let path = dir.join(CREDENTIALS_FILE);
            if path.is_file() {
                debug!("Using Kaggle credentials from {}", path.display());
                return Self::from_file(&path);
            }
            searched.push(path);
        }

        let searched = searched
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Err(DatasetError::MissingCredentials(format!(
            "set KAGGLE_USERNAME and KAGGLE_KEY or provide kaggle.json (searched: {})",
            searched
        )))
    }

    /// Read a `kaggle.json` file of the form `{"username": ..., "key": ...}`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .context(format!("Reading credentials from {}", path.display()))?;
        let creds: Self = serde_json::from_str(&raw).map_err(|e| {
            DatasetError::Json(e).with_context(format!("Parsing {}", path.display()))
        })?;

        if creds.username.trim().is_empty() || creds.key.trim().is_empty() {
            return Err(DatasetError::MissingCredentials(format!(
                "{} has an empty username or key",
                path.display()
            )));
        }
        Ok(creds)
    }
}
