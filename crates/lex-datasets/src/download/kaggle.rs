//! Kaggle dataset downloader.
//!
//! Downloads `{api_base}/datasets/download/{owner}/{slug}` with HTTP basic
//! auth, writes the archive into the destination directory, unpacks it and
//! removes the archive.
//!
//! Credentials are either given up front or looked up when a download
//! starts, so building a downloader never fails for lack of them.

use super::DatasetDownloader;
use super::archive::extract_archive;
use crate::config::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS, FetchConfig};
use crate::credentials::KaggleCredentials;
use crate::error::{DatasetError, Result, ResultExt};
use crate::source::DatasetSource;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Connection settings for [`KaggleDownloader`].
#[derive(Debug, Clone)]
pub struct KaggleConfig {
    /// Base URL of the Kaggle API.
    pub api_base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for KaggleConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl From<&FetchConfig> for KaggleConfig {
    fn from(config: &FetchConfig) -> Self {
        Self {
            api_base_url: config.api_base_url.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// Downloads datasets from the Kaggle public API.
pub struct KaggleDownloader {
    credentials: Option<KaggleCredentials>,
    /// Directory searched for `kaggle.json` when no credentials were given.
    work_dir: PathBuf,
    config: KaggleConfig,
    client: Client,
}

impl KaggleDownloader {
    /// Create a downloader with default connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(credentials: KaggleCredentials) -> Result<Self> {
        Self::with_config(credentials, KaggleConfig::default())
    }

    /// Create a downloader with custom connection settings.
    pub fn with_config(credentials: KaggleCredentials, config: KaggleConfig) -> Result<Self> {
        Self::build(Some(credentials), PathBuf::from("."), config)
    }

    /// Build a downloader for `config`.
    ///
    /// Credentials are resolved from its working directory and the
    /// environment each time [`DatasetDownloader::download`] runs.
    pub fn from_fetch_config(config: &FetchConfig) -> Result<Self> {
        Self::build(None, config.work_dir.clone(), KaggleConfig::from(config))
    }

    fn build(
        credentials: Option<KaggleCredentials>,
        work_dir: PathBuf,
        config: KaggleConfig,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("lex-datasets/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            credentials,
            work_dir,
            config,
            client,
        })
    }

    fn credentials(&self) -> Result<KaggleCredentials> {
        match &self.credentials {
            Some(credentials) => Ok(credentials.clone()),
            None => KaggleCredentials::resolve(&self.work_dir),
        }
    }

    /// Endpoint serving the archive for `source`.
    pub fn download_url(&self, source: &DatasetSource) -> String {
        format!(
            "{}/datasets/download/{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            source.owner(),
            source.slug()
        )
    }
}

impl DatasetDownloader for KaggleDownloader {
    fn download(&self, source: &DatasetSource, dest: &Path) -> Result<()> {
        let credentials = self.credentials()?;
        fs::create_dir_all(dest).context(format!("Creating {}", dest.display()))?;

        let url = self.download_url(source);
        info!("Downloading dataset {} from {}", source, url);

        let mut response = self
            .client
            .get(&url)
            .basic_auth(&credentials.username, Some(&credentials.key))
            .send()?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DatasetError::Authentication {
                dataset: source.id(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(DatasetError::DownloadFailed {
                dataset: source.id(),
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            });
        }

        let archive_path = dest.join(source.archive_name());
        let mut file =
            File::create(&archive_path).context(format!("Creating {}", archive_path.display()))?;
        let bytes = response.copy_to(&mut file)?;
        file.flush()?;
        drop(file);
        debug!("Wrote {} bytes to {}", bytes, archive_path.display());

        let entries = extract_archive(&archive_path, dest)?;
        fs::remove_file(&archive_path)
            .context(format!("Removing {}", archive_path.display()))?;

        info!("Unpacked {} files into {}", entries, dest.display());
        Ok(())
    }

    fn name(&self) -> &str {
        "Kaggle"
    }
}

static_assertions::assert_impl_all!(KaggleDownloader: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Cursor, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};
    use tempfile::TempDir;

    /// Answer a single HTTP request with `status` and `body`.
    ///
    /// Returns the API base URL to point the downloader at and a handle
    /// yielding the raw request head.
    fn serve_once(status: &'static str, body: Vec<u8>) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}/api/v1", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            loop {
                let mut line = String::new();
                let read = reader.read_line(&mut line).unwrap();
                if read == 0 || line == "\r\n" {
                    break;
                }
                head.push_str(&line);
            }

            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            )
            .unwrap();
            stream.write_all(&body).unwrap();
            stream.flush().unwrap();
            head
        });

        (base, handle)
    }

    fn zipped_csv() -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut writer = ::zip::ZipWriter::new(Cursor::new(&mut buf));
            writer
                .start_file(
                    "netflix_titles.csv",
                    ::zip::write::SimpleFileOptions::default(),
                )
                .unwrap();
            writer.write_all(b"show_id,title\ns1,Dick Johnson Is Dead\n").unwrap();
            writer.finish().unwrap();
        }
        buf
    }

    fn downloader(base: &str) -> KaggleDownloader {
        KaggleDownloader::with_config(
            KaggleCredentials::new("user", "key"),
            KaggleConfig {
                api_base_url: base.to_string(),
                timeout_secs: 5,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_download_url() {
        let d = downloader(DEFAULT_API_BASE_URL);
        assert_eq!(
            d.download_url(&DatasetSource::default()),
            "https://www.kaggle.com/api/v1/datasets/download/shivamb/netflix-shows"
        );
    }

    #[test]
    fn test_download_url_trailing_slash() {
        let d = downloader("http://localhost:9000/api/v1/");
        let source: DatasetSource = "heptapod/titanic".parse().unwrap();
        assert_eq!(
            d.download_url(&source),
            "http://localhost:9000/api/v1/datasets/download/heptapod/titanic"
        );
    }

    #[test]
    fn test_config_from_fetch_config() {
        let fetch = FetchConfig::builder()
            .api_base_url("http://mirror/api/v1")
            .timeout_secs(42)
            .build()
            .unwrap();
        let config = KaggleConfig::from(&fetch);
        assert_eq!(config.api_base_url, "http://mirror/api/v1");
        assert_eq!(config.timeout_secs, 42);
    }

    #[test]
    fn test_name() {
        assert_eq!(downloader(DEFAULT_API_BASE_URL).name(), "Kaggle");
    }

    #[test]
    fn test_download_unpacks_archive() {
        let (base, server) = serve_once("200 OK", zipped_csv());
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("netflix-shows");

        downloader(&base)
            .download(&DatasetSource::default(), &dest)
            .unwrap();

        let head = server.join().unwrap();
        assert!(head.starts_with("GET /api/v1/datasets/download/shivamb/netflix-shows "));
        assert!(head.to_lowercase().contains("authorization: basic "));
        assert!(dest.join("netflix_titles.csv").is_file());
        assert!(!dest.join("netflix-shows.zip").exists());
    }

    #[test]
    fn test_download_unauthorized() {
        let (base, server) = serve_once("401 Unauthorized", Vec::new());
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("netflix-shows");

        let err = downloader(&base)
            .download(&DatasetSource::default(), &dest)
            .unwrap_err();
        server.join().unwrap();

        assert_eq!(err.error_code(), "AUTHENTICATION_FAILED");
        assert!(matches!(err, DatasetError::Authentication { status: 401, .. }));
        assert!(!dest.join("netflix-shows.zip").exists());
    }

    #[test]
    fn test_download_forbidden() {
        let (base, server) = serve_once("403 Forbidden", Vec::new());
        let tmp = TempDir::new().unwrap();

        let err = downloader(&base)
            .download(&DatasetSource::default(), tmp.path())
            .unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, DatasetError::Authentication { status: 403, .. }));
    }

    #[test]
    fn test_download_server_error_keeps_body() {
        let (base, server) = serve_once("500 Internal Server Error", b"quota exceeded".to_vec());
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("netflix-shows");

        let err = downloader(&base)
            .download(&DatasetSource::default(), &dest)
            .unwrap_err();
        server.join().unwrap();

        assert_eq!(err.error_code(), "DOWNLOAD_FAILED");
        assert!(err.is_download_failure());
        assert!(err.to_string().contains("quota exceeded"));
        assert!(!dest.join("netflix-shows.zip").exists());
    }

    #[test]
    fn test_from_fetch_config_needs_no_credentials() {
        let tmp = TempDir::new().unwrap();
        let config = FetchConfig::builder().work_dir(tmp.path()).build().unwrap();

        let downloader = KaggleDownloader::from_fetch_config(&config).unwrap();
        assert_eq!(downloader.name(), "Kaggle");
        assert!(downloader.credentials.is_none());
    }

    #[test]
    fn test_local_credentials_resolved_at_download() {
        let (base, server) = serve_once("200 OK", zipped_csv());
        let tmp = TempDir::new().unwrap();
        let config = FetchConfig::builder()
            .work_dir(tmp.path())
            .api_base_url(base)
            .build()
            .unwrap();
        let downloader = KaggleDownloader::from_fetch_config(&config).unwrap();

        // written after construction; picked up by the download itself
        fs::write(
            tmp.path().join("kaggle.json"),
            r#"{"username": "late", "key": "k"}"#,
        )
        .unwrap();
        downloader
            .download(&DatasetSource::default(), &tmp.path().join("netflix-shows"))
            .unwrap();

        let head = server.join().unwrap();
        // base64("late:k")
        assert!(head.contains("bGF0ZTpr"));
    }
}
