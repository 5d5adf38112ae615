//! HTTP downloads with a blocking reqwest client.

use std::path::Path;
use std::time::Duration;

use presswright_core::{
    application::{ApplicationError, ports::Downloader},
    error::PresswrightResult,
};
use reqwest::blocking::Client;
use tracing::{debug, instrument};

const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Clone)]
pub struct HttpDownloader {
    client: Client,
}

impl std::fmt::Debug for HttpDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDownloader").finish_non_exhaustive()
    }
}

impl HttpDownloader {
    pub fn new() -> PresswrightResult<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> PresswrightResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("presswright/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApplicationError::Download {
                url: String::new(),
                reason: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

impl Downloader for HttpDownloader {
    #[instrument(skip(self), fields(destination = %destination.display()))]
    fn download(&self, url: &str, destination: &Path) -> PresswrightResult<()> {
        let failed = |reason: String| ApplicationError::Download {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| failed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP {}", status.as_u16())).into());
        }

        let body = response.bytes().map_err(|e| failed(e.to_string()))?;
        std::fs::write(destination, &body).map_err(|e| ApplicationError::FilesystemError {
            path: destination.to_path_buf(),
            reason: format!("Failed to write download: {e}"),
        })?;

        debug!(bytes = body.len(), "Download complete");
        Ok(())
    }
}
