//! Source image fetcher.
//!
//! Downloads the bytes behind a remote URL into a request's scratch file.
//! A single attempt is made: an unreachable host, a transport failure or a
//! non-2xx status fails the request with [`PipelineError::Download`]. The
//! status code and reason are kept in the message so operators can tell a
//! missing source from a network problem.
//!
//! # Example
//!
//! ```ignore
//! use imgshift::fetcher::ImageFetcher;
//!
//! let fetcher = ImageFetcher::new(&config.fetch)?;
//! let bytes = fetcher.fetch("https://example.com/photo.jpg", &scratch).await?;
//! ```

use reqwest::Url;
use tokio::io::AsyncWriteExt;

use crate::config::FetchConfig;
use crate::error::PipelineError;
use crate::scratch::ScratchFile;

/// HTTP(S) downloader for source images
#[derive(Clone)]
pub struct ImageFetcher {
    http_client: reqwest::Client,
    max_source_bytes: u64,
}

impl std::fmt::Debug for ImageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFetcher")
            .field("max_source_bytes", &self.max_source_bytes)
            .finish()
    }
}

impl ImageFetcher {
    /// Create a new fetcher with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `std::io::Error` if the HTTP client cannot be created
    /// (e.g., TLS configuration issues).
    pub fn new(config: &FetchConfig) -> std::io::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("imgshift/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            http_client,
            max_source_bytes: config.max_source_bytes,
        })
    }

    /// Download `url` into `destination`, replacing its contents.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Download` if:
    /// - The URL is malformed or not http/https
    /// - The connection or transfer fails (including timeouts)
    /// - The response status is not 2xx
    /// - The body exceeds `max_source_bytes`
    ///
    /// Returns `PipelineError::Scratch` if the scratch file cannot be written.
    pub async fn fetch(&self, url: &str, destination: &ScratchFile) -> Result<u64, PipelineError> {
        let parsed = Url::parse(url)
            .map_err(|e| PipelineError::download(url, format!("Invalid URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PipelineError::download(
                url,
                format!("Unsupported source protocol: {}", parsed.scheme()),
            ));
        }

        let mut response = self
            .http_client
            .get(parsed)
            .send()
            .await
            .map_err(|e| PipelineError::download(url, format!("HTTP fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(PipelineError::download(
                url,
                format!("HTTP request failed with status: {}", response.status()),
            ));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_source_bytes {
                return Err(self.too_large(url, length));
            }
        }

        let mut file = tokio::fs::File::create(destination.path())
            .await
            .map_err(PipelineError::Scratch)?;
        let mut written: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| PipelineError::download(url, format!("Failed to read HTTP body: {e}")))?
        {
            written += chunk.len() as u64;
            if written > self.max_source_bytes {
                return Err(self.too_large(url, written));
            }
            file.write_all(&chunk).await.map_err(PipelineError::Scratch)?;
        }
        file.flush().await.map_err(PipelineError::Scratch)?;

        tracing::debug!(
            source_url = %url,
            bytes = written,
            path = %destination.path().display(),
            "Downloaded source image"
        );

        Ok(written)
    }

    fn too_large(&self, url: &str, size: u64) -> PipelineError {
        PipelineError::download(
            url,
            format!(
                "Source size {} bytes exceeds maximum {} bytes",
                size, self.max_source_bytes
            ),
        )
    }
}
