//! Tabular sources and fetching

use reviewpulse_core::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Where the tab-separated review resource lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusSource {
    /// Remote resource fetched over HTTP(S)
    Http(String),

    /// Local file
    File(PathBuf),

    /// Document held in memory
    Inline(String),
}

impl CorpusSource {
    /// Interpret a URI: `http(s)://` is remote, `file://` and bare paths are local
    pub fn parse(uri: &str) -> Self {
        let uri = uri.trim();
        if uri.starts_with("http://") || uri.starts_with("https://") {
            Self::Http(uri.to_string())
        } else if let Some(path) = uri.strip_prefix("file://") {
            Self::File(PathBuf::from(path))
        } else {
            Self::File(PathBuf::from(uri))
        }
    }

    /// Create an in-memory source
    pub fn inline(text: impl Into<String>) -> Self {
        Self::Inline(text.into())
    }
}

impl fmt::Display for CorpusSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Inline(_) => f.write_str("<inline>"),
        }
    }
}

/// Retrieves the raw text of a [`CorpusSource`]
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl SourceFetcher {
    /// Create a fetcher with a default HTTP client and no timeout
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: None,
        }
    }

    /// Use a pre-configured HTTP client
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Bound remote fetches by a timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Fetch the full text of the source.
    ///
    /// Transport failures, non-success statuses and unreadable files are
    /// reported as `SourceUnavailable`; undecodable bytes as `Parse`.
    pub async fn fetch(&self, source: &CorpusSource) -> Result<String> {
        match source {
            CorpusSource::Http(url) => self.fetch_http(url).await,
            CorpusSource::File(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    Error::source_unavailable(format!("failed to read {}: {e}", path.display()))
                })?;
                decode(bytes)
            }
            CorpusSource::Inline(text) => Ok(text.clone()),
        }
    }

    async fn fetch_http(&self, url: &str) -> Result<String> {
        debug!(url, "Fetching tabular source");

        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache");
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::source_unavailable(format!("failed to fetch {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::source_unavailable(format!(
                "HTTP {} while fetching {url}",
                status.as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::source_unavailable(format!("failed to read body of {url}: {e}")))?;

        decode(bytes.to_vec())
    }
}

impl Default for SourceFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| Error::parse(format!("resource is not valid UTF-8: {e}")))
}
