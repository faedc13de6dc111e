//! Where collage images come from.
//!
//! `HttpImageSource` fetches over HTTPS from an allow-list of hosts, the
//! same hosts the file store serves public URLs from. Tests swap in an
//! in-memory source.

use std::time::Duration;

use crate::config::HttpTimeouts;
use crate::store::MAX_UPLOAD_BYTES;

/// Images larger than this are refused without decoding. Uploads are capped
/// at 4MB, so anything far beyond that is not one of ours.
const MAX_FETCH_BYTES: usize = MAX_UPLOAD_BYTES * 4;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("image host not allowed: {0}")]
    HostNotAllowed(String),
    #[error("invalid image url: {0}")]
    InvalidUrl(String),
    #[error("image request failed: {0}")]
    Request(String),
    #[error("image host returned status {0}")]
    Status(u16),
    #[error("image is {0} bytes, over the fetch limit")]
    TooLarge(usize),
}

/// Fetches raw image bytes by URL.
#[async_trait::async_trait]
pub trait ImageSource: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the URL is refused or the transfer fails.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct HttpImageSource {
    http: reqwest::Client,
    allowed_hosts: Vec<String>,
}

impl HttpImageSource {
    /// # Errors
    ///
    /// Returns the builder error if the HTTP client cannot be constructed.
    pub fn new(allowed_hosts: Vec<String>, timeouts: HttpTimeouts) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()?;
        Ok(Self { http, allowed_hosts })
    }

    /// Check scheme and host before any request is made.
    fn check_url(&self, raw: &str) -> Result<reqwest::Url, FetchError> {
        let url = reqwest::Url::parse(raw).map_err(|e| FetchError::InvalidUrl(format!("{raw}: {e}")))?;
        if url.scheme() != "https" {
            return Err(FetchError::InvalidUrl(format!("{raw}: only https is fetched")));
        }
        let host = url
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl(raw.to_string()))?
            .to_ascii_lowercase();
        if !host_allowed(&host, &self.allowed_hosts) {
            return Err(FetchError::HostNotAllowed(host));
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.check_url(url)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        if let Some(len) = response.content_length() {
            let len = usize::try_from(len).unwrap_or(usize::MAX);
            if len > MAX_FETCH_BYTES {
                return Err(FetchError::TooLarge(len));
            }
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;
        if bytes.len() > MAX_FETCH_BYTES {
            return Err(FetchError::TooLarge(bytes.len()));
        }
        Ok(bytes.to_vec())
    }
}

/// Exact match or any subdomain of an allowed host.
fn host_allowed(host: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|a| {
        host == a
            || host
                .strip_suffix(a.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}
