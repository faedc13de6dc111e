//! Service configuration parsed from environment variables.

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_FILE_HOST_API_URL: &str = "https://api.uploadthing.com";
pub const DEFAULT_FILE_HOST_PUBLIC_URL: &str = "https://uploadthing.com/f";
pub const DEFAULT_ALLOWED_IMAGE_HOSTS: &str = "uploadthing.com,utfs.io";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },
    #[error("config parse failed: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

/// Connection settings for the external file host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHostConfig {
    pub api_key: String,
    /// REST API base, without trailing slash.
    pub api_url: String,
    /// Public download base; listed files resolve to `<public_url>/<key>`.
    pub public_url: String,
    pub timeouts: HttpTimeouts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub file_host: FileHostConfig,
    /// Hosts the compositor may fetch images from.
    pub allowed_image_hosts: Vec<String>,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `UPLOADTHING_SECRET`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `FILE_HOST_API_URL`: default `https://api.uploadthing.com`
    /// - `FILE_HOST_PUBLIC_URL`: default `https://uploadthing.com/f`
    /// - `ALLOWED_IMAGE_HOSTS`: comma-separated, default `uploadthing.com,utfs.io`
    /// - `FILE_HOST_REQUEST_TIMEOUT_SECS`: default 30
    /// - `FILE_HOST_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` when the secret is unset and `Parse` when
    /// `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Parse(format!("invalid PORT: {raw}")))?,
            Err(_) => DEFAULT_PORT,
        };
        let api_key = std::env::var("UPLOADTHING_SECRET")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey { var: "UPLOADTHING_SECRET".into() })?;

        let file_host = FileHostConfig {
            api_key,
            api_url: trim_base_url(
                &std::env::var("FILE_HOST_API_URL").unwrap_or_else(|_| DEFAULT_FILE_HOST_API_URL.to_string()),
            ),
            public_url: trim_base_url(
                &std::env::var("FILE_HOST_PUBLIC_URL").unwrap_or_else(|_| DEFAULT_FILE_HOST_PUBLIC_URL.to_string()),
            ),
            timeouts: HttpTimeouts {
                request_secs: env_parse("FILE_HOST_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
                connect_secs: env_parse("FILE_HOST_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
            },
        };
        let allowed_image_hosts = parse_host_list(
            &std::env::var("ALLOWED_IMAGE_HOSTS").unwrap_or_else(|_| DEFAULT_ALLOWED_IMAGE_HOSTS.to_string()),
        );

        Ok(Self { port, file_host, allowed_image_hosts })
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn trim_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn parse_host_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|h| h.trim().to_ascii_lowercase())
        .filter(|h| !h.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
