//! Client configuration.

use std::time::Duration;

const DEFAULT_API_URL: &str = "https://api.twitter.com";
const DEFAULT_UPLOAD_URL: &str = "https://upload.twitter.com";

/// Application-level settings for talking to Twitter.
///
/// Per-user credentials are not part of the configuration; they are passed
/// to each call so a single client serves every browser session.
#[derive(Debug, Clone)]
pub struct TwitterConfig {
    /// Consumer key (API key)
    pub consumer_key: String,
    /// Consumer secret (API secret)
    pub consumer_secret: String,
    /// Base URL for OAuth and REST endpoints
    pub api_url: String,
    /// Base URL for the media upload endpoint
    pub upload_url: String,
    pub timeout: Duration,
    /// Size of each APPEND segment during chunked media upload
    pub media_chunk_size: usize,
    /// Maximum STATUS polls while the provider processes uploaded media
    pub media_poll_limit: u32,
}

impl TwitterConfig {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            consumer_key: String::new(),
            consumer_secret: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            timeout: Duration::from_secs(30),
            media_chunk_size: 1024 * 1024,
            media_poll_limit: 20,
        }
    }
}
