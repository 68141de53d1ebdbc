//! Cache connection settings.

use std::time::Duration;

use url::Url;

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 2_000;

/// Endpoint, credentials, and timeout for the remote cache.
#[derive(Clone)]
pub struct CacheConfig {
    /// Base URL of the REST endpoint.
    pub url: Option<String>,
    /// Bearer token sent with every command.
    pub token: Option<String>,
    /// Per-request timeout enforced by the HTTP client.
    pub request_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

impl std::fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheConfig")
            .field("url", &self.redacted_url())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            url: settings.url.clone(),
            token: settings.token.clone(),
            request_timeout: settings.request_timeout,
        }
    }
}

impl CacheConfig {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            token: Some(token.into()),
            ..Default::default()
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Endpoint with any userinfo stripped, suitable for logs.
    ///
    /// `None` when no URL is configured or it does not parse.
    pub fn redacted_url(&self) -> Option<String> {
        let mut url = Url::parse(self.url.as_deref()?).ok()?;
        if !url.username().is_empty() || url.password().is_some() {
            url.set_username("").ok()?;
            url.set_password(None).ok()?;
        }
        Some(url.to_string())
    }
}
