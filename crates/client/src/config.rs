//! Client configuration.

use std::time::Duration;

/// Connection settings for the console backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST backend, without a trailing slash.
    pub base_url: String,
    /// Timeout for business requests. Generous: large CSV/Excel exports
    /// can legitimately run for many minutes.
    pub request_timeout: Duration,
    /// Timeout for auth requests (login/refresh/logout). These gate UI
    /// responsiveness, so they stay short.
    pub auth_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            request_timeout: Duration::from_secs(20 * 60),
            auth_timeout: Duration::from_secs(10),
        }
    }

    /// Read the backend URL from `EVENTDESK_API_URL`, falling back to a
    /// local development default.
    pub fn from_env() -> Self {
        let base_url = std::env::var("EVENTDESK_API_URL").unwrap_or_else(|_| {
            tracing::warn!("EVENTDESK_API_URL not set; using local dev default");
            "http://127.0.0.1:8080".to_string()
        });
        Self::new(base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped() {
        let config = ClientConfig::new("https://api.example.test/");
        assert_eq!(config.base_url, "https://api.example.test");
    }

    #[test]
    fn timeouts_default_sensibly() {
        let config = ClientConfig::new("http://localhost");
        assert!(config.request_timeout > config.auth_timeout);
        assert_eq!(config.auth_timeout, Duration::from_secs(10));
    }
}
