//! Client configuration
//!
//! Connection settings are an explicit value handed to the client at
//! construction time; nothing is configured process-wide.

use std::fmt;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Base URL of the public proving service (API v1)
pub const DEFAULT_BASE_URL: &str = "https://sindri.app/api/v1";

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable connection settings for [`crate::ProverClient`]
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    api_key: String,
    request_timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration for the given service URL and API key
    ///
    /// A trailing slash on the URL is dropped.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Overrides the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ClientError::InvalidConfig("API key cannot be empty".into()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::InvalidConfig(
                "base URL must start with http:// or https://".into(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(ClientError::InvalidConfig(
                "request timeout must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

// The API key never ends up in logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_trailing_slash() {
        let config = ClientConfig::new("https://sindri.app/api/v1/", "key");
        assert_eq!(config.base_url(), "https://sindri.app/api/v1");
        assert_eq!(config.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn test_config_validation() {
        assert!(ClientConfig::new(DEFAULT_BASE_URL, "key").validate().is_ok());

        assert!(ClientConfig::new(DEFAULT_BASE_URL, "  ").validate().is_err());
        assert!(ClientConfig::new("sindri.app", "key").validate().is_err());
        assert!(
            ClientConfig::new(DEFAULT_BASE_URL, "key")
                .with_request_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::new(DEFAULT_BASE_URL, "super-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
