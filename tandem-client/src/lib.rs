//! Tandem HTTP Client
//!
//! A small, type-safe client for the remote proving service. It submits
//! compile and prove jobs and fetches their current status; it never waits on
//! a job itself (that is the runner's poller's job).
//!
//! # Example
//!
//! ```no_run
//! use tandem_client::{ClientConfig, JobClient, ProverClient};
//! use tandem_core::domain::job::{JobId, JobKind};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::new("https://sindri.app/api/v1", "my-api-key");
//!     let client = ProverClient::new(config)?;
//!
//!     let snapshot = client
//!         .get_detail(JobKind::Compile, &JobId::new("my-circuit-id"))
//!         .await?;
//!
//!     println!("Circuit status: {:?}", snapshot.status);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
mod jobs;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use jobs::JobClient;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

/// HTTP client for the proving service API
///
/// Every request carries the configured bearer credential. The client holds
/// no per-job state, so one instance can serve any number of workflows.
#[derive(Debug, Clone)]
pub struct ProverClient {
    config: ClientConfig,
    client: Client,
}

impl ProverClient {
    /// Create a new client from an explicit configuration
    ///
    /// Fails if the configuration is invalid or the HTTP client cannot be built.
    ///
    /// # Example
    /// ```
    /// use tandem_client::{ClientConfig, ProverClient};
    ///
    /// let client = ProverClient::new(ClientConfig::new("http://localhost:8080", "key")).unwrap();
    /// assert_eq!(client.base_url(), "http://localhost:8080");
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self { config, client })
    }

    /// Create a new client around a pre-configured reqwest client
    ///
    /// This allows custom proxies, TLS settings, etc. The per-request timeout
    /// of `config` is not applied in that case.
    pub fn with_client(config: ClientConfig, client: Client) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, client })
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Start an authorized request against `path` (relative to the base URL)
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.config.base_url(), path.trim_start_matches('/'));
        self.client
            .request(method, url)
            .bearer_auth(self.config.api_key())
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Any non-2xx status is turned into [`ClientError::ApiError`] carrying the
    /// response body.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
