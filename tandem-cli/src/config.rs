//! Configuration module
//!
//! Handles CLI configuration: service connection settings and the polling
//! policy applied to every job.

use std::time::Duration;

use anyhow::{Context, Result};
use tandem_client::ClientConfig;
use tandem_core::domain::policy::JobPolicy;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the proving service API
    pub api_url: String,

    /// Bearer credential for the API
    pub api_key: String,

    /// Wait between two status checks
    pub poll_interval: Duration,

    /// Budget per job, from submission to terminal state
    pub max_wait: Duration,

    /// Per-request HTTP timeout
    pub request_timeout: Duration,
}

impl Config {
    /// Connection settings for the HTTP client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_url.clone(), self.api_key.clone())
            .with_request_timeout(self.request_timeout)
    }

    /// Polling policy shared by both stages
    pub fn policy(&self) -> Result<JobPolicy> {
        JobPolicy::new(self.poll_interval, self.max_wait).context("Invalid polling policy")
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        self.client_config()
            .validate()
            .context("Invalid API settings")?;
        self.policy()?;
        Ok(())
    }
}
