//! Tandem CLI
//!
//! Command-line driver for the compile-then-prove workflow against a remote
//! proving service.

mod commands;
mod config;
mod types;

use std::future::Future;
use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tandem_client::config::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
use tandem_core::domain::policy::{DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL};
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tandem")]
#[command(about = "Compile circuits and generate proofs on a remote proving service", long_about = None)]
struct Cli {
    /// Proving service API URL
    #[arg(long, env = "TANDEM_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// API key sent as a bearer token
    #[arg(long, env = "TANDEM_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Seconds between two status checks
    #[arg(long, env = "TANDEM_POLL_INTERVAL", default_value_t = DEFAULT_POLL_INTERVAL.as_secs())]
    poll_interval: u64,

    /// Seconds to wait for each job before giving up
    #[arg(long, env = "TANDEM_MAX_WAIT", default_value_t = DEFAULT_MAX_WAIT.as_secs())]
    max_wait: u64,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "TANDEM_REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    request_timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tandem=info,tandem_runner=info,tandem_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        api_url: cli.api_url,
        api_key: cli.api_key,
        poll_interval: Duration::from_secs(cli.poll_interval),
        max_wait: Duration::from_secs(cli.max_wait),
        request_timeout: Duration::from_secs(cli.request_timeout),
    };
    config.validate()?;

    // First Ctrl-C stops in-flight polling, a second one exits right away
    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if watch_interrupts(tokio::signal::ctrl_c, shutdown).await {
            std::process::exit(130);
        }
    });

    handle_command(cli.command, &config, cancel).await
}

/// Cancels `cancel` on the first interrupt
///
/// Returns `true` once a second interrupt arrives, `false` if the signal
/// stream fails before that.
async fn watch_interrupts<F, Fut>(mut interrupt: F, cancel: CancellationToken) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    if interrupt().await.is_err() {
        return false;
    }
    warn!("Interrupt received, stopping (press Ctrl-C again to exit now)");
    cancel.cancel();

    if interrupt().await.is_err() {
        return false;
    }
    warn!("Second interrupt received, exiting");
    true
}
