//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod status;
mod workflow;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use tandem_client::{ClientConfig, ProverClient};
use tokio_util::sync::CancellationToken;

use crate::config::Config;

/// Default location of the proof record
pub const DEFAULT_OUTPUT: &str = "proof-detail-response.json";

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compile a circuit, prove it and save the proof record
    Run {
        /// Circuit directory (archived before upload) or pre-built .tar.gz
        #[arg(long)]
        circuit: PathBuf,

        /// Proof input as JSON, or @path to a JSON file
        #[arg(long)]
        input: String,

        /// Where to write the proof record
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Compile a circuit and print its ID once ready
    Compile {
        /// Circuit directory (archived before upload) or pre-built .tar.gz
        #[arg(long)]
        circuit: PathBuf,
    },
    /// Prove an already compiled circuit and save the proof record
    Prove {
        /// ID of a compiled circuit
        circuit_id: String,

        /// Proof input as JSON, or @path to a JSON file
        #[arg(long)]
        input: String,

        /// Where to write the proof record
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Show the current status of a circuit or proof
    Status {
        /// Job kind: circuit (compile) or proof (prove)
        kind: String,

        /// Job ID
        id: String,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
/// * `cancel` - Stops in-flight polling when cancelled
pub async fn handle_command(
    command: Commands,
    config: &Config,
    cancel: CancellationToken,
) -> Result<()> {
    let client = build_client(config.client_config())?;

    match command {
        Commands::Run {
            circuit,
            input,
            output,
        } => workflow::run(client, config, cancel, &circuit, &input, output).await,
        Commands::Compile { circuit } => workflow::compile(client, config, cancel, &circuit).await,
        Commands::Prove {
            circuit_id,
            input,
            output,
        } => workflow::prove(client, config, cancel, &circuit_id, &input, output).await,
        Commands::Status { kind, id } => status::show(&client, &kind, &id).await,
    }
}

fn build_client(config: ClientConfig) -> Result<ProverClient> {
    ProverClient::new(config).context("Failed to create proving service client")
}
