//! Workflow command handlers
//!
//! Handles the commands that submit jobs and wait on them: the full
//! compile-then-prove run and its two stages on their own.

use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::*;
use tandem_client::ProverClient;
use tandem_core::domain::job::JobId;
use tandem_core::domain::record::ProofRecord;
use tandem_runner::service::{JsonFileSink, packager_for};
use tandem_runner::{CompiledCircuit, Workflow};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::types::InputSource;

/// Compile, prove and persist
pub async fn run(
    client: ProverClient,
    config: &Config,
    cancel: CancellationToken,
    circuit: &Path,
    input: &str,
    output: PathBuf,
) -> Result<()> {
    let input = InputSource::parse(input).load()?;
    let sink = JsonFileSink::new(&output);
    let workflow = Workflow::with_cancellation(client, sink, config.policy()?, cancel);

    let packager = packager_for(circuit);
    let record = workflow.run(packager.as_ref(), &input).await?;

    print_record(&record, &output);

    Ok(())
}

/// Compile only
pub async fn compile(
    client: ProverClient,
    config: &Config,
    cancel: CancellationToken,
    circuit: &Path,
) -> Result<()> {
    let workflow = Workflow::compile_only(client, config.policy()?, cancel);

    let packager = packager_for(circuit);
    let compiled = workflow.compile(packager.as_ref()).await?;

    println!(
        "{} Circuit compiled in {:.1}s",
        "✓".green(),
        compiled.elapsed.as_secs_f64()
    );
    println!("  Circuit ID: {}", compiled.id.to_string().cyan());

    Ok(())
}

/// Prove an existing circuit and persist
pub async fn prove(
    client: ProverClient,
    config: &Config,
    cancel: CancellationToken,
    circuit_id: &str,
    input: &str,
    output: PathBuf,
) -> Result<()> {
    let input = InputSource::parse(input).load()?;
    let sink = JsonFileSink::new(&output);
    let workflow = Workflow::with_cancellation(client, sink, config.policy()?, cancel);

    let compiled = CompiledCircuit::existing(JobId::new(circuit_id));
    let record = workflow.prove(&compiled, &input).await?;

    print_record(&record, &output);

    Ok(())
}

/// Print the outcome of a successful proof
fn print_record(record: &ProofRecord, output: &Path) {
    println!("{} Proof ready", "✓".green());
    println!("  Circuit ID:  {}", record.compile_job_id.to_string().cyan());
    println!("  Proof ID:    {}", record.proof_job_id.to_string().cyan());
    println!(
        "  Compile:     {:.1}s",
        record.compile_elapsed_ms as f64 / 1000.0
    );
    println!(
        "  Prove:       {:.1}s",
        record.prove_elapsed_ms as f64 / 1000.0
    );
    println!("  Run:         {}", record.run_id.to_string().dimmed());
    println!("  Saved to:    {}", output.display());

    println!("\n{}", "Public Output:".bold());
    match serde_json::to_string_pretty(&record.public) {
        Ok(pretty) => println!("{}", pretty),
        Err(_) => println!("{:?}", record.public),
    }
}
