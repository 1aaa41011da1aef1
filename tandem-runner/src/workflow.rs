//! Compile-then-prove workflow
//!
//! Drives the two dependent remote jobs in strict sequence:
//! 1. package and upload the circuit, wait for the compile job
//! 2. request a proof against the compiled circuit, wait for the proof job
//! 3. hand the proof record to the sink
//!
//! Any failure aborts the run; nothing is retried here.

use std::time::Duration;

use serde_json::Value;
use tandem_client::JobClient;
use tandem_core::domain::job::{JobId, JobKind, ProofInput};
use tandem_core::domain::policy::JobPolicy;
use tandem_core::domain::record::ProofRecord;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::error::{Result, WorkflowError};
use crate::scheduler::{JobPoller, PollOutcome};
use crate::service::{ArtifactSink, Packager};

/// A compile job that reached `Ready`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledCircuit {
    pub id: JobId,
    /// Time spent waiting for the compile job (zero when resumed from an id)
    pub elapsed: Duration,
}

impl CompiledCircuit {
    /// Refers to a circuit compiled by an earlier invocation
    pub fn existing(id: JobId) -> Self {
        Self {
            id,
            elapsed: Duration::ZERO,
        }
    }
}

/// Orchestrates the compile and prove stages for one input
///
/// The sink is only needed by the prove stage; a compile-only workflow uses
/// `()` in its place.
pub struct Workflow<C, S> {
    client: C,
    sink: S,
    poller: JobPoller,
}

impl<C: JobClient> Workflow<C, ()> {
    /// Creates a workflow that can compile circuits but not persist proofs
    pub fn compile_only(client: C, policy: JobPolicy, cancel: CancellationToken) -> Self {
        Self::with_cancellation(client, (), policy, cancel)
    }
}

impl<C: JobClient, S> Workflow<C, S> {
    /// Creates a workflow that can only be stopped by its time budget
    pub fn new(client: C, sink: S, policy: JobPolicy) -> Self {
        Self::with_cancellation(client, sink, policy, CancellationToken::new())
    }

    /// Creates a workflow whose polling also stops when `cancel` fires
    pub fn with_cancellation(
        client: C,
        sink: S,
        policy: JobPolicy,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            sink,
            poller: JobPoller::new(policy, cancel),
        }
    }

    /// Uploads the circuit and waits for it to compile
    pub async fn compile(&self, packager: &dyn Packager) -> Result<CompiledCircuit> {
        let payload = packager.package().await.map_err(WorkflowError::Packaging)?;

        let submitted = Instant::now();
        let id = self
            .client
            .submit_compile(payload)
            .await
            .map_err(|source| WorkflowError::Transport {
                stage: JobKind::Compile,
                elapsed: submitted.elapsed(),
                source,
            })?;
        info!("Circuit ID: {}", id);

        let (_, elapsed) = self.await_job(JobKind::Compile, &id).await?;

        Ok(CompiledCircuit { id, elapsed })
    }

    /// Polls one job to completion, mapping every non-ready outcome to an error
    async fn await_job(&self, stage: JobKind, id: &JobId) -> Result<(Value, Duration)> {
        let span = info_span!("await_job", stage = %stage, job_id = %id);

        let outcome = self
            .poller
            .poll(|| self.client.get_detail(stage, id))
            .instrument(span)
            .await
            .map_err(|err| {
                warn!(
                    "Status query for {} job {} failed on poll {}",
                    stage, id, err.attempts
                );
                WorkflowError::Transport {
                    stage,
                    elapsed: err.elapsed,
                    source: err.source,
                }
            })?;

        let attempts = outcome.attempts();
        match outcome {
            PollOutcome::Ready { result, elapsed, .. } => {
                info!(
                    "{} job {} ready after {:.1} seconds ({} polls)",
                    stage,
                    id,
                    elapsed.as_secs_f64(),
                    attempts
                );
                Ok((result, elapsed))
            }
            PollOutcome::Failed {
                detail, elapsed, ..
            } => {
                warn!("{} job {} failed: {}", stage, id, detail);
                Err(WorkflowError::JobFailed {
                    stage,
                    job_id: id.clone(),
                    elapsed,
                    detail,
                })
            }
            PollOutcome::TimedOut { elapsed, .. } => {
                warn!("{} job {} still pending after {} polls", stage, id, attempts);
                Err(WorkflowError::TimedOut {
                    stage,
                    job_id: id.clone(),
                    elapsed,
                })
            }
            PollOutcome::Cancelled { elapsed, .. } => {
                warn!("Stopped waiting on {} job {}", stage, id);
                Err(WorkflowError::Cancelled {
                    stage,
                    job_id: id.clone(),
                    elapsed,
                })
            }
        }
    }
}

impl<C: JobClient, S: ArtifactSink> Workflow<C, S> {
    /// Runs both stages and persists the proof record
    pub async fn run(&self, packager: &dyn Packager, input: &ProofInput) -> Result<ProofRecord> {
        let compiled = self.compile(packager).await?;
        self.prove(&compiled, input).await
    }

    /// Requests a proof for a compiled circuit, waits for it and persists it
    pub async fn prove(&self, compiled: &CompiledCircuit, input: &ProofInput) -> Result<ProofRecord> {
        let submitted = Instant::now();
        let proof_id = self
            .client
            .submit_prove(&compiled.id, input)
            .await
            .map_err(|source| WorkflowError::Transport {
                stage: JobKind::Prove,
                elapsed: submitted.elapsed(),
                source,
            })?;
        info!("Proof ID: {}", proof_id);

        let (result, elapsed) = self.await_job(JobKind::Prove, &proof_id).await?;

        let record = ProofRecord::from_result(
            Uuid::new_v4(),
            compiled.id.clone(),
            proof_id.clone(),
            result,
            compiled.elapsed,
            elapsed,
        )
        .map_err(|missing| WorkflowError::MalformedResult {
            stage: JobKind::Prove,
            job_id: proof_id,
            elapsed,
            reason: missing.to_string(),
        })?;

        self.sink.persist(&record).await?;

        Ok(record)
    }
}
