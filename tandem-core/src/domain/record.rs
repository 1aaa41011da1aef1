//! Proof record persisted at the end of a workflow

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::job::JobId;

/// A required field was absent (or empty) in the proof job's result
#[derive(Debug, Error, PartialEq, Eq)]
#[error("proof result is missing `{0}`")]
pub struct MissingField(pub &'static str);

/// Everything needed to verify a proof outside of Tandem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofRecord {
    pub run_id: Uuid,
    pub compile_job_id: JobId,
    pub proof_job_id: JobId,
    pub proof: Value,
    pub public: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_key: Option<Value>,
    pub compile_elapsed_ms: u64,
    pub prove_elapsed_ms: u64,
    pub completed_at: chrono::DateTime<chrono::Utc>,
    /// Raw proof detail body as returned by the service
    pub detail: Value,
}

impl ProofRecord {
    /// Builds a record from a Ready proof job's result payload
    ///
    /// `proof` and `public` must be present and non-empty.
    pub fn from_result(
        run_id: Uuid,
        compile_job_id: JobId,
        proof_job_id: JobId,
        result: Value,
        compile_elapsed: Duration,
        prove_elapsed: Duration,
    ) -> Result<Self, MissingField> {
        let proof = required(&result, "proof")?;
        let public = required(&result, "public")?;
        let verification_key = result
            .get("verification_key")
            .filter(|v| !is_empty(v))
            .cloned();

        Ok(Self {
            run_id,
            compile_job_id,
            proof_job_id,
            proof,
            public,
            verification_key,
            compile_elapsed_ms: compile_elapsed.as_millis() as u64,
            prove_elapsed_ms: prove_elapsed.as_millis() as u64,
            completed_at: chrono::Utc::now(),
            detail: result,
        })
    }
}

fn required(result: &Value, field: &'static str) -> Result<Value, MissingField> {
    match result.get(field) {
        Some(value) if !is_empty(value) => Ok(value.clone()),
        _ => Err(MissingField(field)),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
