//! Job domain types

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identifier assigned by the remote service when a job is submitted
///
/// Opaque to Tandem: it is only ever echoed back to the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Category of remote job
///
/// Determines the endpoint family a job lives under and the stage name used
/// in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Compile,
    Prove,
}

impl JobKind {
    /// Stage name shown to users ("compile" / "prove")
    pub fn stage(&self) -> &'static str {
        match self {
            JobKind::Compile => "compile",
            JobKind::Prove => "prove",
        }
    }

    /// Path segment of the remote resource backing this kind of job
    pub fn resource(&self) -> &'static str {
        match self {
            JobKind::Compile => "circuit",
            JobKind::Prove => "proof",
        }
    }

    /// Parses either a stage name or a resource name
    pub fn parse(input: &str) -> Option<Self> {
        match input.to_ascii_lowercase().as_str() {
            "compile" | "circuit" => Some(JobKind::Compile),
            "prove" | "proof" => Some(JobKind::Prove),
            _ => None,
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stage())
    }
}

/// Remote job status
///
/// The service reports several in-flight states ("Queued", "In Progress", ...);
/// every status other than `Ready` and `Failed` is treated as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Ready,
    Failed,
    #[serde(other)]
    Pending,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

/// Point-in-time observation of a remote job
///
/// `result` is only populated for `Ready` snapshots and `error` only for
/// `Failed` ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub status: JobStatus,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl JobSnapshot {
    pub fn pending() -> Self {
        Self {
            status: JobStatus::Pending,
            result: None,
            error: None,
        }
    }

    pub fn ready(result: serde_json::Value) -> Self {
        Self {
            status: JobStatus::Ready,
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// One poll tick, as observed by the poller
///
/// Transient: emitted to the log, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct PollAttempt {
    pub attempt: u32,
    pub at: chrono::DateTime<chrono::Utc>,
    pub status: JobStatus,
    pub elapsed: Duration,
}

/// Input handed to the prove stage
///
/// The remote service expects the circuit inputs as a JSON document encoded in
/// a string field, so the document is kept in its serialized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofInput(String);

impl ProofInput {
    /// Wraps an already-serialized JSON document
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn from_json(value: &serde_json::Value) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Packaged circuit sources submitted to the compile stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPayload {
    /// File name announced in the multipart upload (e.g. `circuit.tar.gz`)
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ArtifactPayload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}
