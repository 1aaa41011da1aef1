//! Job DTOs exchanged with the remote proving service

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::job::{JobId, JobKind, JobSnapshot, JobStatus};

/// Response to a job submission
///
/// The service names the id after the resource (`circuit_id`, `proof_id`);
/// a bare `id` is accepted as well. Prove responses carry both the proof id
/// and the parent circuit id, so the fields are kept apart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateJobResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<JobId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_id: Option<JobId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_id: Option<JobId>,
}

impl CreateJobResponse {
    /// Picks the identifier of the job that was just created
    pub fn job_id(self, kind: JobKind) -> Option<JobId> {
        match kind {
            JobKind::Compile => self.circuit_id.or(self.id),
            JobKind::Prove => self.proof_id.or(self.id),
        }
    }
}

/// Body of a prove request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProveRequest {
    /// Circuit inputs, as a serialized JSON document
    pub proof_input: String,
}

/// Status fields of a `/{resource}/{id}/detail` response
///
/// The rest of the body (proof, public output, verification key, ...) is
/// opaque and kept as returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetail {
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TryFrom<Value> for JobSnapshot {
    type Error = serde_json::Error;

    /// Reads the status out of a raw detail body; a Ready job keeps the whole
    /// body, status included, as its result
    fn try_from(body: Value) -> Result<Self, Self::Error> {
        let detail = JobDetail::deserialize(&body)?;

        Ok(match detail.status {
            JobStatus::Ready => JobSnapshot::ready(body),
            JobStatus::Failed => JobSnapshot::failed(
                detail
                    .error
                    .unwrap_or_else(|| "no error detail provided".to_string()),
            ),
            JobStatus::Pending => JobSnapshot::pending(),
        })
    }
}
