//! Error types for the workflow

use std::time::Duration;

use tandem_client::ClientError;
use tandem_core::domain::job::{JobId, JobKind};
use thiserror::Error;

use crate::service::SinkError;

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Reasons a workflow stops before its proof record is persisted
///
/// Every stage-bearing variant names the stage and the wall-clock time spent
/// on it before the failure.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Submission or status query failed at the transport/server level
    #[error(
        "{stage} stage: request to the proving service failed after {:.1} seconds: {source}",
        .elapsed.as_secs_f64()
    )]
    Transport {
        stage: JobKind,
        elapsed: Duration,
        #[source]
        source: ClientError,
    },

    /// The service reported the job as failed
    #[error("{stage} job {job_id} failed after {:.1} seconds: {detail}", .elapsed.as_secs_f64())]
    JobFailed {
        stage: JobKind,
        job_id: JobId,
        elapsed: Duration,
        detail: String,
    },

    /// The job was still pending when the budget ran out
    #[error("{stage} job {job_id} timed out after {:.1} seconds", .elapsed.as_secs_f64())]
    TimedOut {
        stage: JobKind,
        job_id: JobId,
        elapsed: Duration,
    },

    /// Polling was cancelled by the caller
    #[error("{stage} job {job_id} cancelled after {:.1} seconds", .elapsed.as_secs_f64())]
    Cancelled {
        stage: JobKind,
        job_id: JobId,
        elapsed: Duration,
    },

    /// A ready job did not carry the expected output
    #[error(
        "{stage} job {job_id} returned an unusable result after {:.1} seconds: {reason}",
        .elapsed.as_secs_f64()
    )]
    MalformedResult {
        stage: JobKind,
        job_id: JobId,
        elapsed: Duration,
        reason: String,
    },

    /// The circuit sources could not be packaged
    #[error("failed to package circuit: {0}")]
    Packaging(#[source] std::io::Error),

    /// The proof record could not be written
    #[error("failed to persist proof record: {0}")]
    Sink(#[from] SinkError),
}

impl WorkflowError {
    /// Stage the error belongs to, if any
    pub fn stage(&self) -> Option<JobKind> {
        match self {
            WorkflowError::Transport { stage, .. }
            | WorkflowError::JobFailed { stage, .. }
            | WorkflowError::TimedOut { stage, .. }
            | WorkflowError::Cancelled { stage, .. }
            | WorkflowError::MalformedResult { stage, .. } => Some(*stage),
            WorkflowError::Packaging(_) | WorkflowError::Sink(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_stage_and_elapsed() {
        let err = WorkflowError::TimedOut {
            stage: JobKind::Compile,
            job_id: JobId::new("c-1"),
            elapsed: Duration::from_millis(5_040),
        };
        assert_eq!(err.to_string(), "compile job c-1 timed out after 5.0 seconds");

        let err = WorkflowError::JobFailed {
            stage: JobKind::Prove,
            job_id: JobId::new("p-1"),
            elapsed: Duration::from_millis(1_300),
            detail: "invalid input".into(),
        };
        assert_eq!(
            err.to_string(),
            "prove job p-1 failed after 1.3 seconds: invalid input"
        );
        assert_eq!(err.stage(), Some(JobKind::Prove));
    }

    #[test]
    fn test_transport_error_keeps_source() {
        let err = WorkflowError::Transport {
            stage: JobKind::Prove,
            elapsed: Duration::from_millis(4_200),
            source: ClientError::api_error(500, "oops"),
        };
        let message = err.to_string();
        assert!(message.starts_with("prove stage:"));
        assert!(message.contains("after 4.2 seconds"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_malformed_result_names_elapsed() {
        let err = WorkflowError::MalformedResult {
            stage: JobKind::Prove,
            job_id: JobId::new("p-1"),
            elapsed: Duration::from_secs(2),
            reason: "proof result is missing `public`".into(),
        };
        assert_eq!(
            err.to_string(),
            "prove job p-1 returned an unusable result after 2.0 seconds: proof result is missing `public`"
        );
    }
}
