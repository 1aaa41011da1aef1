//! Job-related API endpoints

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tandem_core::domain::job::{ArtifactPayload, JobId, JobKind, JobSnapshot, ProofInput};
use tandem_core::dto::job::{CreateJobResponse, ProveRequest};
use tracing::{debug, info};

use crate::ProverClient;
use crate::error::{ClientError, Result};

/// Capability to submit jobs to the proving service and observe them
///
/// Implementations are stateless per call. A `Failed` job is reported as a
/// snapshot, not as an error; errors are reserved for transport and server
/// failures.
#[async_trait]
pub trait JobClient: Send + Sync {
    /// Uploads packaged circuit sources and starts a compile job
    ///
    /// # Returns
    /// The identifier the service assigned to the new compile job
    async fn submit_compile(&self, payload: ArtifactPayload) -> Result<JobId>;

    /// Starts a prove job against a compiled circuit
    ///
    /// # Arguments
    /// * `compile_id` - Identifier of a compile job that reached `Ready`
    /// * `input` - Circuit inputs
    async fn submit_prove(&self, compile_id: &JobId, input: &ProofInput) -> Result<JobId>;

    /// Fetches the current status of a job
    async fn get_detail(&self, kind: JobKind, id: &JobId) -> Result<JobSnapshot>;
}

#[async_trait]
impl JobClient for ProverClient {
    async fn submit_compile(&self, payload: ArtifactPayload) -> Result<JobId> {
        info!(
            "Uploading {} ({} bytes) for compilation",
            payload.file_name,
            payload.bytes.len()
        );

        let part = Part::bytes(payload.bytes).file_name(payload.file_name);
        let form = Form::new().part("files", part);

        let response = self
            .request(Method::POST, "circuit/create")
            .multipart(form)
            .send()
            .await?;

        let created: CreateJobResponse = self.handle_response(response).await?;
        created_id(created, JobKind::Compile)
    }

    async fn submit_prove(&self, compile_id: &JobId, input: &ProofInput) -> Result<JobId> {
        info!("Requesting proof for circuit {}", compile_id);

        let response = self
            .request(Method::POST, &format!("circuit/{}/prove", compile_id))
            .json(&ProveRequest {
                proof_input: input.as_str().to_string(),
            })
            .send()
            .await?;

        let created: CreateJobResponse = self.handle_response(response).await?;
        created_id(created, JobKind::Prove)
    }

    async fn get_detail(&self, kind: JobKind, id: &JobId) -> Result<JobSnapshot> {
        let mut request = self.request(
            Method::GET,
            &format!("{}/{}/detail", kind.resource(), id),
        );

        // The verification key is only needed once, on the proof detail.
        if kind == JobKind::Compile {
            request = request.query(&[("include_verification_key", "false")]);
        }

        let response = request.send().await?;
        let body: Value = self.handle_response(response).await?;
        let snapshot = JobSnapshot::try_from(body)
            .map_err(|e| ClientError::ParseError(format!("Unexpected job detail: {}", e)))?;

        debug!("{} job {} reported {:?}", kind, id, snapshot.status);

        Ok(snapshot)
    }
}

#[async_trait]
impl<T: JobClient + ?Sized> JobClient for Arc<T> {
    async fn submit_compile(&self, payload: ArtifactPayload) -> Result<JobId> {
        (**self).submit_compile(payload).await
    }

    async fn submit_prove(&self, compile_id: &JobId, input: &ProofInput) -> Result<JobId> {
        (**self).submit_prove(compile_id, input).await
    }

    async fn get_detail(&self, kind: JobKind, id: &JobId) -> Result<JobSnapshot> {
        (**self).get_detail(kind, id).await
    }
}

fn created_id(response: CreateJobResponse, kind: JobKind) -> Result<JobId> {
    response.job_id(kind).ok_or_else(|| {
        ClientError::ParseError(format!(
            "{} response did not include a {} id",
            kind,
            kind.resource()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;
    use serde_json::json;
    use tandem_core::domain::job::JobStatus;
    use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ProverClient {
        ProverClient::new(ClientConfig::new(server.uri(), "test-key")).unwrap()
    }

    #[tokio::test]
    async fn test_submit_compile_uploads_archive() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/circuit/create"))
            .and(header("authorization", "Bearer test-key"))
            .and(header_exists("content-type"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "circuit_id": "c-123",
                "status": "Queued",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let id = client_for(&server)
            .submit_compile(ArtifactPayload::new("circuit.tar.gz", vec![1, 2, 3]))
            .await
            .unwrap();

        assert_eq!(id, JobId::new("c-123"));
    }

    #[tokio::test]
    async fn test_submit_prove_threads_compile_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/circuit/c-123/prove"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_json(json!({ "proof_input": "{\"original\":\"rrkk\"}" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "proof_id": "p-456",
                "circuit_id": "c-123",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let input = ProofInput::from_json(&json!({ "original": "rrkk" }));
        let id = client_for(&server)
            .submit_prove(&JobId::new("c-123"), &input)
            .await
            .unwrap();

        assert_eq!(id, JobId::new("p-456"));
    }

    #[tokio::test]
    async fn test_circuit_detail_excludes_verification_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/circuit/c-123/detail"))
            .and(query_param("include_verification_key", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "circuit_id": "c-123",
                "status": "In Progress",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let snapshot = client_for(&server)
            .get_detail(JobKind::Compile, &JobId::new("c-123"))
            .await
            .unwrap();

        assert_eq!(snapshot.status, JobStatus::Pending);
    }

    #[tokio::test]
    async fn test_proof_detail_ready() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/proof/p-456/detail"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "proof_id": "p-456",
                "status": "Ready",
                "proof": { "proof": "AAEC" },
                "public": ["42"],
                "verification_key": { "verifying_key": "vk" },
            })))
            .mount(&server)
            .await;

        let snapshot = client_for(&server)
            .get_detail(JobKind::Prove, &JobId::new("p-456"))
            .await
            .unwrap();

        assert_eq!(snapshot.status, JobStatus::Ready);
        let result = snapshot.result.unwrap();
        assert_eq!(result["status"], "Ready");
        assert_eq!(result["proof_id"], "p-456");
        assert_eq!(result["public"], json!(["42"]));
    }

    #[tokio::test]
    async fn test_failed_job_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/proof/p-456/detail"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "Failed",
                "error": "invalid input",
            })))
            .mount(&server)
            .await;

        let snapshot = client_for(&server)
            .get_detail(JobKind::Prove, &JobId::new("p-456"))
            .await
            .unwrap();

        assert_eq!(snapshot.status, JobStatus::Failed);
        assert_eq!(snapshot.error.as_deref(), Some("invalid input"));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/circuit/c-123/detail"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_detail(JobKind::Compile, &JobId::new("c-123"))
            .await
            .unwrap_err();

        match err {
            ClientError::ApiError { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_id_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/circuit/create"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "status": "Queued" })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .submit_compile(ArtifactPayload::new("circuit.tar.gz", vec![0]))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::ParseError(_)));
    }
}
