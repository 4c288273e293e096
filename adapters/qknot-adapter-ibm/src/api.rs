//! IBM Quantum REST client.
//!
//! Two API generations are spoken:
//! - the IBM Cloud API (`quantum.cloud.ibm.com/api`), where the API key is
//!   exchanged at IAM for a bearer token and every request carries the
//!   `Service-CRN` header of the instance;
//! - the legacy API (`api.quantum-computing.ibm.com`), which takes the token
//!   directly and an optional hub/group/project on submission.
//!
//! Jobs are always submitted to the sampler primitive in V2 PUB format.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{IbmError, IbmResult};

/// IBM Cloud API endpoint.
pub const CLOUD_ENDPOINT: &str = "https://quantum.cloud.ibm.com/api";

/// Legacy IBM Quantum API endpoint.
pub const LEGACY_ENDPOINT: &str = "https://api.quantum-computing.ibm.com";

/// IBM Cloud IAM token endpoint.
const IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";

/// `IBM-API-Version` header value for the cloud API.
const IBM_API_VERSION: &str = "2026-02-01";

/// The default reqwest user agent is blocked upstream.
const USER_AGENT: &str = concat!("qknot/", env!("CARGO_PKG_VERSION"), " (knot-runtime)");

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which API the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiGeneration {
    /// IBM Cloud API; the instance is the service CRN sent on every request.
    Cloud,
    /// Legacy API with an optional hub/group/project instance.
    Legacy {
        /// Instance attached to submissions.
        instance: Option<String>,
    },
}

/// IBM Quantum API client.
pub struct IbmClient {
    client: Client,
    endpoint: String,
    generation: ApiGeneration,
}

impl fmt::Debug for IbmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IbmClient")
            .field("endpoint", &self.endpoint)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
}

fn bearer_headers(token: &str) -> IbmResult<header::HeaderMap> {
    let mut headers = header::HeaderMap::new();
    let mut auth = header::HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| IbmError::InvalidToken)?;
    auth.set_sensitive(true);
    headers.insert(header::AUTHORIZATION, auth);
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );
    Ok(headers)
}

fn build_client(headers: header::HeaderMap) -> IbmResult<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?)
}

impl IbmClient {
    /// Client for the legacy API. Does not touch the network.
    pub fn legacy(
        endpoint: impl Into<String>,
        token: &str,
        instance: Option<String>,
    ) -> IbmResult<Self> {
        Ok(Self {
            client: build_client(bearer_headers(token)?)?,
            endpoint: endpoint.into(),
            generation: ApiGeneration::Legacy { instance },
        })
    }

    /// Client for the cloud API. Exchanges `api_key` at IAM first.
    pub async fn cloud(
        endpoint: impl Into<String>,
        api_key: &str,
        service_crn: &str,
    ) -> IbmResult<Self> {
        let bearer = exchange_api_key(api_key).await?;

        let mut headers = bearer_headers(&bearer)?;
        headers.insert(
            header::HeaderName::from_static("service-crn"),
            header::HeaderValue::from_str(service_crn)
                .map_err(|_| IbmError::InvalidParameter("invalid Service-CRN value".into()))?,
        );
        headers.insert(
            header::HeaderName::from_static("ibm-api-version"),
            header::HeaderValue::from_static(IBM_API_VERSION),
        );

        Ok(Self {
            client: build_client(headers)?,
            endpoint: endpoint.into(),
            generation: ApiGeneration::Cloud,
        })
    }

    /// API generation in use.
    pub fn generation(&self) -> &ApiGeneration {
        &self.generation
    }

    /// Base endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.endpoint)
    }

    /// List backends with configuration and queue status.
    pub async fn list_backends(&self) -> IbmResult<Vec<BackendDescriptor>> {
        let response = send(self.client.get(self.url("backends")), || {
            IbmError::BackendUnavailable("backend listing".into())
        })
        .await?;

        match self.generation {
            ApiGeneration::Cloud => {
                let devices: DevicesResponse = response.json().await?;
                let mut backends = Vec::with_capacity(devices.devices.len());
                for device in devices.devices {
                    match self.get_backend(&device.name).await {
                        Ok(descriptor) => backends.push(descriptor),
                        Err(e) => warn!(backend = %device.name, error = %e, "skipping backend"),
                    }
                }
                Ok(backends)
            }
            ApiGeneration::Legacy { .. } => {
                let listing: LegacyBackendsResponse = response.json().await?;
                Ok(listing.backends.into_iter().map(Into::into).collect())
            }
        }
    }

    /// Fetch one backend.
    pub async fn get_backend(&self, name: &str) -> IbmResult<BackendDescriptor> {
        let unavailable = || IbmError::BackendUnavailable(name.to_string());

        if let ApiGeneration::Legacy { .. } = self.generation {
            let response = send(self.client.get(self.url(&format!("backends/{name}"))), unavailable).await?;
            let backend: LegacyBackend = response.json().await?;
            return Ok(backend.into());
        }

        let config: BackendConfigResponse = send(
            self.client
                .get(self.url(&format!("backends/{name}/configuration"))),
            unavailable,
        )
        .await?
        .json()
        .await?;

        // The configuration alone is enough to submit; status only adds queue data.
        let status = match send(
            self.client.get(self.url(&format!("backends/{name}/status"))),
            unavailable,
        )
        .await
        {
            Ok(response) => Some(response.json::<BackendStatusResponse>().await?),
            Err(e) => {
                debug!(backend = %name, error = %e, "backend status unavailable");
                None
            }
        };

        Ok(BackendDescriptor {
            name: config.backend_name,
            num_qubits: Some(config.n_qubits),
            pending_jobs: status
                .as_ref()
                .map(|s| u32::try_from(s.length_queue).unwrap_or(u32::MAX)),
            operational: status.as_ref().map(|s| s.state),
            simulator: Some(config.simulator.unwrap_or(false)),
        })
    }

    /// Submit one OpenQASM 3 circuit to the sampler.
    pub async fn submit_sampler(
        &self,
        backend: &str,
        qasm: String,
        shots: u32,
    ) -> IbmResult<SubmitResponse> {
        let hub = match &self.generation {
            ApiGeneration::Legacy { instance } => instance.clone(),
            ApiGeneration::Cloud => None,
        };
        let request = SamplerJobRequest {
            program_id: "sampler",
            backend,
            hub,
            params: SamplerParams {
                version: 2,
                pubs: vec![(qasm, BTreeMap::new(), shots)],
            },
        };

        let response = send(self.client.post(self.url("jobs")).json(&request), || {
            IbmError::BackendUnavailable(backend.to_string())
        })
        .await?;
        Ok(response.json().await?)
    }

    /// Current status of a job.
    pub async fn job_status(&self, job_id: &str) -> IbmResult<JobStatusResponse> {
        let response = send(self.client.get(self.url(&format!("jobs/{job_id}"))), || {
            IbmError::JobNotFound(job_id.to_string())
        })
        .await?;
        Ok(response.json().await?)
    }

    /// Results of a finished job.
    pub async fn job_results(&self, job_id: &str) -> IbmResult<JobResultResponse> {
        let response = send(
            self.client.get(self.url(&format!("jobs/{job_id}/results"))),
            || IbmError::JobNotFound(job_id.to_string()),
        )
        .await?;
        Ok(response.json().await?)
    }

    /// Request cancellation.
    pub async fn cancel_job(&self, job_id: &str) -> IbmResult<()> {
        send(
            self.client.post(self.url(&format!("jobs/{job_id}/cancel"))),
            || IbmError::JobNotFound(job_id.to_string()),
        )
        .await?;
        Ok(())
    }
}

async fn exchange_api_key(api_key: &str) -> IbmResult<String> {
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?;

    let response = client
        .post(IAM_TOKEN_URL)
        .form(&[
            ("grant_type", "urn:ibm:params:oauth:grant-type:apikey"),
            ("apikey", api_key),
        ])
        .send()
        .await
        .map_err(|e| IbmError::IamTokenExchange(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(IbmError::IamTokenExchange(format!("IAM returned {status}: {body}")));
    }

    let token: IamTokenResponse = response
        .json()
        .await
        .map_err(|e| IbmError::IamTokenExchange(format!("failed to parse IAM response: {e}")))?;
    Ok(token.access_token)
}

/// Send a request and turn non-success statuses into errors.
async fn send(
    request: RequestBuilder,
    not_found: impl FnOnce() -> IbmError,
) -> IbmResult<Response> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(not_found());
    }

    let body = response.text().await.unwrap_or_default();
    Err(IbmError::Api {
        status: Some(status.as_u16()),
        message: api_error_message(&body),
    })
}

/// Best-effort extraction of the API's error message.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .and_then(|e| {
            e.message
                .or_else(|| e.errors.into_iter().find_map(|inner| inner.message))
        })
        .unwrap_or_else(|| {
            if body.is_empty() {
                "no body".to_string()
            } else {
                body.to_string()
            }
        })
}

// ============================================================================
// Request types
// ============================================================================

/// One primitive unit of work: circuit, parameter values, shots.
type SamplerPub = (String, BTreeMap<String, f64>, u32);

#[derive(Debug, Serialize)]
struct SamplerJobRequest<'a> {
    program_id: &'static str,
    backend: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    hub: Option<String>,
    params: SamplerParams,
}

#[derive(Debug, Serialize)]
struct SamplerParams {
    version: u8,
    pubs: Vec<SamplerPub>,
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEntry {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DevicesResponse {
    devices: Vec<DeviceEntry>,
}

#[derive(Debug, Deserialize)]
struct DeviceEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct BackendConfigResponse {
    backend_name: String,
    n_qubits: u32,
    #[serde(default)]
    simulator: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct BackendStatusResponse {
    state: bool,
    #[serde(default)]
    length_queue: u64,
}

#[derive(Debug, Deserialize)]
struct LegacyBackendsResponse {
    backends: Vec<LegacyBackend>,
}

#[derive(Debug, Deserialize)]
struct LegacyBackend {
    name: String,
    #[serde(default)]
    num_qubits: Option<u32>,
    #[serde(default)]
    simulator: Option<bool>,
    #[serde(default)]
    status: Option<LegacyBackendStatus>,
}

#[derive(Debug, Deserialize)]
struct LegacyBackendStatus {
    operational: bool,
    #[serde(default)]
    pending_jobs: Option<u32>,
}

impl From<LegacyBackend> for BackendDescriptor {
    fn from(b: LegacyBackend) -> Self {
        Self {
            name: b.name,
            num_qubits: b.num_qubits,
            pending_jobs: b.status.as_ref().and_then(|s| s.pending_jobs),
            operational: b.status.as_ref().map(|s| s.operational),
            simulator: b.simulator,
        }
    }
}

/// Backend capabilities as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendDescriptor {
    pub name: String,
    pub num_qubits: Option<u32>,
    pub pending_jobs: Option<u32>,
    pub operational: Option<bool>,
    pub simulator: Option<bool>,
}

/// Job submission response.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    /// Job ID.
    pub id: String,
    /// Initial status, when reported.
    #[serde(default)]
    pub status: Option<String>,
}

/// Job status response.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusResponse {
    /// Job ID.
    pub id: String,
    /// Raw status; mixed case on the cloud API.
    pub status: String,
    /// Backend the job runs on.
    #[serde(default)]
    pub backend: Option<String>,
    /// Failure information (legacy API).
    #[serde(default)]
    pub error: Option<JobFailure>,
    /// State with failure reason (cloud API).
    #[serde(default)]
    pub state: Option<JobState>,
}

/// Failure information (legacy API).
#[derive(Debug, Clone, Deserialize)]
pub struct JobFailure {
    pub message: String,
}

/// Job state (cloud API).
#[derive(Debug, Clone, Deserialize)]
pub struct JobState {
    #[serde(default)]
    pub reason: Option<String>,
}

impl JobStatusResponse {
    /// Failure reason, preferring the cloud API's `state.reason`.
    pub fn error_message(&self) -> Option<String> {
        self.state
            .as_ref()
            .and_then(|s| s.reason.clone())
            .or_else(|| self.error.as_ref().map(|e| e.message.clone()))
    }
}

/// Job result response.
#[derive(Debug, Deserialize)]
pub struct JobResultResponse {
    /// One entry per submitted PUB.
    pub results: Vec<PubPayload>,
}

/// Result payload of one PUB.
#[derive(Debug, Deserialize)]
pub struct PubPayload {
    /// V2 sampler data: classical register name to raw samples.
    #[serde(default)]
    pub data: Option<BTreeMap<String, RegisterSamples>>,
    /// Pre-aggregated counts (V1 sampler).
    #[serde(default)]
    pub counts: Option<BTreeMap<String, u64>>,
}

/// Raw samples of one classical register.
#[derive(Debug, Deserialize)]
pub struct RegisterSamples {
    /// One hex string per shot, e.g. `"0x1"`.
    pub samples: Vec<String>,
    /// Register width, when reported.
    #[serde(default)]
    pub num_bits: Option<usize>,
}
