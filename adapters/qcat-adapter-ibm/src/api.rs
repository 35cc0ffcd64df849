//! IBM Quantum Platform REST client.
//!
//! Two authentication flows are supported:
//! - Cloud: an IBM Cloud API key exchanged for an IAM bearer token, plus the
//!   service CRN sent on every request (`quantum.cloud.ibm.com/api`)
//! - Legacy: a direct bearer token with an optional hub/group/project
//!   instance (`api.quantum-computing.ibm.com`)
//!
//! Jobs go through the Sampler primitive with OpenQASM 3 circuits.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use qcat_hal::JobStatus;
use reqwest::{Client, header};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::{IbmError, IbmResult};

/// IBM Quantum Cloud API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://quantum.cloud.ibm.com/api";

/// Legacy IBM Quantum API endpoint.
pub const LEGACY_ENDPOINT: &str = "https://api.quantum-computing.ibm.com";

const IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";

const IBM_API_VERSION: &str = "2026-02-01";

/// Cloudflare in front of the API rejects the default reqwest agent.
const USER_AGENT: &str = concat!("qcat/", env!("CARGO_PKG_VERSION"), " (quantum-sdk)");

/// IBM Quantum API client.
pub struct IbmClient {
    client: Client,
    endpoint: String,
    instance: Option<String>,
    cloud_api: bool,
}

impl fmt::Debug for IbmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IbmClient")
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .field("instance", &self.instance)
            .field("cloud_api", &self.cloud_api)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
}

fn json_headers(bearer: &str) -> IbmResult<header::HeaderMap> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {bearer}"))
            .map_err(|_| IbmError::InvalidToken)?,
    );
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

fn http_client(headers: header::HeaderMap) -> IbmResult<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .build()?)
}

impl IbmClient {
    /// Client for the legacy endpoint with a direct bearer token.
    pub fn new(endpoint: impl Into<String>, token: &str) -> IbmResult<Self> {
        Ok(Self {
            client: http_client(json_headers(token)?)?,
            endpoint: endpoint.into(),
            instance: None,
            cloud_api: false,
        })
    }

    /// Client for the Cloud API, exchanging `api_key` for an IAM token.
    #[instrument(skip(api_key))]
    pub async fn connect(api_key: &str, service_crn: &str) -> IbmResult<Self> {
        let iam_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let response = iam_client
            .post(IAM_TOKEN_URL)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(format!(
                "grant_type=urn:ibm:params:oauth:grant-type:apikey&apikey={api_key}"
            ))
            .send()
            .await
            .map_err(|e| IbmError::IamTokenExchange(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "no body".into());
            return Err(IbmError::IamTokenExchange(format!(
                "IAM returned {status}: {body}"
            )));
        }

        let token: IamTokenResponse = response
            .json()
            .await
            .map_err(|e| IbmError::IamTokenExchange(format!("unreadable IAM response: {e}")))?;

        let mut headers = json_headers(&token.access_token)?;
        headers.insert(
            header::HeaderName::from_static("service-crn"),
            header::HeaderValue::from_str(service_crn)
                .map_err(|_| IbmError::InvalidParameter("invalid service CRN".into()))?,
        );
        headers.insert(
            header::HeaderName::from_static("ibm-api-version"),
            header::HeaderValue::from_static(IBM_API_VERSION),
        );
        debug!("IAM token exchange succeeded");

        Ok(Self {
            client: http_client(headers)?,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            instance: None,
            cloud_api: true,
        })
    }

    /// Set the hub/group/project instance used by legacy submissions.
    #[must_use]
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Whether this client talks to the Cloud API.
    pub fn is_cloud_api(&self) -> bool {
        self.cloud_api
    }

    async fn api_error(response: reqwest::Response, context: &str) -> IbmError {
        let body = response.text().await.unwrap_or_else(|_| "no body".into());
        match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(err) if !err.message.is_empty() => IbmError::ApiError {
                code: err.code,
                message: format!("{context}: {}", err.message),
            },
            _ => IbmError::ApiError {
                code: None,
                message: format!("{context}: {body}"),
            },
        }
    }

    /// All backends visible to this account.
    pub async fn list_backends(&self) -> IbmResult<Vec<BackendInfo>> {
        let url = format!("{}/v1/backends", self.endpoint);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response, "list backends failed").await);
        }

        if !self.cloud_api {
            let listing: LegacyBackendsResponse = response.json().await?;
            return Ok(listing.backends);
        }

        let listing: DevicesResponse = response.json().await?;
        let mut backends = Vec::with_capacity(listing.devices.len());
        for device in &listing.devices {
            match self.get_backend(&device.name).await {
                Ok(info) => backends.push(info),
                Err(e) => warn!("skipping backend {}: {e}", device.name),
            }
        }
        Ok(backends)
    }

    /// Details for one backend.
    pub async fn get_backend(&self, name: &str) -> IbmResult<BackendInfo> {
        if !self.cloud_api {
            let url = format!("{}/v1/backends/{name}", self.endpoint);
            let response = self.client.get(&url).send().await?;
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Err(IbmError::BackendUnavailable(name.to_string()));
            }
            if !response.status().is_success() {
                return Err(Self::api_error(response, "get backend failed").await);
            }
            return Ok(response.json().await?);
        }

        let config_url = format!("{}/v1/backends/{name}/configuration", self.endpoint);
        let response = self.client.get(&config_url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(IbmError::BackendUnavailable(name.to_string()));
        }
        if !response.status().is_success() {
            let context = format!("backend configuration failed for {name}");
            return Err(Self::api_error(response, &context).await);
        }
        let config: BackendConfigResponse = response.json().await?;

        let status_url = format!("{}/v1/backends/{name}/status", self.endpoint);
        let response = self.client.get(&status_url).send().await?;
        let status = if response.status().is_success() {
            let s: BackendStatusResponse = response.json().await?;
            BackendStatus {
                operational: s.state,
                status_msg: Some(s.status),
                pending_jobs: Some(u32::try_from(s.length_queue).unwrap_or(u32::MAX)),
            }
        } else {
            BackendStatus {
                operational: true,
                status_msg: None,
                pending_jobs: None,
            }
        };

        Ok(BackendInfo {
            name: config.backend_name,
            num_qubits: config.n_qubits,
            status,
            simulator: config.simulator.unwrap_or(false),
        })
    }

    /// The least-busy operational hardware device with `min_qubits` qubits.
    #[instrument(skip(self))]
    pub async fn least_busy_backend(&self, min_qubits: usize) -> IbmResult<String> {
        let backends = self.list_backends().await?;
        let chosen = least_busy(&backends, min_qubits)
            .ok_or(IbmError::NoSuitableBackend {
                required: min_qubits,
            })?;
        debug!(
            "Selected {} ({} pending jobs)",
            chosen.name,
            chosen.status.pending_jobs.unwrap_or(0)
        );
        Ok(chosen.name.clone())
    }

    /// Submit OpenQASM 3 `circuits` to the Sampler primitive.
    #[instrument(skip(self, circuits))]
    pub async fn submit_sampler_job(
        &self,
        backend: &str,
        circuits: Vec<String>,
        shots: u32,
    ) -> IbmResult<SubmitResponse> {
        let url = format!("{}/v1/jobs", self.endpoint);
        let body = sampler_request(backend, circuits, shots, self.cloud_api, self.instance.as_deref());

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response, "job submission failed").await);
        }
        Ok(response.json().await?)
    }

    /// Current state of a job.
    pub async fn get_job_status(&self, job_id: &str) -> IbmResult<JobStatusResponse> {
        let url = format!("{}/v1/jobs/{job_id}", self.endpoint);
        let response = self.client.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(IbmError::JobNotFound(job_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(Self::api_error(response, "job status failed").await);
        }
        Ok(response.json().await?)
    }

    /// Results of a completed job.
    pub async fn get_job_results(&self, job_id: &str) -> IbmResult<JobResultResponse> {
        let url = format!("{}/v1/jobs/{job_id}/results", self.endpoint);
        let response = self.client.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(IbmError::JobNotFound(job_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(Self::api_error(response, "job results failed").await);
        }
        Ok(response.json().await?)
    }
}

/// Request body for a Sampler job.
///
/// The Cloud API takes V2 PUBs `[circuit, params, shots]`; the legacy API
/// takes a flat circuit list.
fn sampler_request(
    backend: &str,
    circuits: Vec<String>,
    shots: u32,
    cloud_api: bool,
    instance: Option<&str>,
) -> serde_json::Value {
    if cloud_api {
        let pubs: Vec<serde_json::Value> = circuits
            .into_iter()
            .map(|c| serde_json::json!([c, {}, shots]))
            .collect();
        return serde_json::json!({
            "program_id": "sampler",
            "backend": backend,
            "params": {
                "version": 2,
                "pubs": pubs,
                "options": { "optimization_level": 1 }
            }
        });
    }

    let mut request = serde_json::json!({
        "program_id": "sampler",
        "backend": backend,
        "params": {
            "circuits": circuits,
            "shots": shots
        }
    });
    if let Some(hub) = instance {
        request["hub"] = serde_json::json!(hub);
    }
    request
}

/// Pick the operational, non-simulator backend with enough qubits and the
/// fewest pending jobs. Ties go to the alphabetically first name.
pub fn least_busy(backends: &[BackendInfo], min_qubits: usize) -> Option<&BackendInfo> {
    backends
        .iter()
        .filter(|b| b.status.operational && !b.simulator && b.num_qubits >= min_qubits)
        .min_by(|a, b| {
            let load = |info: &BackendInfo| info.status.pending_jobs.unwrap_or(u32::MAX);
            load(a).cmp(&load(b)).then_with(|| a.name.cmp(&b.name))
        })
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: String,
}

/// Cloud API device listing (`{"devices": [...]}`).
#[derive(Debug, Deserialize)]
struct DevicesResponse {
    devices: Vec<DeviceEntry>,
}

#[derive(Debug, Deserialize)]
struct DeviceEntry {
    name: String,
}

/// Legacy API listing (`{"backends": [...]}`).
#[derive(Debug, Deserialize)]
struct LegacyBackendsResponse {
    backends: Vec<BackendInfo>,
}

#[derive(Debug, Deserialize)]
struct BackendConfigResponse {
    backend_name: String,
    n_qubits: usize,
    #[serde(default)]
    simulator: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct BackendStatusResponse {
    state: bool,
    #[serde(default)]
    status: String,
    #[serde(default)]
    length_queue: u64,
}

/// Backend information.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendInfo {
    /// Backend name.
    pub name: String,
    /// Number of qubits.
    pub num_qubits: usize,
    /// Backend status.
    pub status: BackendStatus,
    /// Whether this is a simulator.
    #[serde(default)]
    pub simulator: bool,
}

/// Backend status.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendStatus {
    /// Whether the backend accepts jobs.
    pub operational: bool,
    /// Status message.
    #[serde(default)]
    pub status_msg: Option<String>,
    /// Number of queued jobs.
    #[serde(default)]
    pub pending_jobs: Option<u32>,
}

/// Job submission response.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    /// Job ID.
    pub id: String,
}

/// Job status response.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusResponse {
    /// Job ID.
    pub id: String,
    /// Status, mixed case on the Cloud API.
    pub status: String,
    /// Failure details (legacy API).
    #[serde(default)]
    pub error: Option<JobError>,
    /// State with failure reason (Cloud API).
    #[serde(default)]
    pub state: Option<JobState>,
}

/// Job error information (legacy API).
#[derive(Debug, Clone, Deserialize)]
pub struct JobError {
    /// Error message.
    pub message: String,
}

/// Job state (Cloud API).
#[derive(Debug, Clone, Deserialize)]
pub struct JobState {
    /// Reason for failure.
    #[serde(default)]
    pub reason: Option<String>,
}

impl JobStatusResponse {
    /// Failure reason from whichever API reported it.
    pub fn error_message(&self) -> Option<String> {
        self.state
            .as_ref()
            .and_then(|s| s.reason.clone())
            .or_else(|| self.error.as_ref().map(|e| e.message.clone()))
    }

    /// Status as a [`JobStatus`].
    pub fn to_job_status(&self) -> JobStatus {
        match self.status.to_uppercase().as_str() {
            "COMPLETED" => JobStatus::Completed,
            "FAILED" | "ERROR" => JobStatus::Failed(
                self.error_message()
                    .unwrap_or_else(|| "no reason given".to_string()),
            ),
            "CANCELLED" => JobStatus::Cancelled,
            "RUNNING" => JobStatus::Running,
            _ => JobStatus::Queued,
        }
    }
}

/// Job result response.
#[derive(Debug, Deserialize)]
pub struct JobResultResponse {
    /// One result per submitted circuit.
    pub results: Vec<SamplerResult>,
}

/// Sampler result for one circuit.
#[derive(Debug, Deserialize)]
pub struct SamplerResult {
    /// V2: classical register name to per-shot hex samples.
    #[serde(default)]
    pub data: Option<HashMap<String, ClassicalRegisterData>>,
    /// V1: pre-aggregated counts.
    #[serde(default)]
    pub counts: Option<HashMap<String, u64>>,
}

/// Per-shot samples of one classical register.
#[derive(Debug, Deserialize)]
pub struct ClassicalRegisterData {
    /// Hex strings such as `"0x3"`, one per shot.
    pub samples: Vec<String>,
}

/// Convert a hex or binary register value into a `width`-bit binary
/// string with the highest bit leftmost.
///
/// Hex digits expand four bits at a time, so registers wider than 64 bits
/// convert exactly. Returns `None` for a value that is not valid hex or
/// binary.
pub fn hex_to_binary(value: &str, width: usize) -> Option<String> {
    let bits = match value.strip_prefix("0x") {
        Some(hex) => {
            let mut bits = String::with_capacity(hex.len() * 4);
            for digit in hex.chars() {
                let nibble = digit.to_digit(16)?;
                bits.push_str(&format!("{nibble:04b}"));
            }
            bits
        }
        None if value.chars().all(|b| b == '0' || b == '1') => value.to_string(),
        None => return None,
    };

    let significant = bits.trim_start_matches('0');
    if significant.len() > width {
        return Some(significant[significant.len() - width..].to_string());
    }
    Some(format!("{significant:0>width$}"))
}
