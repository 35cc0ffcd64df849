//! Amazon Braket and S3 client.
//!
//! Tasks are created through the Braket API; their results land in the
//! configured S3 bucket as `{prefix}/{task_id}/results.json`.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use aws_sdk_braket::types::{DeviceStatus as SdkDeviceStatus, QuantumTaskStatus};
use qcat_hal::JobStatus;
use serde::Deserialize;
use tracing::debug;

use crate::error::{BraketError, BraketResult};

/// Braket and S3 clients bound to one region and result location.
pub struct BraketClient {
    braket: aws_sdk_braket::Client,
    s3: aws_sdk_s3::Client,
    s3_bucket: String,
    s3_prefix: String,
    region: String,
}

impl fmt::Debug for BraketClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BraketClient")
            .field("s3_bucket", &self.s3_bucket)
            .field("s3_prefix", &self.s3_prefix)
            .field("region", &self.region)
            .field("credentials", &"[REDACTED]")
            .finish()
    }
}

impl BraketClient {
    /// Create a client.
    ///
    /// Keys come from the default AWS chain (environment, SSO, config
    /// files, IAM role).
    pub async fn new(
        region: impl Into<String>,
        s3_bucket: impl Into<String>,
        s3_prefix: impl Into<String>,
    ) -> Self {
        let region = region.into();

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.clone()))
            .timeout_config(
                aws_config::timeout::TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(60))
                    .connect_timeout(Duration::from_secs(10))
                    .build(),
            )
            .load()
            .await;

        Self {
            braket: aws_sdk_braket::Client::new(&config),
            s3: aws_sdk_s3::Client::new(&config),
            s3_bucket: s3_bucket.into(),
            s3_prefix: s3_prefix.into(),
            region,
        }
    }

    /// Device name and status.
    pub async fn get_device(&self, device_arn: &str) -> BraketResult<DeviceInfo> {
        let resp = self
            .braket
            .get_device()
            .device_arn(device_arn)
            .send()
            .await
            .map_err(|e| BraketError::BraketApi(e.to_string()))?;

        Ok(DeviceInfo {
            device_arn: device_arn.to_string(),
            device_name: resp.device_name().to_string(),
            online: *resp.device_status() == SdkDeviceStatus::Online,
            provider_name: resp.provider_name().to_string(),
        })
    }

    /// Create a quantum task running `qasm` for `shots` shots.
    pub async fn create_task(&self, device_arn: &str, qasm: &str, shots: u32) -> BraketResult<String> {
        let action = serde_json::json!({
            "braketSchemaHeader": {
                "name": "braket.ir.openqasm.program",
                "version": "1"
            },
            "source": qasm
        });

        let resp = self
            .braket
            .create_quantum_task()
            .device_arn(device_arn)
            .action(action.to_string())
            .shots(i64::from(shots))
            .output_s3_bucket(&self.s3_bucket)
            .output_s3_key_prefix(&self.s3_prefix)
            .send()
            .await
            .map_err(|e| BraketError::BraketApi(e.to_string()))?;

        Ok(resp.quantum_task_arn().to_string())
    }

    /// Current status of a task.
    pub async fn get_task_status(&self, task_arn: &str) -> BraketResult<JobStatus> {
        let resp = self
            .braket
            .get_quantum_task()
            .quantum_task_arn(task_arn)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("ResourceNotFoundException") {
                    BraketError::TaskNotFound(task_arn.to_string())
                } else {
                    BraketError::BraketApi(e.to_string())
                }
            })?;

        let status = match resp.status() {
            QuantumTaskStatus::Created | QuantumTaskStatus::Queued => JobStatus::Queued,
            QuantumTaskStatus::Running => JobStatus::Running,
            QuantumTaskStatus::Completed => JobStatus::Completed,
            QuantumTaskStatus::Failed => JobStatus::Failed(
                resp.failure_reason()
                    .unwrap_or("Unknown failure")
                    .to_string(),
            ),
            QuantumTaskStatus::Cancelling | QuantumTaskStatus::Cancelled => JobStatus::Cancelled,
            other => JobStatus::Failed(format!("Unknown status {other:?}")),
        };
        debug!("Task {task_arn} is {status:?}");
        Ok(status)
    }

    /// Fetch a finished task's result document from S3.
    pub async fn get_task_result(&self, task_arn: &str) -> BraketResult<TaskResult> {
        let task_id = task_id(task_arn)
            .ok_or_else(|| BraketError::ResultParseError(format!("no task id in '{task_arn}'")))?;
        let key = format!("{}/{}/results.json", self.s3_prefix, task_id);

        let resp = self
            .s3
            .get_object()
            .bucket(&self.s3_bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| BraketError::S3Error(e.to_string()))?;

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| BraketError::S3Error(e.to_string()))?;

        Ok(serde_json::from_slice(&body.into_bytes())?)
    }
}

/// Task id, the last segment of a task ARN.
pub fn task_id(task_arn: &str) -> Option<&str> {
    // arn:aws:braket:<region>:<account>:quantum-task/<id>
    task_arn.rsplit('/').next().filter(|id| !id.is_empty() && *id != task_arn)
}

/// Device information from Braket.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Device ARN.
    pub device_arn: String,
    /// Device name.
    pub device_name: String,
    /// Whether the device accepts tasks.
    pub online: bool,
    /// Provider name (e.g. "Rigetti", "IonQ").
    pub provider_name: String,
}

/// Task result document stored in S3.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    /// Bitstring counts over `measured_qubits`.
    #[serde(default)]
    pub measurement_counts: Option<HashMap<String, u64>>,
    /// Bitstring probabilities over `measured_qubits`.
    #[serde(default)]
    pub measurement_probabilities: Option<HashMap<String, f64>>,
    /// One row of outcomes per shot.
    #[serde(default)]
    pub measurements: Option<Vec<Vec<u8>>>,
    /// Qubits the bitstrings cover, in character order.
    #[serde(default)]
    pub measured_qubits: Option<Vec<usize>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id() {
        assert_eq!(
            task_id("arn:aws:braket:us-east-1:123456789012:quantum-task/abc-123"),
            Some("abc-123")
        );
        assert_eq!(task_id("no-slashes"), None);
    }

    #[test]
    fn test_task_result_deserialize_counts() {
        let json = r#"{
            "measurementCounts": {"00": 500, "11": 500},
            "measuredQubits": [0, 1]
        }"#;
        let result: TaskResult = serde_json::from_str(json).unwrap();
        let counts = result.measurement_counts.unwrap();
        assert_eq!(counts.get("00"), Some(&500));
        assert_eq!(result.measured_qubits, Some(vec![0, 1]));
    }

    #[test]
    fn test_task_result_deserialize_measurements() {
        let json = r#"{
            "measurements": [[0, 0], [1, 1], [0, 0], [1, 1]],
            "measuredQubits": [0, 1]
        }"#;
        let result: TaskResult = serde_json::from_str(json).unwrap();
        let measurements = result.measurements.unwrap();
        assert_eq!(measurements.len(), 4);
        assert_eq!(measurements[1], vec![1, 1]);
    }
}
