//! Error types for the Amazon Braket adapter.

use qcat_hal::{HalError, Provider};
use thiserror::Error;

/// Result type for Braket operations.
pub type BraketResult<T> = Result<T, BraketError>;

/// Errors that can occur when using Amazon Braket.
#[derive(Debug, Error)]
pub enum BraketError {
    /// Credentials are not AWS credentials.
    #[error("Amazon Braket expects AWS credentials with an S3 bucket")]
    InvalidCredentials,

    /// Unknown device name or malformed ARN.
    #[error("Invalid device ARN: {0}")]
    InvalidDeviceArn(String),

    /// Braket API error.
    #[error("Braket API error: {0}")]
    BraketApi(String),

    /// S3 error.
    #[error("S3 error: {0}")]
    S3Error(String),

    /// Task not found.
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Task failed.
    #[error("Task failed: {0}")]
    TaskFailed(String),

    /// Task was cancelled.
    #[error("Task was cancelled: {0}")]
    TaskCancelled(String),

    /// Circuit conversion error.
    #[error("Circuit conversion error: {0}")]
    CircuitError(String),

    /// Device offline or retired.
    #[error("Device not available: {0}")]
    DeviceUnavailable(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Circuit too large for device.
    #[error("Circuit requires {required} qubits but device only has {available}")]
    TooManyQubits {
        /// Qubits needed.
        required: usize,
        /// Qubits available.
        available: usize,
    },

    /// Result parsing error.
    #[error("Failed to parse task result: {0}")]
    ResultParseError(String),
}

impl From<BraketError> for HalError {
    fn from(e: BraketError) -> Self {
        match e {
            BraketError::InvalidCredentials => HalError::InvalidCredentials {
                provider: Provider::Braket,
                reason: e.to_string(),
            },
            BraketError::InvalidDeviceArn(_) | BraketError::DeviceUnavailable(_) => {
                HalError::DeviceNotFound(e.to_string())
            }
            BraketError::TaskFailed(msg) => HalError::JobFailed(msg),
            BraketError::TaskCancelled(_) => HalError::JobCancelled,
            BraketError::TooManyQubits {
                required,
                available,
            } => HalError::CircuitTooLarge(format!(
                "Circuit requires {required} qubits but device only has {available}"
            )),
            BraketError::CircuitError(msg) => HalError::InvalidCircuit(msg),
            BraketError::JsonError(e) => HalError::Serialization(e),
            _ => HalError::Backend(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_many_qubits_display() {
        let err = BraketError::TooManyQubits {
            required: 50,
            available: 34,
        };
        let msg = err.to_string();
        assert!(msg.contains("50"));
        assert!(msg.contains("34"));
    }

    #[test]
    fn test_invalid_credentials_to_hal() {
        let hal: HalError = BraketError::InvalidCredentials.into();
        assert!(matches!(
            hal,
            HalError::InvalidCredentials {
                provider: Provider::Braket,
                ..
            }
        ));
    }

    #[test]
    fn test_device_errors_to_hal() {
        let hal: HalError = BraketError::InvalidDeviceArn("nope".into()).into();
        assert!(matches!(hal, HalError::DeviceNotFound(msg) if msg.contains("nope")));
        let hal: HalError = BraketError::DeviceUnavailable("offline".into()).into();
        assert!(matches!(hal, HalError::DeviceNotFound(_)));
    }

    #[test]
    fn test_task_outcomes_to_hal() {
        let hal: HalError = BraketError::TaskFailed("boom".into()).into();
        assert!(matches!(hal, HalError::JobFailed(msg) if msg == "boom"));
        let hal: HalError = BraketError::TaskCancelled("user".into()).into();
        assert!(matches!(hal, HalError::JobCancelled));
    }

    #[test]
    fn test_api_error_to_hal_backend() {
        let hal: HalError = BraketError::BraketApi("server error".into()).into();
        assert!(matches!(hal, HalError::Backend(_)));
    }
}
