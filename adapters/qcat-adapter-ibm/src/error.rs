//! Error types for the IBM Quantum adapter.

use qcat_hal::{HalError, Provider};
use thiserror::Error;

/// Result type for IBM operations.
pub type IbmResult<T> = Result<T, IbmError>;

/// Errors that can occur when talking to IBM Quantum.
#[derive(Debug, Error)]
pub enum IbmError {
    /// Token cannot be used as a header value.
    #[error("Invalid IBM Quantum API token")]
    InvalidToken,

    /// IAM token exchange failed.
    #[error("IAM token exchange failed: {0}")]
    IamTokenExchange(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error.
    #[error("IBM Quantum API error: {message}")]
    ApiError {
        /// Error code from API.
        code: Option<String>,
        /// Error message.
        message: String,
    },

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Job failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Job was cancelled.
    #[error("Job was cancelled: {0}")]
    JobCancelled(String),

    /// Circuit cannot be expressed for submission.
    #[error("Circuit conversion error: {0}")]
    CircuitError(String),

    /// Named backend not available.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// No operational hardware is large enough.
    #[error("No operational IBM device with at least {required} qubits")]
    NoSuitableBackend {
        /// Qubits needed.
        required: usize,
    },

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Circuit too large for backend.
    #[error("Circuit requires {required} qubits but backend only has {available}")]
    TooManyQubits {
        /// Qubits needed.
        required: usize,
        /// Qubits available.
        available: usize,
    },

    /// Invalid parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl From<IbmError> for HalError {
    fn from(e: IbmError) -> Self {
        match e {
            IbmError::InvalidToken | IbmError::IamTokenExchange(_) => {
                HalError::InvalidCredentials {
                    provider: Provider::Ibm,
                    reason: e.to_string(),
                }
            }
            IbmError::HttpError(err) => HalError::Network(err),
            IbmError::JsonError(err) => HalError::Serialization(err),
            IbmError::JobFailed(msg) => HalError::JobFailed(msg),
            IbmError::JobCancelled(_) => HalError::JobCancelled,
            IbmError::BackendUnavailable(name) => HalError::DeviceNotFound(name),
            IbmError::NoSuitableBackend { .. } => HalError::DeviceNotFound(e.to_string()),
            IbmError::TooManyQubits { .. } => HalError::CircuitTooLarge(e.to_string()),
            IbmError::CircuitError(msg) => HalError::InvalidCircuit(msg),
            _ => HalError::Backend(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = IbmError::ApiError {
            code: Some("ERR_401".into()),
            message: "Unauthorized".into(),
        };
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[test]
    fn test_too_many_qubits_display() {
        let err = IbmError::TooManyQubits {
            required: 200,
            available: 127,
        };
        let msg = err.to_string();
        assert!(msg.contains("200"));
        assert!(msg.contains("127"));
    }

    #[test]
    fn test_token_errors_become_invalid_credentials() {
        for err in [IbmError::InvalidToken, IbmError::IamTokenExchange("401".into())] {
            let hal: HalError = err.into();
            assert!(matches!(
                hal,
                HalError::InvalidCredentials {
                    provider: Provider::Ibm,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_job_errors_convert() {
        let hal: HalError = IbmError::JobFailed("calibration".into()).into();
        assert!(matches!(hal, HalError::JobFailed(msg) if msg == "calibration"));

        let hal: HalError = IbmError::JobCancelled("job-1".into()).into();
        assert!(matches!(hal, HalError::JobCancelled));
    }

    #[test]
    fn test_backend_errors_become_device_not_found() {
        let hal: HalError = IbmError::BackendUnavailable("ibm_fez".into()).into();
        assert!(matches!(hal, HalError::DeviceNotFound(name) if name == "ibm_fez"));

        let hal: HalError = IbmError::NoSuitableBackend { required: 9 }.into();
        assert!(matches!(hal, HalError::DeviceNotFound(msg) if msg.contains('9')));
    }

    #[test]
    fn test_other_errors_keep_vendor_text() {
        let hal: HalError = IbmError::ApiError {
            code: None,
            message: "queue closed".into(),
        }
        .into();
        assert!(matches!(hal, HalError::Backend(msg) if msg.contains("queue closed")));
    }
}
