//! Error types for the HAL crate.

use qcat_ir::{IrError, OperationKind};
use thiserror::Error;

use crate::provider::Provider;

/// Errors that can occur while translating or executing a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// The provider's gate map has no entry for an operation kind.
    #[error("Operation '{kind}' is not supported by provider '{provider}'")]
    UnsupportedOperation {
        /// The unmapped operation kind.
        kind: OperationKind,
        /// The provider that was asked to translate it.
        provider: Provider,
    },

    /// No backend is registered for the provider.
    #[error("Provider '{0}' has no registered backend")]
    UnsupportedProvider(Provider),

    /// Remote execution was requested without credentials.
    #[error("API Key is required for running on real quantum device (provider: {provider})")]
    MissingCredentials {
        /// Provider that needs credentials.
        provider: Provider,
    },

    /// Credentials of the wrong kind for the provider.
    #[error("Invalid credentials for provider '{provider}': {reason}")]
    InvalidCredentials {
        /// Provider the credentials were given to.
        provider: Provider,
        /// What was wrong.
        reason: String,
    },

    /// The circuit cannot be expressed on the backend.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// A sampling run was requested for a circuit without measurements.
    #[error("No counts: the {0} circuit has no measurements")]
    NoMeasurements(String),

    /// Circuit exceeds backend capabilities.
    #[error("Circuit exceeds backend capabilities: {0}")]
    CircuitTooLarge(String),

    /// Unsupported feature.
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Named device does not exist or is offline.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Remote job submission failed.
    #[error("Job submission failed: {0}")]
    SubmissionFailed(String),

    /// Remote job ended in failure.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Remote job was cancelled.
    #[error("Job cancelled")]
    JobCancelled,

    /// Network error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IR error raised while building matrices or inspecting operations.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
