//! Execution options and credentials.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};
use crate::provider::Provider;

/// Default number of shots for sampling runs.
pub const DEFAULT_REPETITIONS: u32 = 1000;

/// Which simulator a run targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulatorKind {
    /// Sample measurement outcomes over repeated shots.
    #[default]
    Qasm,
    /// Compute the final amplitude vector; repetitions are ignored.
    Statevector,
}

impl SimulatorKind {
    /// Simulator name used in results.
    pub fn as_str(self) -> &'static str {
        match self {
            SimulatorKind::Qasm => "qasm_simulator",
            SimulatorKind::Statevector => "statevector_simulator",
        }
    }
}

impl fmt::Display for SimulatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimulatorKind {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qasm" | "qasm_simulator" | "sampler" => Ok(SimulatorKind::Qasm),
            "statevector" | "statevector_simulator" => Ok(SimulatorKind::Statevector),
            other => Err(HalError::Configuration(format!(
                "unknown simulator kind '{other}'"
            ))),
        }
    }
}

/// Credentials for remote execution.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Credentials {
    /// Bearer token for token-authenticated services (IBM Quantum).
    ApiToken {
        /// API token.
        #[serde(skip_serializing)]
        token: String,
        /// Optional service instance (CRN or hub/group/project).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        instance: Option<String>,
    },
    /// AWS account access for Amazon Braket.
    ///
    /// Keys come from the standard AWS credential chain; this names where
    /// task results are written.
    Aws {
        /// S3 bucket for task results.
        s3_bucket: String,
        /// Key prefix inside the bucket.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        s3_prefix: Option<String>,
        /// AWS region override.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        region: Option<String>,
    },
}

impl Credentials {
    /// Token credentials.
    pub fn api_token(token: impl Into<String>) -> Self {
        Credentials::ApiToken {
            token: token.into(),
            instance: None,
        }
    }

    /// AWS credentials writing results to `s3_bucket`.
    pub fn aws(s3_bucket: impl Into<String>) -> Self {
        Credentials::Aws {
            s3_bucket: s3_bucket.into(),
            s3_prefix: None,
            region: None,
        }
    }

    /// Read credentials for `provider` from the environment.
    ///
    /// - IBM: `IBM_QUANTUM_TOKEN`, optional `IBM_QUANTUM_INSTANCE`
    /// - Braket: `QCAT_BRAKET_S3_BUCKET`, optional `QCAT_BRAKET_S3_PREFIX`
    ///   and `AWS_REGION`
    ///
    /// Returns `None` when the required variable is unset or empty.
    pub fn from_env(provider: Provider) -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        match provider {
            Provider::Ibm => var("IBM_QUANTUM_TOKEN").map(|token| Credentials::ApiToken {
                token,
                instance: var("IBM_QUANTUM_INSTANCE"),
            }),
            Provider::Braket => var("QCAT_BRAKET_S3_BUCKET").map(|s3_bucket| Credentials::Aws {
                s3_bucket,
                s3_prefix: var("QCAT_BRAKET_S3_PREFIX"),
                region: var("AWS_REGION"),
            }),
            _ => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ApiToken { instance, .. } => f
                .debug_struct("ApiToken")
                .field("token", &"[REDACTED]")
                .field("instance", instance)
                .finish(),
            Credentials::Aws {
                s3_bucket,
                s3_prefix,
                region,
            } => f
                .debug_struct("Aws")
                .field("s3_bucket", s3_bucket)
                .field("s3_prefix", s3_prefix)
                .field("region", region)
                .finish(),
        }
    }
}

/// Where a run goes, derived from the credential/device combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    /// In-process simulator.
    Local,
    /// Remote service, on the named device or the provider's default pick.
    Remote {
        /// Credentials for the service.
        credentials: &'a Credentials,
        /// Requested device, if any.
        device: Option<&'a str>,
    },
}

/// Options for one `execute` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteOptions {
    /// Sampling or statevector simulation.
    #[serde(default)]
    pub simulator: SimulatorKind,
    /// Shots for sampling runs.
    #[serde(default = "default_repetitions")]
    pub repetitions: u32,
    /// Remote credentials; absent means local simulation.
    #[serde(default, skip_serializing)]
    pub credentials: Option<Credentials>,
    /// Remote device name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Seed for local sampling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_repetitions() -> u32 {
    DEFAULT_REPETITIONS
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            simulator: SimulatorKind::Qasm,
            repetitions: DEFAULT_REPETITIONS,
            credentials: None,
            device: None,
            seed: None,
        }
    }
}

impl ExecuteOptions {
    /// Sampling run with default repetitions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Statevector run.
    pub fn statevector() -> Self {
        Self::default().with_simulator(SimulatorKind::Statevector)
    }

    /// Set the simulator kind.
    #[must_use]
    pub fn with_simulator(mut self, simulator: SimulatorKind) -> Self {
        self.simulator = simulator;
        self
    }

    /// Set the number of shots.
    #[must_use]
    pub fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = repetitions;
        self
    }

    /// Run remotely with these credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Request a specific remote device.
    #[must_use]
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Seed local sampling.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Resolve where the run should go.
    ///
    /// A device without credentials is an error rather than a silent
    /// fallback to the local simulator.
    pub fn target(&self, provider: Provider) -> HalResult<Target<'_>> {
        match (&self.credentials, &self.device) {
            (None, None) => Ok(Target::Local),
            (None, Some(_)) => Err(HalError::MissingCredentials { provider }),
            (Some(credentials), device) => Ok(Target::Remote {
                credentials,
                device: device.as_deref(),
            }),
        }
    }

    /// Reject shot counts the samplers cannot honor.
    pub fn validate(&self) -> HalResult<()> {
        if self.simulator == SimulatorKind::Qasm && self.repetitions == 0 {
            return Err(HalError::InvalidShots(
                "sampling needs at least one repetition".into(),
            ));
        }
        Ok(())
    }

    /// Reject a sampling run of a circuit that measures nothing.
    ///
    /// Statevector runs need no measurements and always pass.
    pub fn require_measurements(&self, provider: Provider, has_measurements: bool) -> HalResult<()> {
        if self.simulator == SimulatorKind::Qasm && !has_measurements {
            return Err(HalError::NoMeasurements(provider.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ExecuteOptions::default();
        assert_eq!(options.simulator, SimulatorKind::Qasm);
        assert_eq!(options.repetitions, 1000);
        assert_eq!(options.target(Provider::Ibm).unwrap(), Target::Local);
    }

    #[test]
    fn test_device_without_credentials() {
        let options = ExecuteOptions::new().with_device("ibm_brisbane");
        assert!(matches!(
            options.target(Provider::Ibm),
            Err(HalError::MissingCredentials {
                provider: Provider::Ibm
            })
        ));
    }

    #[test]
    fn test_remote_target() {
        let options = ExecuteOptions::new().with_credentials(Credentials::api_token("secret"));
        let Target::Remote { device, .. } = options.target(Provider::Ibm).unwrap() else {
            panic!("expected remote target");
        };
        assert_eq!(device, None);
    }

    #[test]
    fn test_zero_shots_rejected_for_sampling_only() {
        assert!(ExecuteOptions::new().with_repetitions(0).validate().is_err());
        assert!(
            ExecuteOptions::statevector()
                .with_repetitions(0)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_sampling_requires_measurements() {
        let err = ExecuteOptions::new()
            .require_measurements(Provider::Google, false)
            .unwrap_err();
        assert!(matches!(&err, HalError::NoMeasurements(p) if p == "google"));
        assert!(ExecuteOptions::new().require_measurements(Provider::Google, true).is_ok());
        assert!(
            ExecuteOptions::statevector()
                .require_measurements(Provider::Braket, false)
                .is_ok()
        );
    }

    #[test]
    fn test_token_is_redacted() {
        let creds = Credentials::api_token("super-secret");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));

        let json = serde_json::to_string(&creds).unwrap();
        assert!(!json.contains("super-secret"));
    }

    #[test]
    fn test_simulator_kind_parse() {
        assert_eq!(
            "statevector".parse::<SimulatorKind>().unwrap(),
            SimulatorKind::Statevector
        );
        assert_eq!(
            "qasm_simulator".parse::<SimulatorKind>().unwrap(),
            SimulatorKind::Qasm
        );
        assert!("density".parse::<SimulatorKind>().is_err());
    }
}
