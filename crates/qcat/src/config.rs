//! Configuration for the dispatcher.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with QCAT_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use std::path::Path;

use qcat_hal::{DEFAULT_REPETITIONS, ExecuteOptions, HalError, Provider, SimulatorKind};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Defaults applied to every [`QCircuit`](crate::QCircuit) built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QcatConfig {
    /// Provider used by `draw_default` / `execute_default`.
    #[serde(default)]
    pub default_provider: Provider,

    /// Simulator kind for default runs.
    #[serde(default)]
    pub simulator: SimulatorKind,

    /// Shots per sampling run.
    #[serde(default = "default_repetitions")]
    pub repetitions: u32,

    /// Seed for reproducible local sampling.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_repetitions() -> u32 {
    DEFAULT_REPETITIONS
}

impl Default for QcatConfig {
    fn default() -> Self {
        Self {
            default_provider: Provider::default(),
            simulator: SimulatorKind::default(),
            repetitions: default_repetitions(),
            seed: None,
        }
    }
}

impl QcatConfig {
    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml_ng::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&contents)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `QCAT_*` variables looked up through `var`.
    ///
    /// Only variables that are set override; absent ones leave the field
    /// unchanged. Unparseable values are errors.
    pub fn apply_env<F>(mut self, var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = var("QCAT_PROVIDER") {
            self.default_provider = v
                .parse()
                .map_err(|e: HalError| ConfigError::Validation(format!("QCAT_PROVIDER: {e}")))?;
        }
        if let Some(v) = var("QCAT_SIMULATOR") {
            self.simulator = v
                .parse()
                .map_err(|e: HalError| ConfigError::Validation(format!("QCAT_SIMULATOR: {e}")))?;
        }
        if let Some(v) = var("QCAT_REPETITIONS") {
            self.repetitions = v.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("QCAT_REPETITIONS: '{v}' is not a shot count"))
            })?;
        }
        if let Some(v) = var("QCAT_SEED") {
            self.seed = Some(v.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("QCAT_SEED: '{v}' is not an unsigned integer"))
            })?);
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repetitions == 0 {
            return Err(ConfigError::Validation(
                "repetitions must be at least 1".to_string(),
            ));
        }
        if matches!(self.default_provider, Provider::Microsoft | Provider::IonQ) {
            warn!(
                "Default provider {} has no bundled backend; register one before dispatching",
                self.default_provider
            );
        }
        Ok(())
    }

    /// Run options described by this configuration, without credentials.
    pub fn execute_options(&self) -> ExecuteOptions {
        let options = ExecuteOptions::new()
            .with_simulator(self.simulator)
            .with_repetitions(self.repetitions);
        match self.seed {
            Some(seed) => options.with_seed(seed),
            None => options,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for HalError {
    fn from(err: ConfigError) -> Self {
        HalError::Configuration(err.to_string())
    }
}
