//! Provider identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HalError;

/// Backend family a circuit is translated to and executed on.
///
/// `Microsoft` and `IonQ` are recognized names without a bundled backend;
/// dispatching to them fails with [`HalError::UnsupportedProvider`] unless
/// a backend is registered for them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// IBM-style: integer qubit addressing, little-endian bitstrings.
    #[default]
    Ibm,
    /// Google-style: named qubits, per-key measurement records.
    Google,
    /// Amazon Braket: managed cloud simulators and QPUs.
    Braket,
    Microsoft,
    #[serde(rename = "ionq")]
    IonQ,
}

impl Provider {
    /// Every recognized provider.
    pub const ALL: [Provider; 5] = [
        Provider::Ibm,
        Provider::Google,
        Provider::Braket,
        Provider::Microsoft,
        Provider::IonQ,
    ];

    /// Lower-case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Ibm => "ibm",
            Provider::Google => "google",
            Provider::Braket => "braket",
            Provider::Microsoft => "microsoft",
            Provider::IonQ => "ionq",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ibm" | "qiskit" => Ok(Provider::Ibm),
            "google" | "cirq" => Ok(Provider::Google),
            "braket" | "amazon" | "aws" => Ok(Provider::Braket),
            "microsoft" | "qsharp" => Ok(Provider::Microsoft),
            "ionq" => Ok(Provider::IonQ),
            other => Err(HalError::Configuration(format!("unknown provider '{other}'"))),
        }
    }
}
