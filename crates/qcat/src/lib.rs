//! Write a quantum circuit once, run it on any supported provider.
//!
//! [`QCircuit`] wraps the provider-neutral [`Circuit`] IR and dispatches
//! `draw` and `execute` to a backend chosen per call:
//!
//! | Provider | Native form | Local bit order | Remote |
//! |----------|-------------|-----------------|--------|
//! | [`Provider::Ibm`] | Qiskit-style instruction list | little-endian | IBM Quantum Sampler |
//! | [`Provider::Google`] | Cirq-style operations on named qubits | big-endian | not available |
//! | [`Provider::Braket`] | Braket instructions + result types | big-endian | Amazon Braket tasks |
//!
//! Counts are always returned with classical bit 0 leftmost, whichever
//! provider produced them.
//!
//! # Example
//!
//! ```
//! use qcat::{ExecuteOptions, Provider, QCircuit, QubitId};
//!
//! let mut qc = QCircuit::new(3);
//! qc.x(QubitId(0))?.measure_all()?;
//!
//! let options = ExecuteOptions::new().with_repetitions(100);
//! for provider in [Provider::Ibm, Provider::Google, Provider::Braket] {
//!     let result = qc.execute(provider, &options)?;
//!     assert_eq!(result.as_counts().unwrap().get("100"), 100);
//! }
//! # Ok::<(), qcat::HalError>(())
//! ```
//!
//! # Logging
//!
//! Translation and execution emit `tracing` spans and events. Install a
//! subscriber with [`telemetry::init_tracing`] to see them.

pub mod circuit;
pub mod config;
pub mod telemetry;

pub use circuit::QCircuit;
pub use config::{ConfigError, QcatConfig};

pub use qcat_hal::{
    BackendRegistry, Counts, Credentials, ExecuteOptions, ExecutionOutput, ExecutionResult,
    HalError, HalResult, NativeCircuit, Provider, SimulatorKind,
};
pub use qcat_ir::{
    Circuit, ClbitId, IrError, IrResult, McxMode, Operation, OperationKind, QubitId,
};

use qcat_adapter_braket::BraketBackend;
use qcat_adapter_google::GoogleBackend;
use qcat_adapter_ibm::IbmBackend;

/// Registry holding the bundled IBM, Google and Braket backends.
pub fn default_registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry.register(IbmBackend::new());
    registry.register(GoogleBackend::new());
    registry.register(BraketBackend::new());
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = default_registry();
        assert_eq!(
            registry.providers(),
            vec![Provider::Ibm, Provider::Google, Provider::Braket]
        );
        assert!(!registry.has_backend(Provider::Microsoft));
        assert!(!registry.has_backend(Provider::IonQ));
    }
}
