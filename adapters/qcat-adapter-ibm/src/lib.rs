//! IBM Quantum backend for qcat.
//!
//! Circuits translate into a Qiskit-shaped [`IbmCircuit`]. Without
//! credentials they run on the local little-endian simulator; with an
//! API token they are emitted as OpenQASM 3 and submitted to the Sampler
//! primitive on IBM Quantum.
//!
//! # Authentication
//!
//! [`Credentials::ApiToken`](qcat_hal::Credentials::ApiToken) carries the
//! token. An `instance` starting with `crn:` selects the IBM Cloud flow
//! (the token is an API key exchanged through IAM); any other instance is
//! a legacy hub/group/project.
//!
//! # Example
//!
//! ```
//! use qcat_adapter_ibm::IbmBackend;
//! use qcat_hal::{Backend, ExecuteOptions};
//! use qcat_ir::Circuit;
//!
//! let backend = IbmBackend::new();
//! let native = backend.translate(&Circuit::bell().unwrap()).unwrap();
//! println!("{}", backend.draw(&native));
//!
//! let options = ExecuteOptions::new().with_repetitions(100).with_seed(3);
//! let result = backend.execute(&native, &options).unwrap();
//! let counts = result.as_counts().unwrap();
//! assert_eq!(counts.get("00") + counts.get("11"), 100);
//! ```

pub mod api;
pub mod draw;
pub mod error;
pub mod execute;
pub mod gate_map;
pub mod native;
pub mod qasm;
pub mod translate;

pub use error::{IbmError, IbmResult};
pub use gate_map::gate_map;
pub use native::{IbmCircuit, IbmGate, IbmInstruction};

use qcat_hal::{Backend, ExecuteOptions, ExecutionResult, HalResult, Provider};
use qcat_ir::Circuit;

/// IBM Quantum backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct IbmBackend;

impl IbmBackend {
    /// Create the backend.
    pub fn new() -> Self {
        Self
    }
}

impl Backend for IbmBackend {
    type Native = IbmCircuit;

    fn provider(&self) -> Provider {
        Provider::Ibm
    }

    fn name(&self) -> &str {
        "ibm"
    }

    fn translate(&self, circuit: &Circuit) -> HalResult<IbmCircuit> {
        translate::translate(circuit)
    }

    fn execute(&self, native: &IbmCircuit, options: &ExecuteOptions) -> HalResult<ExecutionResult> {
        execute::execute(native, options)
    }

    fn draw(&self, native: &IbmCircuit) -> String {
        draw::draw(native)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat_hal::DynBackend;
    use qcat_ir::OperationKind;

    #[test]
    fn test_backend_identity() {
        let backend = IbmBackend::new();
        assert_eq!(Backend::provider(&backend), Provider::Ibm);
        assert_eq!(Backend::name(&backend), "ibm");
    }

    #[test]
    fn test_dyn_round_trip() {
        let backend: Box<dyn DynBackend> = Box::new(IbmBackend::new());
        let native = backend.translate_dyn(&Circuit::bell().unwrap()).unwrap();
        assert!(native.downcast_ref::<IbmCircuit>().is_some());
        assert!(backend.draw_dyn(native.as_ref()).unwrap().contains("q_1"));
    }

    #[test]
    fn test_ecr_supported() {
        let mut circuit = Circuit::new(2);
        circuit.ecr(qcat_ir::QubitId(0), qcat_ir::QubitId(1)).unwrap();
        let native = IbmBackend::new().translate(&circuit).unwrap();
        let IbmInstruction::Gate { gate, .. } = &native.instructions()[0] else {
            panic!("expected a gate");
        };
        assert_eq!(gate.kind(), OperationKind::Ecr);
    }
}
