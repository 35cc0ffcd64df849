//! Google backend for qcat.
//!
//! Circuits translate into a Cirq-shaped [`CirqCircuit`] over named qubits
//! `q0..q{n-1}`. Gates outside Cirq's standard library travel as matrix
//! gates; ECR has no Cirq counterpart and is rejected.
//!
//! Execution is local only, on the big-endian simulator.
//!
//! # Example
//!
//! ```
//! use qcat_adapter_google::GoogleBackend;
//! use qcat_hal::{Backend, ExecuteOptions};
//! use qcat_ir::Circuit;
//!
//! let backend = GoogleBackend::new();
//! let native = backend.translate(&Circuit::bell().unwrap()).unwrap();
//! assert!(backend.draw(&native).contains("M('result')"));
//!
//! let options = ExecuteOptions::new().with_repetitions(100).with_seed(3);
//! let result = backend.execute(&native, &options).unwrap();
//! let counts = result.as_counts().unwrap();
//! assert_eq!(counts.get("00") + counts.get("11"), 100);
//! ```

pub mod draw;
pub mod execute;
pub mod gate_map;
pub mod native;
pub mod translate;

pub use gate_map::gate_map;
pub use native::{CirqCircuit, CirqGate, CirqOperation, NamedQubit};

use qcat_hal::{Backend, ExecuteOptions, ExecutionResult, HalResult, Provider};
use qcat_ir::Circuit;

/// Google backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleBackend;

impl GoogleBackend {
    /// Create the backend.
    pub fn new() -> Self {
        Self
    }
}

impl Backend for GoogleBackend {
    type Native = CirqCircuit;

    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn name(&self) -> &str {
        "google"
    }

    fn translate(&self, circuit: &Circuit) -> HalResult<CirqCircuit> {
        translate::translate(circuit)
    }

    fn execute(&self, native: &CirqCircuit, options: &ExecuteOptions) -> HalResult<ExecutionResult> {
        execute::execute(native, options)
    }

    fn draw(&self, native: &CirqCircuit) -> String {
        draw::draw(native)
    }
}
