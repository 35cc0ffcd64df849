//! Amazon Braket backend for qcat.
//!
//! Circuits translate into a Braket-shaped [`BraketCircuit`]: gate-set
//! gates by name, everything else as unitary pragmas, and measurements as
//! `Probability` result types. Without credentials they run on the local
//! big-endian simulator; with [`Credentials::Aws`](qcat_hal::Credentials::Aws)
//! they are submitted as OpenQASM to Amazon Braket.
//!
//! # Configuration
//!
//! - `QCAT_BRAKET_S3_BUCKET` (required for remote runs): bucket for task results
//! - `QCAT_BRAKET_S3_PREFIX` (optional, default `"qcat-results"`)
//! - `AWS_REGION` (optional; otherwise the device's region or `us-east-1`)
//!
//! The device may be an ARN or a friendly name such as `"sv1"` or
//! `"forte"`. SV1 is used when none is given.
//!
//! # Example
//!
//! ```
//! use qcat_adapter_braket::BraketBackend;
//! use qcat_hal::{Backend, ExecuteOptions};
//! use qcat_ir::Circuit;
//!
//! let backend = BraketBackend::new();
//! let native = backend.translate(&Circuit::bell().unwrap()).unwrap();
//! println!("{}", backend.draw(&native));
//!
//! let options = ExecuteOptions::new().with_repetitions(100).with_seed(3);
//! let result = backend.execute(&native, &options).unwrap();
//! let counts = result.as_counts().unwrap();
//! assert_eq!(counts.get("00") + counts.get("11"), 100);
//! ```

pub mod api;
pub mod device;
pub mod draw;
pub mod error;
pub mod execute;
pub mod gate_map;
pub mod native;
pub mod qasm;
pub mod translate;

pub use error::{BraketError, BraketResult};
pub use gate_map::gate_map;
pub use native::{BraketCircuit, BraketGate, BraketInstruction, Measurement, ResultType};

use qcat_hal::{Backend, ExecuteOptions, ExecutionResult, HalResult, Provider};
use qcat_ir::Circuit;

/// Amazon Braket backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraketBackend;

impl BraketBackend {
    /// Create the backend.
    pub fn new() -> Self {
        Self
    }
}

impl Backend for BraketBackend {
    type Native = BraketCircuit;

    fn provider(&self) -> Provider {
        Provider::Braket
    }

    fn name(&self) -> &str {
        "braket"
    }

    fn translate(&self, circuit: &Circuit) -> HalResult<BraketCircuit> {
        translate::translate(circuit)
    }

    fn execute(
        &self,
        native: &BraketCircuit,
        options: &ExecuteOptions,
    ) -> HalResult<ExecutionResult> {
        execute::execute(native, options)
    }

    fn draw(&self, native: &BraketCircuit) -> String {
        draw::draw(native)
    }
}
