//! Cirq-style native circuit.
//!
//! Qubits are [`NamedQubit`]s rather than positions. Gates Cirq ships are
//! kept by name; everything else travels as a matrix gate carrying its
//! unitary.

use std::any::Any;
use std::fmt;

use qcat_hal::{NativeCircuit, Provider, leading_controls};
use qcat_ir::{OperationKind, Unitary};

/// A qubit identified by a label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedQubit {
    name: String,
}

impl NamedQubit {
    /// Qubit labelled `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register index for labels of the form `q{index}`.
    pub fn index(&self) -> Option<usize> {
        self.name.strip_prefix('q')?.parse().ok()
    }
}

impl fmt::Display for NamedQubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Gate applied by a [`CirqOperation`].
#[derive(Debug, Clone, PartialEq)]
pub enum CirqGate {
    /// A gate from Cirq's standard library.
    Named {
        /// Operation kind it realizes.
        kind: OperationKind,
        /// Cirq's name for it.
        name: &'static str,
    },
    /// X on the last qubit controlled by all others.
    ControlledX {
        /// Number of controls.
        num_controls: usize,
    },
    /// Gate given by its matrix.
    Matrix {
        /// Operation kind it realizes.
        kind: OperationKind,
        /// Display name.
        name: &'static str,
        /// Stored parameters.
        params: Vec<f64>,
        /// The matrix, controls first.
        unitary: Unitary,
    },
}

impl CirqGate {
    /// A standard-library gate.
    pub fn named(kind: OperationKind, name: &'static str) -> Self {
        Self::Named { kind, name }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Self::Named { name, .. } | Self::Matrix { name, .. } => name,
            Self::ControlledX { .. } => "CX",
        }
    }

    /// Number of leading control operands.
    pub fn num_controls(&self) -> usize {
        match self {
            Self::ControlledX { num_controls } => *num_controls,
            Self::Named { kind, .. } => leading_controls(*kind, &[]),
            Self::Matrix { kind, params, .. } => leading_controls(*kind, params),
        }
    }
}

/// One circuit operation.
#[derive(Debug, Clone, PartialEq)]
pub enum CirqOperation {
    /// Gate on qubits, controls first.
    Gate {
        /// The gate.
        gate: CirqGate,
        /// Operands.
        qubits: Vec<NamedQubit>,
    },
    /// Measurement of `qubits` stored under `key`.
    Measure {
        /// Measured qubits, in result order.
        qubits: Vec<NamedQubit>,
        /// Result key.
        key: String,
    },
}

/// Google native circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct CirqCircuit {
    qubits: Vec<NamedQubit>,
    num_clbits: usize,
    operations: Vec<CirqOperation>,
}

impl CirqCircuit {
    /// Empty circuit over `qubits` whose samples are `num_clbits` wide.
    pub fn new(qubits: Vec<NamedQubit>, num_clbits: usize) -> Self {
        Self {
            qubits,
            num_clbits,
            operations: Vec::new(),
        }
    }

    /// Width of a sampled bitstring.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Append an operation.
    pub fn append(&mut self, operation: CirqOperation) {
        self.operations.push(operation);
    }

    /// The circuit's qubits in register order.
    pub fn qubits(&self) -> &[NamedQubit] {
        &self.qubits
    }

    /// Operations in order.
    pub fn operations(&self) -> &[CirqOperation] {
        &self.operations
    }

    /// Whether any operation measures.
    pub fn has_measurements(&self) -> bool {
        self.operations
            .iter()
            .any(|op| matches!(op, CirqOperation::Measure { .. }))
    }

    /// Measurement keys in first-use order.
    pub fn measurement_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for op in &self.operations {
            if let CirqOperation::Measure { key, .. } = op {
                if !keys.contains(&key.as_str()) {
                    keys.push(key);
                }
            }
        }
        keys
    }
}

impl NativeCircuit for CirqCircuit {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn num_qubits(&self) -> u32 {
        u32::try_from(self.qubits.len()).unwrap_or(u32::MAX)
    }

    fn len(&self) -> usize {
        self.operations.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
