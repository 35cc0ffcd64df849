//! IBM native circuit model.
//!
//! Mirrors a Qiskit `QuantumCircuit`: one quantum register addressed by
//! integer position, one classical register, and a flat instruction list.
//! Gates keep Qiskit's instruction names.

use std::any::Any;

use qcat_hal::{NativeCircuit, Provider, leading_controls};
use qcat_ir::{IrResult, McxMode, OperationKind, Unitary, unitary_for};

/// A gate instruction as IBM tooling names it.
#[derive(Debug, Clone, PartialEq)]
pub struct IbmGate {
    kind: OperationKind,
    name: &'static str,
    params: Vec<f64>,
}

impl IbmGate {
    /// Gate of `kind` with its stored parameters.
    pub fn new(kind: OperationKind, name: &'static str, params: &[f64]) -> Self {
        Self {
            kind,
            name,
            params: params.to_vec(),
        }
    }

    /// The X-controlled-by-N primitive, picked by synthesis mode.
    pub fn mcx(num_controls: usize, mode: McxMode) -> Self {
        let n = num_controls as f64;
        match mode {
            McxMode::NoAncilla => Self::new(OperationKind::Mcx, "mcx", &[n]),
            McxMode::Recursion => Self::new(OperationKind::McxRecursive, "mcx_recursive", &[n]),
            McxMode::VChain => Self::new(OperationKind::McxVchain, "mcx_vchain", &[n, 0.0]),
            McxMode::VChainDirty => Self::new(OperationKind::McxVchain, "mcx_vchain", &[n, 1.0]),
        }
    }

    /// Operation kind this gate realizes.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Qiskit instruction name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stored parameters, including control counts.
    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// Rotation angles only.
    pub fn angles(&self) -> &[f64] {
        match self.kind {
            OperationKind::Mcp => &self.params[..self.params.len().min(1)],
            _ if self.is_multi_controlled_x() => &[],
            _ => &self.params,
        }
    }

    /// Number of leading control operands.
    pub fn num_controls(&self) -> usize {
        leading_controls(self.kind, &self.params)
    }

    /// Whether this is one of the multi-controlled X instructions.
    pub fn is_multi_controlled_x(&self) -> bool {
        matches!(
            self.kind,
            OperationKind::Mcx
                | OperationKind::McxGrayCode
                | OperationKind::McxRecursive
                | OperationKind::McxVchain
        )
    }

    /// Matrix of the gate over its controls and targets.
    pub fn unitary(&self) -> IrResult<Unitary> {
        unitary_for(self.kind, &self.params)
    }
}

/// One entry of an [`IbmCircuit`].
#[derive(Debug, Clone, PartialEq)]
pub enum IbmInstruction {
    /// Gate on register positions, controls first.
    Gate {
        /// The gate.
        gate: IbmGate,
        /// Operands, ancillas last for the multi-controlled X family.
        qubits: Vec<u32>,
    },
    /// Measure `qubit` into classical bit `clbit`.
    Measure {
        /// Measured qubit.
        qubit: u32,
        /// Destination classical bit.
        clbit: u32,
    },
}

/// IBM native circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct IbmCircuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<IbmInstruction>,
}

impl IbmCircuit {
    /// Empty circuit with a `num_qubits` register and a `num_clbits` register.
    pub fn new(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            instructions: Vec::new(),
        }
    }

    /// Append a gate.
    pub fn append(&mut self, gate: IbmGate, qubits: Vec<u32>) {
        self.instructions.push(IbmInstruction::Gate { gate, qubits });
    }

    /// Append a measurement.
    pub fn measure(&mut self, qubit: u32, clbit: u32) {
        self.instructions.push(IbmInstruction::Measure { qubit, clbit });
    }

    /// Circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of the classical register.
    pub fn num_clbits(&self) -> u32 {
        self.num_clbits
    }

    /// Instructions in order.
    pub fn instructions(&self) -> &[IbmInstruction] {
        &self.instructions
    }

    /// Whether any instruction measures.
    pub fn has_measurements(&self) -> bool {
        self.instructions
            .iter()
            .any(|inst| matches!(inst, IbmInstruction::Measure { .. }))
    }
}

impl NativeCircuit for IbmCircuit {
    fn provider(&self) -> Provider {
        Provider::Ibm
    }

    fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    fn len(&self) -> usize {
        self.instructions.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mcx_modes() {
        let gate = IbmGate::mcx(3, McxMode::NoAncilla);
        assert_eq!(gate.name(), "mcx");
        assert_eq!(gate.num_controls(), 3);
        assert!(gate.is_multi_controlled_x());
        assert!(gate.angles().is_empty());

        let dirty = IbmGate::mcx(2, McxMode::VChainDirty);
        assert_eq!(dirty.kind(), OperationKind::McxVchain);
        assert_eq!(dirty.params(), &[2.0, 1.0]);
    }

    #[test]
    fn test_mcp_angles_drop_control_count() {
        let gate = IbmGate::new(OperationKind::Mcp, "mcphase", &[0.25, 2.0]);
        assert_eq!(gate.angles(), &[0.25]);
        assert_eq!(gate.num_controls(), 2);
        assert_eq!(gate.unitary().unwrap().num_qubits(), 3);
    }

    #[test]
    fn test_circuit_bookkeeping() {
        let mut circuit = IbmCircuit::new("bell", 2, 2);
        circuit.append(IbmGate::new(OperationKind::H, "h", &[]), vec![0]);
        assert!(!circuit.has_measurements());
        circuit.measure(0, 0);
        assert!(circuit.has_measurements());
        assert_eq!(circuit.len(), 2);
        assert_eq!(NativeCircuit::num_qubits(&circuit), 2);
        assert_eq!(circuit.provider(), Provider::Ibm);
    }
}
