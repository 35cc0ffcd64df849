//! Braket-style native circuit.
//!
//! Instructions address qubits by integer position. Gates outside Braket's
//! gate set carry their matrix and are submitted as unitary pragmas.
//! Measurements are `Probability` result types, which Braket reads out at
//! the end of the circuit. Each measurement also records the classical bit
//! it writes and where it sits among the instructions, so local runs can
//! replay mid-circuit measurements in program order.

use std::any::Any;

use qcat_hal::{HalResult, NativeCircuit, Provider, leading_controls};
use qcat_ir::{OperationKind, Unitary, unitary_for};

/// Gate applied by a [`BraketInstruction`].
#[derive(Debug, Clone, PartialEq)]
pub enum BraketGate {
    /// A gate from Braket's gate set.
    Named {
        /// Operation kind it realizes.
        kind: OperationKind,
        /// Braket's name for it.
        name: &'static str,
        /// Angles.
        params: Vec<f64>,
    },
    /// Gate given by its matrix.
    Unitary {
        /// Operation kind it realizes.
        kind: OperationKind,
        /// Display name.
        name: &'static str,
        /// Stored parameters.
        params: Vec<f64>,
        /// The matrix, controls first.
        matrix: Unitary,
    },
}

impl BraketGate {
    /// A gate-set gate.
    pub fn named(kind: OperationKind, name: &'static str, params: &[f64]) -> Self {
        Self::Named {
            kind,
            name,
            params: params.to_vec(),
        }
    }

    /// Operation kind.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Named { kind, .. } | Self::Unitary { kind, .. } => *kind,
        }
    }

    /// Braket or display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Named { name, .. } | Self::Unitary { name, .. } => name,
        }
    }

    /// Stored parameters.
    pub fn params(&self) -> &[f64] {
        match self {
            Self::Named { params, .. } | Self::Unitary { params, .. } => params,
        }
    }

    /// Number of leading control operands.
    pub fn num_controls(&self) -> usize {
        match self {
            Self::Unitary {
                kind: OperationKind::Mct,
                matrix,
                ..
            } => matrix.num_qubits().saturating_sub(1),
            _ => leading_controls(self.kind(), self.params()),
        }
    }

    /// The gate's matrix.
    pub fn unitary(&self) -> HalResult<Unitary> {
        match self {
            Self::Named { kind, params, .. } => Ok(unitary_for(*kind, params)?),
            Self::Unitary { matrix, .. } => Ok(matrix.clone()),
        }
    }
}

/// A gate on target qubits, controls first.
#[derive(Debug, Clone, PartialEq)]
pub struct BraketInstruction {
    /// The gate.
    pub gate: BraketGate,
    /// Operand positions.
    pub target: Vec<usize>,
}

/// Result type requested from the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultType {
    /// Outcome probabilities of `targets`.
    Probability {
        /// Measured qubits.
        targets: Vec<usize>,
    },
}

/// A measurement of one qubit into one classical bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    /// Measured qubit.
    pub qubit: usize,
    /// Classical bit written.
    pub clbit: usize,
    /// Number of instructions that precede the measurement.
    pub position: usize,
}

/// Braket native circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct BraketCircuit {
    num_qubits: usize,
    num_clbits: usize,
    instructions: Vec<BraketInstruction>,
    result_types: Vec<ResultType>,
    measurements: Vec<Measurement>,
}

impl BraketCircuit {
    /// Empty circuit over `num_qubits` qubits and `num_clbits` classical bits.
    pub fn new(num_qubits: usize, num_clbits: usize) -> Self {
        Self {
            num_qubits,
            num_clbits,
            instructions: Vec::new(),
            result_types: Vec::new(),
            measurements: Vec::new(),
        }
    }

    /// Append a gate.
    pub fn add_instruction(&mut self, gate: BraketGate, target: Vec<usize>) {
        self.instructions.push(BraketInstruction { gate, target });
    }

    /// Measure each `(qubit, clbit)` pair at the current point of the
    /// circuit, requested as one `Probability` result type.
    ///
    /// The classical register grows to hold every written bit.
    pub fn add_measurement(&mut self, pairs: &[(usize, usize)]) {
        let position = self.instructions.len();
        for &(qubit, clbit) in pairs {
            self.num_clbits = self.num_clbits.max(clbit + 1);
            self.measurements.push(Measurement {
                qubit,
                clbit,
                position,
            });
        }
        self.result_types.push(ResultType::Probability {
            targets: pairs.iter().map(|&(qubit, _)| qubit).collect(),
        });
    }

    /// Width of a sampled bitstring.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Gates in order.
    pub fn instructions(&self) -> &[BraketInstruction] {
        &self.instructions
    }

    /// Requested result types.
    pub fn result_types(&self) -> &[ResultType] {
        &self.result_types
    }

    /// Measurements in program order.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Whether anything is measured.
    pub fn has_measurements(&self) -> bool {
        !self.measurements.is_empty()
    }

    /// Measured qubits, ascending and deduplicated.
    pub fn measured_qubits(&self) -> Vec<usize> {
        let mut qubits: Vec<usize> = self.measurements.iter().map(|m| m.qubit).collect();
        qubits.sort_unstable();
        qubits.dedup();
        qubits
    }

    /// Whether some gate acts on a qubit after that qubit was measured.
    ///
    /// Braket devices only read out at the end, so such a circuit can only
    /// run on the local simulator.
    pub fn has_mid_circuit_measurement(&self) -> bool {
        self.measurements.iter().any(|m| {
            self.instructions[m.position..]
                .iter()
                .any(|inst| inst.target.contains(&m.qubit))
        })
    }

    /// `(clbit, qubit)` for every classical bit, holding the qubit that
    /// wrote it last. Bits nobody writes are absent.
    pub fn readout_map(&self) -> Vec<(usize, usize)> {
        let mut last: Vec<Option<usize>> = vec![None; self.num_clbits];
        for m in &self.measurements {
            last[m.clbit] = Some(m.qubit);
        }
        last.into_iter()
            .enumerate()
            .filter_map(|(clbit, qubit)| qubit.map(|q| (clbit, q)))
            .collect()
    }
}

impl NativeCircuit for BraketCircuit {
    fn provider(&self) -> Provider {
        Provider::Braket
    }

    fn num_qubits(&self) -> u32 {
        u32::try_from(self.num_qubits).unwrap_or(u32::MAX)
    }

    fn len(&self) -> usize {
        self.instructions.len() + self.result_types.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat_ir::mct_unitary;

    #[test]
    fn test_measurement_table() {
        let mut circuit = BraketCircuit::new(3, 0);
        assert!(!circuit.has_measurements());

        circuit.add_instruction(BraketGate::named(OperationKind::X, "x", &[]), vec![0]);
        circuit.add_measurement(&[(2, 0)]);
        circuit.add_measurement(&[(0, 2), (2, 1)]);
        assert_eq!(circuit.measured_qubits(), vec![0, 2]);
        assert_eq!(circuit.num_clbits(), 3);
        assert_eq!(circuit.readout_map(), vec![(0, 2), (1, 2), (2, 0)]);
        assert_eq!(circuit.result_types().len(), 2);
        assert!(circuit.measurements().iter().all(|m| m.position == 1));
        assert!(!circuit.has_mid_circuit_measurement());
    }

    #[test]
    fn test_mid_circuit_detection() {
        let mut circuit = BraketCircuit::new(2, 2);
        circuit.add_measurement(&[(0, 0)]);
        circuit.add_instruction(BraketGate::named(OperationKind::X, "x", &[]), vec![1]);
        assert!(!circuit.has_mid_circuit_measurement());

        circuit.add_instruction(BraketGate::named(OperationKind::X, "x", &[]), vec![0]);
        assert!(circuit.has_mid_circuit_measurement());
    }

    #[test]
    fn test_gate_controls() {
        let cnot = BraketGate::named(OperationKind::Cx, "cnot", &[]);
        assert_eq!(cnot.num_controls(), 1);
        let mct = BraketGate::Unitary {
            kind: OperationKind::Mct,
            name: "mct",
            params: vec![],
            matrix: mct_unitary(3).unwrap(),
        };
        assert_eq!(mct.num_controls(), 3);
    }

    #[test]
    fn test_named_unitary() {
        let rx = BraketGate::named(OperationKind::Rx, "rx", &[0.3]);
        assert!(rx.unitary().unwrap().approx_eq(&Unitary::rx(0.3), 1e-12));
    }
}
