//! High-level circuit builder API.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::operation::{McxMode, Operation, OperationKind};
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit: a fixed-size register and an append-only list of
/// operations in program order.
///
/// Every builder method validates its qubit (and classical bit) indices
/// before appending, so a failed call leaves the circuit untouched. Methods
/// return `&mut Self` for chaining with `?`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    operations: Vec<Operation>,
}

impl Circuit {
    /// Create an empty circuit with `num_qubits` qubits and no classical bits.
    ///
    /// A zero-qubit circuit is a valid empty register: every gate and
    /// measurement appended to it fails with [`IrError::QubitOutOfBounds`].
    pub fn new(num_qubits: u32) -> Self {
        Self::with_size("circuit", num_qubits, 0)
    }

    /// Create an empty circuit with a name, qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            operations: vec![],
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Declared number of classical bits.
    pub fn num_clbits(&self) -> u32 {
        self.num_clbits
    }

    /// Operations in program order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether no operation has been appended.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Whether any measurement has been appended.
    pub fn has_measurements(&self) -> bool {
        self.operations.iter().any(Operation::is_measurement)
    }

    /// Width of a sampled bitstring.
    ///
    /// Measurements without an explicit classical bit write the slot named
    /// after their qubit, so once anything is measured the register is at
    /// least `num_qubits` wide.
    pub fn classical_width(&self) -> u32 {
        if self.has_measurements() {
            self.num_clbits.max(self.num_qubits)
        } else {
            self.num_clbits
        }
    }

    /// Number of operations of each kind.
    pub fn count_ops(&self) -> FxHashMap<OperationKind, usize> {
        let mut counts = FxHashMap::default();
        for op in &self.operations {
            *counts.entry(op.kind).or_insert(0) += 1;
        }
        counts
    }

    // =========================================================================
    // Appending
    // =========================================================================

    fn check_qubit(&self, qubit: QubitId, operation: OperationKind) -> IrResult<()> {
        if qubit.0 >= self.num_qubits {
            return Err(IrError::QubitOutOfBounds {
                qubit,
                num_qubits: self.num_qubits,
                operation,
            });
        }
        Ok(())
    }

    fn check_clbit(&self, clbit: ClbitId, operation: OperationKind) -> IrResult<()> {
        if clbit.0 >= self.num_clbits {
            return Err(IrError::ClbitOutOfBounds {
                clbit,
                num_clbits: self.num_clbits,
                operation,
            });
        }
        Ok(())
    }

    /// Validate and append a prepared operation.
    pub fn append(&mut self, operation: Operation) -> IrResult<&mut Self> {
        for qubit in operation.qubits() {
            self.check_qubit(qubit, operation.kind)?;
        }
        for clbit in &operation.classical_args {
            self.check_clbit(*clbit, operation.kind)?;
        }
        self.operations.push(operation);
        Ok(self)
    }

    fn gate(
        &mut self,
        kind: OperationKind,
        qubits: &[QubitId],
        params: Vec<f64>,
    ) -> IrResult<&mut Self> {
        let groups = qubits.iter().map(|q| vec![*q]).collect();
        self.append(Operation::new(kind, groups, params))
    }

    fn multi_controlled(
        &mut self,
        kind: OperationKind,
        controls: &[QubitId],
        target: QubitId,
        ancillas: &[QubitId],
        params: Vec<f64>,
    ) -> IrResult<&mut Self> {
        if controls.is_empty() {
            return Err(IrError::InvalidControlCount(kind));
        }
        let mut flat = controls.to_vec();
        flat.push(target);
        flat.extend_from_slice(ancillas);
        self.append(Operation::new(kind, vec![flat], params))
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::X, &[qubit], vec![])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Y, &[qubit], vec![])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Z, &[qubit], vec![])
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::H, &[qubit], vec![])
    }

    /// Apply identity gate.
    pub fn i(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::I, &[qubit], vec![])
    }

    /// Apply S gate (sqrt(Z)).
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::S, &[qubit], vec![])
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Sdg, &[qubit], vec![])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::T, &[qubit], vec![])
    }

    /// Apply T-dagger gate.
    pub fn td(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Td, &[qubit], vec![])
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Sx, &[qubit], vec![])
    }

    /// Apply sqrt(X)-dagger gate.
    pub fn sxd(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Sxd, &[qubit], vec![])
    }

    /// Apply RX rotation.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Rx, &[qubit], vec![theta])
    }

    /// Apply RY rotation.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Ry, &[qubit], vec![theta])
    }

    /// Apply RZ rotation.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Rz, &[qubit], vec![theta])
    }

    /// Apply rotation `theta` about the `cos(phi) X + sin(phi) Y` axis.
    pub fn r(&mut self, theta: f64, phi: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::R, &[qubit], vec![theta, phi])
    }

    /// Apply phase gate.
    pub fn p(&mut self, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::P, &[qubit], vec![lambda])
    }

    /// Apply U gate.
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::U, &[qubit], vec![theta, phi, lambda])
    }

    /// Apply U1 gate.
    pub fn u1(&mut self, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::U1, &[qubit], vec![lambda])
    }

    /// Apply U2 gate.
    pub fn u2(&mut self, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::U2, &[qubit], vec![phi, lambda])
    }

    /// Apply U3 gate.
    pub fn u3(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::U3, &[qubit], vec![theta, phi, lambda])
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Cx, &[control, target], vec![])
    }

    /// Apply controlled-Y gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Cy, &[control, target], vec![])
    }

    /// Apply controlled-Z gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Cz, &[control, target], vec![])
    }

    /// Apply controlled-Hadamard gate.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Ch, &[control, target], vec![])
    }

    /// Apply controlled-sqrt(X) gate.
    pub fn csx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Csx, &[control, target], vec![])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Swap, &[q1, q2], vec![])
    }

    /// Apply iSWAP gate.
    pub fn iswap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Iswap, &[q1, q2], vec![])
    }

    /// Apply double-CNOT gate.
    pub fn dcx(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Dcx, &[q1, q2], vec![])
    }

    /// Apply echoed cross-resonance gate.
    pub fn ecr(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Ecr, &[q1, q2], vec![])
    }

    /// Apply XX rotation.
    pub fn rxx(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Rxx, &[q1, q2], vec![theta])
    }

    /// Apply YY rotation.
    pub fn ryy(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Ryy, &[q1, q2], vec![theta])
    }

    /// Apply ZZ rotation.
    pub fn rzz(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Rzz, &[q1, q2], vec![theta])
    }

    /// Apply ZX rotation (Z on `q1`, X on `q2`).
    pub fn rzx(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Rzx, &[q1, q2], vec![theta])
    }

    /// Apply controlled RX.
    pub fn crx(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Crx, &[control, target], vec![theta])
    }

    /// Apply controlled RY.
    pub fn cry(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Cry, &[control, target], vec![theta])
    }

    /// Apply controlled RZ.
    pub fn crz(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Crz, &[control, target], vec![theta])
    }

    /// Apply controlled phase.
    pub fn cphase(&mut self, lambda: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Cphase, &[control, target], vec![lambda])
    }

    /// Apply controlled U1.
    pub fn cu1(&mut self, lambda: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Cu1, &[control, target], vec![lambda])
    }

    /// Apply controlled U3.
    pub fn cu3(
        &mut self,
        theta: f64,
        phi: f64,
        lambda: f64,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(OperationKind::Cu3, &[control, target], vec![theta, phi, lambda])
    }

    /// Apply controlled U with a global phase `gamma` on the active block.
    pub fn cu(
        &mut self,
        theta: f64,
        phi: f64,
        lambda: f64,
        gamma: f64,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(
            OperationKind::Cu,
            &[control, target],
            vec![theta, phi, lambda, gamma],
        )
    }

    // =========================================================================
    // Three-qubit and wider gates
    // =========================================================================

    /// Apply Toffoli gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Ccx, &[c1, c2, target], vec![])
    }

    /// Apply Toffoli up to relative phases.
    pub fn rccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Rccx, &[c1, c2, target], vec![])
    }

    /// Apply Fredkin (controlled-SWAP) gate.
    pub fn cswap(&mut self, control: QubitId, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Cswap, &[control, q1, q2], vec![])
    }

    /// Apply three-controlled X.
    pub fn c3x(
        &mut self,
        c1: QubitId,
        c2: QubitId,
        c3: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(OperationKind::C3x, &[c1, c2, c3, target], vec![])
    }

    /// Apply three-controlled sqrt(X).
    pub fn c3sx(
        &mut self,
        c1: QubitId,
        c2: QubitId,
        c3: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(OperationKind::C3sx, &[c1, c2, c3, target], vec![])
    }

    /// Apply three-controlled X up to relative phases.
    pub fn rc3x(
        &mut self,
        c1: QubitId,
        c2: QubitId,
        c3: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(OperationKind::Rc3x, &[c1, c2, c3, target], vec![])
    }

    /// Apply four-controlled X.
    pub fn c4x(
        &mut self,
        c1: QubitId,
        c2: QubitId,
        c3: QubitId,
        c4: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(OperationKind::C4x, &[c1, c2, c3, c4, target], vec![])
    }

    // =========================================================================
    // Multi-controlled gates
    // =========================================================================

    /// Apply X to `target` controlled by every qubit in `controls`.
    pub fn mcx(&mut self, controls: &[QubitId], target: QubitId) -> IrResult<&mut Self> {
        let n = controls.len() as f64;
        self.multi_controlled(OperationKind::Mcx, controls, target, &[], vec![n])
    }

    /// Multi-controlled X synthesized with a Gray-code sequence.
    pub fn mcx_gray_code(&mut self, controls: &[QubitId], target: QubitId) -> IrResult<&mut Self> {
        let n = controls.len() as f64;
        self.multi_controlled(OperationKind::McxGrayCode, controls, target, &[], vec![n])
    }

    /// Multi-controlled X synthesized recursively, with an optional ancilla.
    pub fn mcx_recursive(
        &mut self,
        controls: &[QubitId],
        target: QubitId,
        ancilla: Option<QubitId>,
    ) -> IrResult<&mut Self> {
        let n = controls.len() as f64;
        let ancillas: Vec<QubitId> = ancilla.into_iter().collect();
        self.multi_controlled(OperationKind::McxRecursive, controls, target, &ancillas, vec![n])
    }

    /// Multi-controlled X synthesized as a V-chain over `ancillas`.
    pub fn mcx_vchain(
        &mut self,
        controls: &[QubitId],
        target: QubitId,
        ancillas: &[QubitId],
        dirty_ancillas: bool,
    ) -> IrResult<&mut Self> {
        let params = vec![controls.len() as f64, f64::from(u8::from(dirty_ancillas))];
        self.multi_controlled(OperationKind::McxVchain, controls, target, ancillas, params)
    }

    /// Apply phase `lambda` to `target` controlled by every qubit in `controls`.
    pub fn mcp(
        &mut self,
        lambda: f64,
        controls: &[QubitId],
        target: QubitId,
    ) -> IrResult<&mut Self> {
        let params = vec![lambda, controls.len() as f64];
        self.multi_controlled(OperationKind::Mcp, controls, target, &[], params)
    }

    /// Multi-controlled Toffoli with explicit ancillas and decomposition mode.
    pub fn mct(
        &mut self,
        controls: &[QubitId],
        target: QubitId,
        ancillas: &[QubitId],
        mode: McxMode,
    ) -> IrResult<&mut Self> {
        if controls.is_empty() {
            return Err(IrError::InvalidControlCount(OperationKind::Mct));
        }
        let op = Operation::new(
            OperationKind::Mct,
            vec![controls.to_vec(), vec![target], ancillas.to_vec()],
            vec![],
        )
        .with_mode(mode);
        self.append(op)
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Measure a qubit without naming a classical bit.
    pub fn measure(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(OperationKind::Measure, &[qubit], vec![])
    }

    /// Measure a qubit into a classical bit.
    pub fn measure_to(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        let op = Operation::new(OperationKind::Measure, vec![vec![qubit]], vec![])
            .with_classical(vec![clbit]);
        self.append(op)
    }

    /// Measure every qubit, in index order, into equally-indexed classical bits.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        self.check_qubit(QubitId(0), OperationKind::MeasureAll)?;
        self.append(Operation::new(OperationKind::MeasureAll, vec![], vec![]))
    }

    // =========================================================================
    // Composite helpers
    // =========================================================================

    /// Put a qubit into equal superposition.
    pub fn superposition(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.h(qubit)
    }

    /// Entangle two qubits into a Bell pair.
    pub fn entangle(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.check_qubit(q2, OperationKind::Cx)?;
        self.h(q1)?.cx(q1, q2)
    }

    /// Prepare `|->` on a qubit for phase kickback.
    pub fn phase_kickback(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.x(qubit)?.h(qubit)
    }

    // =========================================================================
    // Prebuilt circuits
    // =========================================================================

    /// Bell state circuit with measurements.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        circuit
            .h(QubitId(0))?
            .cx(QubitId(0), QubitId(1))?
            .measure_all()?;
        Ok(circuit)
    }

    /// GHZ state circuit on `n` qubits with measurements.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size(format!("ghz_{n}"), n, n);
        circuit.h(QubitId(0))?;
        for i in 1..n {
            circuit.cx(QubitId(i - 1), QubitId(i))?;
        }
        circuit.measure_all()?;
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_circuit() {
        let circuit = Circuit::bell().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        let kinds: Vec<_> = circuit.operations().iter().map(|op| op.kind).collect();
        assert_eq!(
            kinds,
            vec![OperationKind::H, OperationKind::Cx, OperationKind::MeasureAll]
        );
    }

    #[test]
    fn test_ghz_circuit() {
        let circuit = Circuit::ghz(5).unwrap();
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.count_ops()[&OperationKind::Cx], 4);
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_size("test", 2, 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure_to(QubitId(0), ClbitId(0))
            .unwrap()
            .measure_to(QubitId(1), ClbitId(1))
            .unwrap();

        assert_eq!(circuit.len(), 4);
        assert!(circuit.has_measurements());
    }

    #[test]
    fn test_controlled_gate_layout() {
        let mut circuit = Circuit::new(3);
        circuit.cx(QubitId(2), QubitId(0)).unwrap();
        let op = &circuit.operations()[0];
        assert_eq!(op.qubit_args, vec![vec![QubitId(2)], vec![QubitId(0)]]);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut circuit = Circuit::new(2);
        let err = circuit.cx(QubitId(0), QubitId(2)).unwrap_err();
        assert_eq!(
            err,
            IrError::QubitOutOfBounds {
                qubit: QubitId(2),
                num_qubits: 2,
                operation: OperationKind::Cx,
            }
        );
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_control_of_cz_is_checked() {
        let mut circuit = Circuit::new(2);
        assert!(circuit.cz(QubitId(5), QubitId(1)).is_err());
        assert!(circuit.cz(QubitId(0), QubitId(5)).is_err());
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_measure_to_checks_clbit() {
        let mut circuit = Circuit::new(2);
        assert!(matches!(
            circuit.measure_to(QubitId(0), ClbitId(0)),
            Err(IrError::ClbitOutOfBounds { .. })
        ));

        let mut circuit = Circuit::with_size("c", 2, 1);
        circuit.measure_to(QubitId(1), ClbitId(0)).unwrap();
        assert_eq!(circuit.operations()[0].classical_args, vec![ClbitId(0)]);
    }

    #[test]
    fn test_measure_twice_is_legal() {
        let mut circuit = Circuit::new(1);
        circuit.measure(QubitId(0)).unwrap().measure(QubitId(0)).unwrap();
        assert_eq!(circuit.len(), 2);
    }

    #[test]
    fn test_empty_register_rejects_everything() {
        let mut circuit = Circuit::new(0);
        assert!(matches!(
            circuit.h(QubitId(0)),
            Err(IrError::QubitOutOfBounds { num_qubits: 0, .. })
        ));
        assert!(matches!(
            circuit.measure_all(),
            Err(IrError::QubitOutOfBounds { operation: OperationKind::MeasureAll, .. })
        ));
        assert!(circuit.is_empty());
        assert_eq!(circuit.classical_width(), 0);
    }

    #[test]
    fn test_classical_width() {
        let mut circuit = Circuit::with_size("w", 3, 2);
        assert_eq!(circuit.classical_width(), 2);
        circuit.measure_to(QubitId(0), ClbitId(1)).unwrap();
        assert_eq!(circuit.classical_width(), 3);

        let mut wide = Circuit::with_size("w", 2, 5);
        wide.measure(QubitId(1)).unwrap();
        assert_eq!(wide.classical_width(), 5);
    }

    #[test]
    fn test_mcx_layout() {
        let mut circuit = Circuit::new(5);
        circuit
            .mcx_vchain(&[QubitId(0), QubitId(1), QubitId(2)], QubitId(3), &[QubitId(4)], true)
            .unwrap();
        let op = &circuit.operations()[0];
        assert_eq!(op.qubit_args.len(), 1);
        assert_eq!(op.params, vec![3.0, 1.0]);
        assert_eq!(op.control_count(), Some(3));
        assert_eq!(op.ancillas(), vec![QubitId(4)]);
    }

    #[test]
    fn test_mct_checks_every_group() {
        let mut circuit = Circuit::new(3);
        assert!(
            circuit
                .mct(&[QubitId(0), QubitId(7)], QubitId(2), &[], McxMode::NoAncilla)
                .is_err()
        );
        assert!(
            circuit
                .mct(&[QubitId(0)], QubitId(1), &[QubitId(9)], McxMode::Recursion)
                .is_err()
        );
        assert!(matches!(
            circuit.mct(&[], QubitId(1), &[], McxMode::NoAncilla),
            Err(IrError::InvalidControlCount(OperationKind::Mct))
        ));
        assert!(circuit.is_empty());

        circuit
            .mct(&[QubitId(0), QubitId(1)], QubitId(2), &[], McxMode::VChain)
            .unwrap();
        assert_eq!(circuit.operations()[0].mode, Some(McxMode::VChain));
    }

    #[test]
    fn test_entangle_is_atomic() {
        let mut circuit = Circuit::new(2);
        assert!(circuit.entangle(QubitId(0), QubitId(3)).is_err());
        assert!(circuit.is_empty());
        circuit.entangle(QubitId(0), QubitId(1)).unwrap();
        assert_eq!(circuit.len(), 2);
    }

    #[test]
    fn test_phase_kickback() {
        let mut circuit = Circuit::new(1);
        circuit.phase_kickback(QubitId(0)).unwrap();
        let kinds: Vec<_> = circuit.operations().iter().map(|op| op.kind).collect();
        assert_eq!(kinds, vec![OperationKind::X, OperationKind::H]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let circuit = Circuit::bell().unwrap();
        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }
}
