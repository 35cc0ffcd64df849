//! IR to [`BraketCircuit`] translation.

use qcat_hal::{GateEntry, HalResult, validate_operation};
use qcat_ir::{Circuit, QubitId, mct_unitary};
use tracing::{debug, instrument};

use crate::gate_map::gate_map;
use crate::native::{BraketCircuit, BraketGate};

fn positions(qubits: impl IntoIterator<Item = QubitId>) -> Vec<usize> {
    qubits.into_iter().map(|q| q.0 as usize).collect()
}

/// Translate `circuit` into a Braket circuit.
///
/// A measurement without a classical bit writes the bit named after its
/// qubit, as `measure_all` does for every qubit.
#[instrument(skip(circuit), fields(qubits = circuit.num_qubits(), ops = circuit.len()))]
pub fn translate(circuit: &Circuit) -> HalResult<BraketCircuit> {
    let map = gate_map();
    let mut native = BraketCircuit::new(
        circuit.num_qubits() as usize,
        circuit.classical_width() as usize,
    );

    for op in circuit.operations() {
        validate_operation(op)?;

        match map.get(op.kind)? {
            GateEntry::Native(ctor) => {
                native.add_instruction(ctor(&op.params), positions(op.qubits()));
            }
            GateEntry::Custom(def) => {
                let gate = BraketGate::Unitary {
                    kind: def.kind,
                    name: def.name,
                    params: op.params.clone(),
                    matrix: def.unitary(&op.params)?,
                };
                native.add_instruction(gate, positions(op.gate_qubits()));
            }
            GateEntry::Measure => {
                let pairs: Vec<(usize, usize)> = op
                    .qubits()
                    .zip(0..)
                    .map(|(q, k)| {
                        let clbit = op.classical_args.get(k).map_or(q.0, |c| c.0);
                        (q.0 as usize, clbit as usize)
                    })
                    .collect();
                native.add_measurement(&pairs);
            }
            GateEntry::MeasureAll => {
                let pairs: Vec<(usize, usize)> =
                    (0..circuit.num_qubits() as usize).map(|q| (q, q)).collect();
                native.add_measurement(&pairs);
            }
            GateEntry::MultiControlledX => {
                let gate = BraketGate::Unitary {
                    kind: op.kind,
                    name: "mct",
                    params: Vec::new(),
                    matrix: mct_unitary(op.control_count().unwrap_or(0))?,
                };
                native.add_instruction(gate, positions(op.gate_qubits()));
            }
        }
    }

    debug!("Translated {} operations for Braket", circuit.len());
    Ok(native)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat_hal::HalError;
    use qcat_ir::{ClbitId, IrError, McxMode, Operation, OperationKind};

    #[test]
    fn test_bell_translation() {
        let native = translate(&Circuit::bell().unwrap()).unwrap();
        let inst = native.instructions();
        assert_eq!(inst.len(), 2);
        assert_eq!(inst[0].gate.name(), "h");
        assert_eq!(inst[1].gate.name(), "cnot");
        assert_eq!(inst[1].target, vec![0, 1]);
        assert_eq!(native.measured_qubits(), vec![0, 1]);
        assert_eq!(native.readout_map(), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_measure_to_keeps_clbit() {
        let mut circuit = Circuit::with_size("m", 1, 2);
        circuit.x(QubitId(0)).unwrap().measure_to(QubitId(0), ClbitId(1)).unwrap();
        let native = translate(&circuit).unwrap();
        assert_eq!(native.num_clbits(), 2);
        assert_eq!(native.readout_map(), vec![(1, 0)]);
        assert_eq!(native.measurements()[0].position, 1);
    }

    #[test]
    fn test_wide_mct_is_an_error() {
        let mut circuit = Circuit::new(70);
        let controls: Vec<QubitId> = (0..64).map(QubitId).collect();
        circuit
            .mct(&controls, QubitId(65), &[], McxMode::NoAncilla)
            .unwrap();
        let err = translate(&circuit).unwrap_err();
        assert!(matches!(err, HalError::Ir(IrError::MatrixTooLarge { num_qubits: 65, .. })));
    }

    #[test]
    fn test_custom_gate_drops_ancillas() {
        let mut circuit = Circuit::new(4);
        circuit
            .mcx_vchain(&[QubitId(0), QubitId(1)], QubitId(2), &[QubitId(3)], false)
            .unwrap();
        let native = translate(&circuit).unwrap();
        let inst = &native.instructions()[0];
        assert!(matches!(inst.gate, BraketGate::Unitary { kind: OperationKind::McxVchain, .. }));
        assert_eq!(inst.target, vec![0, 1, 2]);
        assert_eq!(inst.gate.unitary().unwrap().num_qubits(), 3);
    }

    #[test]
    fn test_mct_is_dense_unitary() {
        let mut circuit = Circuit::new(4);
        circuit
            .mct(&[QubitId(3), QubitId(1)], QubitId(0), &[QubitId(2)], McxMode::NoAncilla)
            .unwrap();
        let native = translate(&circuit).unwrap();
        let inst = &native.instructions()[0];
        assert_eq!(inst.gate.name(), "mct");
        assert_eq!(inst.target, vec![3, 1, 0]);
        assert_eq!(inst.gate.num_controls(), 2);
    }

    #[test]
    fn test_duplicate_operands_rejected() {
        let mut circuit = Circuit::new(2);
        circuit
            .append(Operation::new(
                OperationKind::Cx,
                vec![vec![QubitId(1)], vec![QubitId(1)]],
                vec![],
            ))
            .unwrap();
        let err = translate(&circuit).unwrap_err();
        assert!(matches!(err, HalError::InvalidCircuit(_)));
    }

    #[test]
    fn test_translation_is_deterministic() {
        let mut circuit = Circuit::new(3);
        circuit
            .u(0.1, 0.2, 0.3, QubitId(0))
            .unwrap()
            .rzz(0.4, QubitId(1), QubitId(2))
            .unwrap()
            .measure_all()
            .unwrap();
        assert_eq!(translate(&circuit).unwrap(), translate(&circuit).unwrap());
    }
}
