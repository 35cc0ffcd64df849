//! IR to [`IbmCircuit`] translation.

use qcat_hal::{GateEntry, HalError, HalResult, validate_operation};
use qcat_ir::{Circuit, OperationKind};
use tracing::{debug, instrument};

use crate::gate_map::gate_map;
use crate::native::{IbmCircuit, IbmGate};

/// Translate `circuit` into an IBM circuit.
///
/// The classical register is widened to the qubit count when anything is
/// measured, so `measure(q)` and `measure_all` always have a bit to write.
#[instrument(skip(circuit), fields(qubits = circuit.num_qubits(), ops = circuit.len()))]
pub fn translate(circuit: &Circuit) -> HalResult<IbmCircuit> {
    let map = gate_map();
    let mut native = IbmCircuit::new(
        circuit.name(),
        circuit.num_qubits(),
        circuit.classical_width(),
    );

    for op in circuit.operations() {
        validate_operation(op)?;
        let qubits: Vec<u32> = op.qubits().map(|q| q.0).collect();

        match map.get(op.kind)? {
            GateEntry::Native(ctor) => native.append(ctor(&op.params), qubits),
            GateEntry::Custom(def) => {
                native.append(IbmGate::new(def.kind, def.name, &op.params), qubits);
            }
            GateEntry::Measure => {
                let Some(&qubit) = qubits.first() else {
                    return Err(HalError::InvalidCircuit("measure without a qubit".into()));
                };
                let clbit = op.classical_args.first().map_or(qubit, |c| c.0);
                native.measure(qubit, clbit);
            }
            GateEntry::MeasureAll => {
                for q in 0..circuit.num_qubits() {
                    native.measure(q, q);
                }
            }
            GateEntry::MultiControlledX => {
                let controls = op.control_count().unwrap_or(0);
                let mode = op.mode.unwrap_or_default();
                native.append(IbmGate::mcx(controls, mode), qubits);
            }
        }
    }

    debug!(
        "Translated {} operations into {} IBM instructions",
        circuit.len(),
        native.instructions().len()
    );
    Ok(native)
}

/// Whether the IBM gate map realizes `kind` with a Qiskit instruction.
pub fn is_native(kind: OperationKind) -> bool {
    matches!(gate_map().get(kind), Ok(GateEntry::Native(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::IbmInstruction;
    use qcat_ir::{ClbitId, McxMode, QubitId};

    #[test]
    fn test_bell_translation() {
        let circuit = Circuit::bell().unwrap();
        let native = translate(&circuit).unwrap();
        let names: Vec<&str> = native
            .instructions()
            .iter()
            .filter_map(|inst| match inst {
                IbmInstruction::Gate { gate, .. } => Some(gate.name()),
                IbmInstruction::Measure { .. } => None,
            })
            .collect();
        assert_eq!(names, vec!["h", "cx"]);
        assert_eq!(native.num_clbits(), 2);
        assert!(native.has_measurements());
    }

    #[test]
    fn test_measure_defaults_to_qubit_index() {
        let mut circuit = Circuit::new(3);
        circuit.measure(QubitId(2)).unwrap();
        let native = translate(&circuit).unwrap();
        assert_eq!(native.num_clbits(), 3);
        assert_eq!(
            native.instructions()[0],
            IbmInstruction::Measure { qubit: 2, clbit: 2 }
        );
    }

    #[test]
    fn test_measure_to_explicit_clbit() {
        let mut circuit = Circuit::with_size("c", 2, 4);
        circuit.measure_to(QubitId(0), ClbitId(3)).unwrap();
        let native = translate(&circuit).unwrap();
        assert_eq!(native.num_clbits(), 4);
        assert_eq!(
            native.instructions()[0],
            IbmInstruction::Measure { qubit: 0, clbit: 3 }
        );
    }

    #[test]
    fn test_no_measurement_keeps_register() {
        let mut circuit = Circuit::new(2);
        circuit.h(QubitId(0)).unwrap();
        assert_eq!(translate(&circuit).unwrap().num_clbits(), 0);
    }

    #[test]
    fn test_mct_uses_mode() {
        let mut circuit = Circuit::new(5);
        circuit
            .mct(
                &[QubitId(0), QubitId(1), QubitId(2)],
                QubitId(3),
                &[QubitId(4)],
                McxMode::VChain,
            )
            .unwrap();
        let native = translate(&circuit).unwrap();
        let IbmInstruction::Gate { gate, qubits } = &native.instructions()[0] else {
            panic!("expected a gate");
        };
        assert_eq!(gate.name(), "mcx_vchain");
        assert_eq!(gate.num_controls(), 3);
        assert_eq!(qubits, &vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_translation_is_deterministic() {
        let mut circuit = Circuit::new(3);
        circuit
            .u(0.1, 0.2, 0.3, QubitId(0))
            .unwrap()
            .rzx(0.4, QubitId(1), QubitId(2))
            .unwrap()
            .measure_all()
            .unwrap();
        assert_eq!(translate(&circuit).unwrap(), translate(&circuit).unwrap());
    }

    #[test]
    fn test_every_gate_kind_is_native() {
        assert!(is_native(OperationKind::Ecr));
        assert!(is_native(OperationKind::Rc3x));
        assert!(!is_native(OperationKind::Mct));
    }
}
