//! IR to [`CirqCircuit`] translation.

use qcat_hal::{GateEntry, HalError, HalResult, validate_operation};
use qcat_ir::{Circuit, QubitId};
use tracing::{debug, instrument};

use crate::gate_map::gate_map;
use crate::native::{CirqCircuit, CirqGate, CirqOperation, NamedQubit};

/// Key of the single measurement emitted for `measure_all`.
pub const MEASURE_ALL_KEY: &str = "result";

/// Label of the qubit at register position `index`.
pub fn qubit_label(index: u32) -> String {
    format!("q{index}")
}

fn resolve(qubits: &[NamedQubit], qubit: QubitId) -> HalResult<NamedQubit> {
    let label = qubit_label(qubit.0);
    qubits
        .iter()
        .find(|q| q.name() == label)
        .cloned()
        .ok_or_else(|| HalError::Backend(format!("no named qubit labelled '{label}'")))
}

fn resolve_all(
    qubits: &[NamedQubit],
    ids: impl IntoIterator<Item = QubitId>,
) -> HalResult<Vec<NamedQubit>> {
    ids.into_iter().map(|q| resolve(qubits, q)).collect()
}

/// Translate `circuit` into a Cirq-style circuit over `q0..q{n-1}`.
#[instrument(skip(circuit), fields(qubits = circuit.num_qubits(), ops = circuit.len()))]
pub fn translate(circuit: &Circuit) -> HalResult<CirqCircuit> {
    let map = gate_map();
    let qubits: Vec<NamedQubit> = (0..circuit.num_qubits())
        .map(|i| NamedQubit::new(qubit_label(i)))
        .collect();
    let mut native = CirqCircuit::new(qubits.clone(), circuit.classical_width() as usize);

    for op in circuit.operations() {
        validate_operation(op)?;

        let operation = match map.get(op.kind)? {
            GateEntry::Native(ctor) => CirqOperation::Gate {
                gate: ctor(&op.params),
                qubits: resolve_all(&qubits, op.qubits())?,
            },
            GateEntry::Custom(def) => CirqOperation::Gate {
                gate: CirqGate::Matrix {
                    kind: def.kind,
                    name: def.name,
                    params: op.params.clone(),
                    unitary: def.unitary(&op.params)?,
                },
                qubits: resolve_all(&qubits, op.gate_qubits())?,
            },
            GateEntry::Measure => {
                let targets = resolve_all(&qubits, op.qubits())?;
                let index = match op.classical_args.first() {
                    Some(clbit) => clbit.0,
                    None => op.qubits().next().map_or(0, |q| q.0),
                };
                CirqOperation::Measure {
                    qubits: targets,
                    key: format!("c{index}"),
                }
            }
            GateEntry::MeasureAll => CirqOperation::Measure {
                qubits: qubits.clone(),
                key: MEASURE_ALL_KEY.to_string(),
            },
            GateEntry::MultiControlledX => CirqOperation::Gate {
                gate: CirqGate::ControlledX {
                    num_controls: op.control_count().unwrap_or(0),
                },
                qubits: resolve_all(&qubits, op.gate_qubits())?,
            },
        };
        native.append(operation);
    }

    debug!("Translated {} operations for Google", circuit.len());
    Ok(native)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat_ir::{ClbitId, McxMode, OperationKind};

    #[test]
    fn test_bell_translation() {
        let native = translate(&Circuit::bell().unwrap()).unwrap();
        let ops = native.operations();
        assert_eq!(ops.len(), 3);
        assert!(matches!(
            &ops[1],
            CirqOperation::Gate { gate: CirqGate::Named { name: "CNOT", .. }, qubits }
                if qubits[0].name() == "q0" && qubits[1].name() == "q1"
        ));
        assert!(matches!(
            &ops[2],
            CirqOperation::Measure { qubits, key } if qubits.len() == 2 && key == "result"
        ));
    }

    #[test]
    fn test_measure_keys() {
        let mut circuit = Circuit::with_size("m", 3, 3);
        circuit
            .measure(QubitId(2))
            .unwrap()
            .measure_to(QubitId(0), ClbitId(1))
            .unwrap();
        let native = translate(&circuit).unwrap();
        assert_eq!(native.measurement_keys(), vec!["c2", "c1"]);
    }

    #[test]
    fn test_custom_gate_carries_unitary() {
        let mut circuit = Circuit::new(2);
        circuit.crz(0.7, QubitId(1), QubitId(0)).unwrap();
        let native = translate(&circuit).unwrap();
        let CirqOperation::Gate { gate: CirqGate::Matrix { kind, unitary, .. }, qubits } =
            &native.operations()[0]
        else {
            panic!("crz should be a matrix gate");
        };
        assert_eq!(*kind, OperationKind::Crz);
        assert_eq!(unitary.num_qubits(), 2);
        assert_eq!(qubits[0].name(), "q1");
    }

    #[test]
    fn test_mct_drops_ancillas() {
        let mut circuit = Circuit::new(4);
        circuit
            .mct(&[QubitId(0), QubitId(1)], QubitId(2), &[QubitId(3)], McxMode::VChain)
            .unwrap();
        let native = translate(&circuit).unwrap();
        let CirqOperation::Gate { gate, qubits } = &native.operations()[0] else {
            panic!("expected a gate");
        };
        assert_eq!(gate, &CirqGate::ControlledX { num_controls: 2 });
        assert_eq!(qubits.len(), 3);
    }

    #[test]
    fn test_ecr_unsupported() {
        let mut circuit = Circuit::new(2);
        circuit.ecr(QubitId(0), QubitId(1)).unwrap();
        let err = translate(&circuit).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ecr"));
        assert!(msg.contains("google"));
    }

    #[test]
    fn test_missing_label_is_internal_error() {
        let err = resolve(&[NamedQubit::new("q0")], QubitId(5)).unwrap_err();
        assert!(matches!(err, HalError::Backend(msg) if msg.contains("q5")));
    }
}
