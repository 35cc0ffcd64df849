//! Shared checks run by every translator before emitting a native gate.

use qcat_ir::{Operation, OperationKind, QubitId};

use crate::error::{HalError, HalResult};

/// Check an operation's shape against its kind.
///
/// The builder guarantees bounds; operations appended by hand may still
/// carry the wrong parameter count, arity, or repeated operands, which
/// native libraries reject.
pub fn validate_operation(op: &Operation) -> HalResult<()> {
    let expected = op.kind.num_params();
    if op.params.len() != expected {
        return Err(HalError::InvalidCircuit(format!(
            "'{}' expects {expected} parameters, got {}",
            op.kind,
            op.params.len()
        )));
    }

    if let Some(arity) = op.kind.num_qubits() {
        let got = op.qubits().count();
        if got != arity as usize {
            return Err(HalError::InvalidCircuit(format!(
                "'{}' acts on {arity} qubits, got {got}",
                op.kind
            )));
        }
    } else if op.kind.is_multi_controlled() {
        let controls = op.control_count().unwrap_or(0);
        if controls == 0 {
            return Err(HalError::InvalidCircuit(format!(
                "'{}' needs at least one control",
                op.kind
            )));
        }
        let total = op.qubits().count();
        if total < controls + 1 {
            return Err(HalError::InvalidCircuit(format!(
                "'{}' declares {controls} controls but lists {total} qubits",
                op.kind
            )));
        }
        if op.kind == OperationKind::Mct && op.qubit_args.get(1).map(Vec::len) != Some(1) {
            return Err(HalError::InvalidCircuit(
                "'mct' needs exactly one target".into(),
            ));
        }
    }

    ensure_distinct(op)
}

fn ensure_distinct(op: &Operation) -> HalResult<()> {
    let qubits: Vec<QubitId> = op.qubits().collect();
    for (i, q) in qubits.iter().enumerate() {
        if qubits[i + 1..].contains(q) {
            return Err(HalError::InvalidCircuit(format!(
                "duplicate qubit {q} in '{}'",
                op.kind
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat_ir::Circuit;

    #[test]
    fn test_builder_output_is_valid() {
        let mut circuit = Circuit::new(4);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cu(0.1, 0.2, 0.3, 0.4, QubitId(0), QubitId(1))
            .unwrap()
            .mcp(0.5, &[QubitId(0), QubitId(1)], QubitId(2))
            .unwrap()
            .measure_all()
            .unwrap();
        for op in circuit.operations() {
            validate_operation(op).unwrap();
        }
    }

    #[test]
    fn test_duplicate_operands_rejected() {
        let mut circuit = Circuit::new(2);
        circuit.cx(QubitId(1), QubitId(1)).unwrap();
        let err = validate_operation(&circuit.operations()[0]).unwrap_err();
        assert!(matches!(err, HalError::InvalidCircuit(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn test_wrong_param_count_rejected() {
        let op = Operation::new(OperationKind::Rx, vec![vec![QubitId(0)]], vec![]);
        assert!(validate_operation(&op).is_err());
        let op = Operation::new(OperationKind::H, vec![vec![QubitId(0)], vec![QubitId(1)]], vec![]);
        assert!(validate_operation(&op).is_err());
    }
}
