//! Running Google circuits on the local simulator.

use qcat_adapter_sim::{BitOrder, Program, run_local};
use qcat_hal::{
    ExecuteOptions, ExecutionResult, HalError, HalResult, NativeCircuit, Provider, Target,
};
use qcat_ir::unitary_for;
use tracing::{debug, instrument};

use crate::native::{CirqCircuit, CirqGate, CirqOperation, NamedQubit};
use crate::translate::MEASURE_ALL_KEY;

/// Execute `circuit` on the local simulator.
#[instrument(skip_all, fields(qubits = circuit.num_qubits()))]
pub fn execute(circuit: &CirqCircuit, options: &ExecuteOptions) -> HalResult<ExecutionResult> {
    options.validate()?;
    options.require_measurements(Provider::Google, circuit.has_measurements())?;

    if let Target::Remote { .. } = options.target(Provider::Google)? {
        return Err(HalError::Unsupported(
            "Google Quantum AI execution is not available; run without credentials to simulate locally"
                .into(),
        ));
    }

    debug!("Lowering {} operations", circuit.len());
    run_local(Provider::Google, &lower(circuit)?, options)
}

/// Lower to an engine program with big-endian amplitudes and one result
/// slot per classical bit.
///
/// Key `c{k}` writes slot `k`; the `measure_all` key writes one slot per
/// qubit at the qubit's register index.
pub fn lower(circuit: &CirqCircuit) -> HalResult<Program> {
    let mut program = Program::new(
        circuit.qubits().len(),
        circuit.num_clbits(),
        BitOrder::BigEndian,
    );

    for op in circuit.operations() {
        match op {
            CirqOperation::Gate { gate, qubits } => {
                let qubits = indices(qubits)?;
                match gate {
                    CirqGate::ControlledX { num_controls } => {
                        let Some(&target) = qubits.get(*num_controls) else {
                            return Err(HalError::InvalidCircuit(format!(
                                "controlled X has no target after {num_controls} controls"
                            )));
                        };
                        program.mcx(qubits[..*num_controls].to_vec(), target);
                    }
                    CirqGate::Named { kind, .. } => {
                        program.gate(unitary_for(*kind, &[])?, qubits);
                    }
                    CirqGate::Matrix { unitary, .. } => {
                        program.gate(unitary.clone(), qubits);
                    }
                }
            }
            CirqOperation::Measure { qubits, key } => {
                let qubits = indices(qubits)?;
                if key == MEASURE_ALL_KEY {
                    for q in qubits {
                        program.measure(q, q);
                    }
                } else {
                    let slot = key_slot(key)?;
                    for q in qubits {
                        program.measure(q, slot);
                    }
                }
            }
        }
    }
    Ok(program)
}

fn indices(qubits: &[NamedQubit]) -> HalResult<Vec<usize>> {
    qubits
        .iter()
        .map(|q| {
            q.index()
                .ok_or_else(|| HalError::InvalidCircuit(format!("qubit '{q}' has no register index")))
        })
        .collect()
}

fn key_slot(key: &str) -> HalResult<usize> {
    key.strip_prefix('c')
        .and_then(|k| k.parse().ok())
        .ok_or_else(|| HalError::InvalidCircuit(format!("measurement key '{key}' is not 'c<index>'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::translate;
    use num_complex::Complex64;
    use qcat_hal::Credentials;
    use qcat_ir::{Circuit, ClbitId, QubitId};

    fn x_then_measure_all() -> CirqCircuit {
        let mut circuit = Circuit::new(3);
        circuit.x(QubitId(0)).unwrap().measure_all().unwrap();
        translate(&circuit).unwrap()
    }

    #[test]
    fn test_local_counts() {
        let options = ExecuteOptions::new().with_repetitions(50).with_seed(2);
        let result = execute(&x_then_measure_all(), &options).unwrap();
        assert_eq!(result.as_counts().unwrap().get("100"), 50);
        assert_eq!(result.provider, Provider::Google);
    }

    #[test]
    fn test_measure_to_clbit() {
        let mut circuit = Circuit::with_size("m", 2, 2);
        circuit
            .x(QubitId(0))
            .unwrap()
            .measure_to(QubitId(0), ClbitId(1))
            .unwrap();
        let options = ExecuteOptions::new().with_repetitions(8).with_seed(0);
        let result = execute(&translate(&circuit).unwrap(), &options).unwrap();
        assert_eq!(result.as_counts().unwrap().get("01"), 8);
    }

    #[test]
    fn test_statevector_is_big_endian() {
        let mut circuit = Circuit::new(2);
        circuit.x(QubitId(0)).unwrap();
        let native = translate(&circuit).unwrap();
        let result = execute(&native, &ExecuteOptions::statevector()).unwrap();
        let amps = result.as_statevector().unwrap();
        assert!((amps[0b10] - Complex64::new(1.0, 0.0)).norm() < 1e-10);
    }

    #[test]
    fn test_sampling_without_measurement_fails() {
        let mut circuit = Circuit::new(1);
        circuit.h(QubitId(0)).unwrap();
        let err = execute(&translate(&circuit).unwrap(), &ExecuteOptions::new()).unwrap_err();
        assert!(matches!(err, HalError::NoMeasurements(_)));
    }

    #[test]
    fn test_key_width_follows_register() {
        let mut circuit = Circuit::new(3);
        circuit.x(QubitId(1)).unwrap().measure(QubitId(1)).unwrap();
        let options = ExecuteOptions::new().with_repetitions(4).with_seed(6);
        let result = execute(&translate(&circuit).unwrap(), &options).unwrap();
        assert_eq!(result.as_counts().unwrap().get("010"), 4);
    }

    #[test]
    fn test_mid_circuit_measurement() {
        let mut circuit = Circuit::new(1);
        circuit
            .x(QubitId(0))
            .unwrap()
            .measure(QubitId(0))
            .unwrap()
            .x(QubitId(0))
            .unwrap();
        let options = ExecuteOptions::new().with_repetitions(5).with_seed(3);
        let result = execute(&translate(&circuit).unwrap(), &options).unwrap();
        assert_eq!(result.as_counts().unwrap().get("1"), 5);
    }

    #[test]
    fn test_remote_unsupported() {
        let options = ExecuteOptions::new().with_credentials(Credentials::api_token("t"));
        let err = execute(&x_then_measure_all(), &options).unwrap_err();
        assert!(matches!(err, HalError::Unsupported(_)));
    }

    #[test]
    fn test_bad_key() {
        assert!(key_slot("c7").is_ok_and(|s| s == 7));
        assert!(matches!(key_slot("alpha"), Err(HalError::InvalidCircuit(_))));
    }
}
