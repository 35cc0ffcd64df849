//! Running Braket circuits on the local simulator or on Amazon Braket.

use std::time::{Duration, Instant};

use qcat_adapter_sim::{BitOrder, Program, run_local};
use qcat_hal::{
    Counts, Credentials, ExecuteOptions, ExecutionResult, HalError, HalResult, JobId,
    NativeCircuit, Provider, SimulatorKind, Target, block_on, poll_until_terminal,
};
use tracing::{info, instrument};

use crate::api::{BraketClient, TaskResult};
use crate::device;
use crate::error::BraketError;
use crate::native::{BraketCircuit, BraketGate};
use crate::qasm;

/// Interval between task status requests.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Region used when neither the credentials nor the device ARN name one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Key prefix used when the credentials name none.
pub const DEFAULT_S3_PREFIX: &str = "qcat-results";

/// Execute `circuit` where `options` routes it.
pub fn execute(circuit: &BraketCircuit, options: &ExecuteOptions) -> HalResult<ExecutionResult> {
    options.validate()?;
    options.require_measurements(Provider::Braket, circuit.has_measurements())?;

    match options.target(Provider::Braket)? {
        Target::Local => run_local(Provider::Braket, &lower(circuit)?, options),
        Target::Remote {
            credentials,
            device: requested,
        } => run_remote(circuit, options, credentials, requested),
    }
}

/// Lower to an engine program with big-endian amplitudes and one result
/// slot per classical bit.
///
/// Measurements are replayed at their recorded positions between gates.
pub fn lower(circuit: &BraketCircuit) -> HalResult<Program> {
    let mut program = Program::new(
        circuit.num_qubits() as usize,
        circuit.num_clbits(),
        BitOrder::BigEndian,
    );

    let mut pending = circuit.measurements().iter().peekable();
    for (index, inst) in circuit.instructions().iter().enumerate() {
        while let Some(m) = pending.next_if(|m| m.position <= index) {
            program.measure(m.qubit, m.clbit);
        }
        match &inst.gate {
            BraketGate::Unitary { matrix, .. } => {
                program.gate(matrix.clone(), inst.target.clone());
            }
            gate @ BraketGate::Named { .. } => {
                program.gate(gate.unitary()?, inst.target.clone());
            }
        }
    }
    for m in pending {
        program.measure(m.qubit, m.clbit);
    }
    Ok(program)
}

#[instrument(skip_all, fields(device = requested.unwrap_or(device::DEFAULT_DEVICE)))]
fn run_remote(
    circuit: &BraketCircuit,
    options: &ExecuteOptions,
    credentials: &Credentials,
    requested: Option<&str>,
) -> HalResult<ExecutionResult> {
    if options.simulator == SimulatorKind::Statevector {
        return Err(HalError::Unsupported(
            "statevector simulation is only available locally".into(),
        ));
    }
    let Credentials::Aws {
        s3_bucket,
        s3_prefix,
        region,
    } = credentials
    else {
        return Err(BraketError::InvalidCredentials.into());
    };
    if circuit.has_mid_circuit_measurement() {
        return Err(HalError::Unsupported(
            "Braket devices only measure at the end of a circuit".into(),
        ));
    }

    let arn = device::resolve(requested)
        .ok_or_else(|| BraketError::InvalidDeviceArn(requested.unwrap_or_default().to_string()))?;
    let required = circuit.num_qubits() as usize;
    if let Some(available) = device::max_qubits(&arn).filter(|&max| required > max) {
        return Err(BraketError::TooManyQubits {
            required,
            available,
        }
        .into());
    }

    let region = region
        .as_deref()
        .or_else(|| device::region_from_arn(&arn))
        .unwrap_or(DEFAULT_REGION);
    let prefix = s3_prefix.as_deref().unwrap_or(DEFAULT_S3_PREFIX);
    let source = qasm::emit(circuit);
    let readout = circuit.readout_map();
    let width = circuit.num_clbits();
    let shots = options.repetitions;
    let start = Instant::now();

    let result = block_on(async {
        let client = BraketClient::new(region, s3_bucket.as_str(), prefix).await;
        let info = client.get_device(&arn).await?;
        if !info.online {
            return Err(HalError::from(BraketError::DeviceUnavailable(info.device_name)));
        }

        let task_arn = client
            .create_task(&arn, &source, shots)
            .await
            .map_err(|e| HalError::SubmissionFailed(e.to_string()))?;
        let job_id = JobId::new(task_arn);
        info!("Submitted Braket task {job_id} to {}", info.device_name);

        let (client_ref, id) = (&client, job_id.0.as_str());
        poll_until_terminal(&job_id, POLL_INTERVAL, || async move {
            Ok::<_, HalError>(client_ref.get_task_status(id).await?)
        })
        .await?;

        let task_result = client.get_task_result(&job_id.0).await?;
        let counts = results_to_counts(&task_result, &readout, width, shots);
        let result = ExecutionResult::counts(Provider::Braket, info.device_name, counts, shots);
        Ok::<_, HalError>(result.with_job_id(job_id))
    })?;

    let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    Ok(result.with_execution_time(elapsed))
}

/// Canonical `width`-bit counts from a Braket result document.
///
/// Braket bitstrings follow `measuredQubits`; `readout` names the qubit
/// behind each written classical bit as `(clbit, qubit)`. Unwritten bits
/// read `0`. Probability-only results are scaled by `shots`.
pub fn results_to_counts(
    result: &TaskResult,
    readout: &[(usize, usize)],
    width: usize,
    shots: u32,
) -> Counts {
    let measured: Vec<usize> = result.measured_qubits.clone().unwrap_or_else(|| {
        let mut qubits: Vec<usize> = readout.iter().map(|&(_, q)| q).collect();
        qubits.sort_unstable();
        qubits.dedup();
        qubits
    });
    let picks: Vec<(usize, Option<usize>)> = readout
        .iter()
        .map(|&(clbit, q)| (clbit, measured.iter().position(|&m| m == q)))
        .collect();
    let project = |bits: &[char]| -> String {
        let mut key = vec!['0'; width];
        for &(clbit, pick) in &picks {
            if let (Some(slot), Some(bit)) = (key.get_mut(clbit), pick.and_then(|i| bits.get(i))) {
                *slot = *bit;
            }
        }
        key.into_iter().collect()
    };

    let mut counts = Counts::new();
    if let Some(measurement_counts) = &result.measurement_counts {
        for (bitstring, &n) in measurement_counts {
            let bits: Vec<char> = bitstring.chars().collect();
            counts.insert(project(&bits), n);
        }
    } else if let Some(measurements) = &result.measurements {
        for row in measurements {
            let bits: Vec<char> = row.iter().map(|b| if *b == 0 { '0' } else { '1' }).collect();
            counts.insert(project(&bits), 1);
        }
    } else if let Some(probabilities) = &result.measurement_probabilities {
        for (bitstring, &p) in probabilities {
            let n = (p * f64::from(shots)).max(0.0).round() as u64;
            if n > 0 {
                let bits: Vec<char> = bitstring.chars().collect();
                counts.insert(project(&bits), n);
            }
        }
    }
    counts
}
