//! Running IBM circuits on the local simulator or on IBM Quantum.

use std::time::{Duration, Instant};

use qcat_adapter_sim::{BitOrder, Program, run_local};
use qcat_hal::{
    Counts, Credentials, ExecuteOptions, ExecutionResult, HalError, HalResult, JobId, JobStatus,
    NativeCircuit, Provider, SimulatorKind, Target, block_on, poll_until_terminal,
};
use tracing::{info, instrument, warn};

use crate::api::{IbmClient, JobResultResponse, LEGACY_ENDPOINT, hex_to_binary};
use crate::error::IbmResult;
use crate::native::{IbmCircuit, IbmInstruction};
use crate::qasm;

/// Interval between job status requests.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Execute `circuit` where `options` routes it.
pub fn execute(circuit: &IbmCircuit, options: &ExecuteOptions) -> HalResult<ExecutionResult> {
    options.validate()?;
    options.require_measurements(Provider::Ibm, circuit.has_measurements())?;

    match options.target(Provider::Ibm)? {
        Target::Local => run_local(Provider::Ibm, &lower(circuit)?, options),
        Target::Remote {
            credentials,
            device,
        } => run_remote(circuit, options, credentials, device),
    }
}

/// Lower to an engine program: little-endian amplitudes, one result slot
/// per classical bit.
pub fn lower(circuit: &IbmCircuit) -> HalResult<Program> {
    let mut program = Program::new(
        circuit.num_qubits() as usize,
        circuit.num_clbits() as usize,
        BitOrder::LittleEndian,
    );

    for inst in circuit.instructions() {
        match inst {
            IbmInstruction::Gate { gate, qubits } => {
                let qubits: Vec<usize> = qubits.iter().map(|&q| q as usize).collect();
                if gate.is_multi_controlled_x() {
                    let n = gate.num_controls();
                    let Some(&target) = qubits.get(n) else {
                        return Err(HalError::InvalidCircuit(format!(
                            "'{}' has no target after {n} controls",
                            gate.name()
                        )));
                    };
                    program.mcx(qubits[..n].to_vec(), target);
                } else {
                    program.gate(gate.unitary()?, qubits);
                }
            }
            IbmInstruction::Measure { qubit, clbit } => {
                program.measure(*qubit as usize, *clbit as usize);
            }
        }
    }
    Ok(program)
}

#[instrument(skip_all, fields(device = device.unwrap_or("least-busy")))]
fn run_remote(
    circuit: &IbmCircuit,
    options: &ExecuteOptions,
    credentials: &Credentials,
    device: Option<&str>,
) -> HalResult<ExecutionResult> {
    if options.simulator == SimulatorKind::Statevector {
        return Err(HalError::Unsupported(
            "statevector simulation is only available locally".into(),
        ));
    }
    let Credentials::ApiToken { token, instance } = credentials else {
        return Err(HalError::InvalidCredentials {
            provider: Provider::Ibm,
            reason: "IBM Quantum expects an API token".into(),
        });
    };

    let program = qasm::emit(circuit)?;
    let shots = options.repetitions;
    let width = circuit.num_clbits() as usize;
    let start = Instant::now();

    let result = block_on(async {
        let client = connect(token, instance.as_deref()).await?;
        let backend = match device {
            Some(name) => name.to_string(),
            None => {
                client
                    .least_busy_backend(circuit.num_qubits() as usize)
                    .await?
            }
        };

        let submitted = client
            .submit_sampler_job(&backend, vec![program], shots)
            .await?;
        let job_id = JobId::new(submitted.id);
        info!("Submitted IBM job {job_id} to {backend}");

        let (client_ref, id) = (&client, job_id.0.as_str());
        poll_until_terminal(&job_id, POLL_INTERVAL, || job_status(client_ref, id)).await?;

        let results = client.get_job_results(&job_id.0).await?;
        let counts = results_to_counts(&results, width);
        let result = ExecutionResult::counts(Provider::Ibm, backend, counts, shots);
        Ok::<_, HalError>(result.with_job_id(job_id))
    })?;

    let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    Ok(result.with_execution_time(elapsed))
}

/// CRN instances use the Cloud API; anything else is a legacy hub.
async fn connect(token: &str, instance: Option<&str>) -> IbmResult<IbmClient> {
    match instance {
        Some(crn) if crn.starts_with("crn:") => IbmClient::connect(token, crn).await,
        Some(hub) => Ok(IbmClient::new(LEGACY_ENDPOINT, token)?.with_instance(hub)),
        None => IbmClient::new(LEGACY_ENDPOINT, token),
    }
}

async fn job_status(client: &IbmClient, job_id: &str) -> HalResult<JobStatus> {
    let response = client.get_job_status(job_id).await?;
    Ok(response.to_job_status())
}

/// Canonical counts from Sampler output.
///
/// IBM writes the highest classical bit leftmost, so keys are reversed to
/// put bit 0 first.
pub fn results_to_counts(results: &JobResultResponse, width: usize) -> Counts {
    let mut native = Counts::new();
    let Some(result) = results.results.first() else {
        return native;
    };

    if let Some(data) = &result.data {
        for register in data.values() {
            for sample in &register.samples {
                match hex_to_binary(sample, width) {
                    Some(bits) => native.insert(bits, 1),
                    None => warn!("Skipping malformed IBM sample '{sample}'"),
                }
            }
        }
    } else if let Some(counts) = &result.counts {
        for (key, &n) in counts {
            match hex_to_binary(key, width) {
                Some(bits) => native.insert(bits, n),
                None => warn!("Skipping malformed IBM count key '{key}'"),
            }
        }
    }
    native.reversed_keys()
}
