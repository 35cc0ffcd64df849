//! One local execution, as the adapters' `execute` performs it.

use std::time::Instant;

use qcat_hal::{ExecuteOptions, ExecutionResult, HalError, HalResult, Provider, SimulatorKind};
use tracing::{info, instrument};

use crate::MAX_QUBITS;
use crate::program::Program;
use crate::simulator::Simulator;

/// Run `program` on the local simulator for `provider`.
///
/// Sampling takes `options.repetitions` shots; statevector runs return the
/// final amplitudes in the program's bit order. Handling of circuits
/// without measurements is left to the caller.
#[instrument(skip(program, options), fields(simulator = %options.simulator))]
pub fn run_local(
    provider: Provider,
    program: &Program,
    options: &ExecuteOptions,
) -> HalResult<ExecutionResult> {
    if program.num_qubits() > MAX_QUBITS {
        return Err(HalError::CircuitTooLarge(format!(
            "{} qubits exceed the local simulator limit of {MAX_QUBITS}",
            program.num_qubits()
        )));
    }

    let start = Instant::now();
    let mut simulator = Simulator::new(options.seed);
    let name = options.simulator.as_str();
    let result = match options.simulator {
        SimulatorKind::Qasm => {
            let counts = simulator.sample(program, options.repetitions);
            ExecutionResult::counts(provider, name, counts, options.repetitions)
        }
        SimulatorKind::Statevector => {
            ExecutionResult::statevector(provider, name, simulator.statevector(program))
        }
    };

    let elapsed = start.elapsed();
    info!("{provider} local {name} run finished in {elapsed:?}");
    Ok(result.with_execution_time(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)))
}
