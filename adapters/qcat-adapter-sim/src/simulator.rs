//! Shot sampling and statevector runs over a [`Program`].

use std::time::Instant;

use num_complex::Complex64;
use qcat_hal::Counts;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use crate::program::{Program, Step};
use crate::statevector::Statevector;

/// Local simulator.
///
/// Counts come back keyed by result slot, slot 0 leftmost. Seeding makes
/// every run reproducible.
pub struct Simulator {
    rng: StdRng,
}

impl Simulator {
    /// Simulator seeded from `seed`, or from entropy when `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Sample `shots` runs of `program`.
    #[instrument(skip(self, program), fields(qubits = program.num_qubits()))]
    pub fn sample(&mut self, program: &Program, shots: u32) -> Counts {
        let start = Instant::now();
        debug!(
            "Starting simulation: {} qubits, {} slots, {} shots",
            program.num_qubits(),
            program.num_slots(),
            shots
        );

        let counts = if program.measurements_are_terminal() {
            self.sample_terminal(program, shots)
        } else {
            debug!("Mid-circuit measurement present, simulating each shot");
            self.sample_per_shot(program, shots)
        };

        debug!("Simulation completed in {:?}", start.elapsed());
        counts
    }

    /// Final amplitudes of `program`. Measurements collapse the state.
    #[instrument(skip(self, program), fields(qubits = program.num_qubits()))]
    pub fn statevector(&mut self, program: &Program) -> Vec<Complex64> {
        let mut sv = Statevector::new(program.num_qubits(), program.order());
        let mut slots = vec![false; program.num_slots()];
        self.run(program, &mut sv, &mut slots);
        sv.into_amplitudes()
    }

    fn sample_terminal(&mut self, program: &Program, shots: u32) -> Counts {
        let mut sv = Statevector::new(program.num_qubits(), program.order());
        for step in program.steps() {
            apply_gate(&mut sv, step);
        }

        let mut outcomes: FxHashMap<usize, u64> = FxHashMap::default();
        for _ in 0..shots {
            *outcomes.entry(sv.sample(&mut self.rng)).or_insert(0) += 1;
        }

        let mut counts = Counts::new();
        let mut slots = vec![false; program.num_slots()];
        for (outcome, n) in outcomes {
            slots.fill(false);
            for step in program.steps() {
                if let Step::Measure { qubit, slot } = step {
                    slots[*slot] = sv.bit(outcome, *qubit);
                }
            }
            counts.insert(bitstring(&slots), n);
        }
        counts
    }

    fn sample_per_shot(&mut self, program: &Program, shots: u32) -> Counts {
        let initial = Statevector::new(program.num_qubits(), program.order());
        let mut counts = Counts::new();
        let mut slots = vec![false; program.num_slots()];

        for shot in 0..shots {
            let mut sv = initial.clone();
            slots.fill(false);
            self.run(program, &mut sv, &mut slots);
            counts.insert(bitstring(&slots), 1);

            if shot > 0 && shot % 1000 == 0 {
                debug!("Completed {} shots", shot);
            }
        }
        counts
    }

    fn run(&mut self, program: &Program, sv: &mut Statevector, slots: &mut [bool]) {
        for step in program.steps() {
            match step {
                Step::Measure { qubit, slot } => {
                    slots[*slot] = sv.measure(*qubit, &mut self.rng);
                }
                gate => apply_gate(sv, gate),
            }
        }
    }
}

fn apply_gate(sv: &mut Statevector, step: &Step) {
    match step {
        Step::Gate { unitary, qubits } => sv.apply_unitary(unitary, qubits),
        Step::MultiControlledX { controls, target } => sv.apply_mcx(controls, *target),
        Step::Measure { .. } => {}
    }
}

/// Render result slots as a bitstring, slot 0 leftmost.
pub fn bitstring(slots: &[bool]) -> String {
    slots.iter().map(|&b| if b { '1' } else { '0' }).collect()
}
