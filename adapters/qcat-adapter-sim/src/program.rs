//! Engine-level view of a native circuit.
//!
//! Each adapter lowers its native circuit into a [`Program`]: dense gates,
//! multi-controlled X, and measurements into numbered result slots. The
//! adapter decides the slot numbering, which fixes the bitstring layout of
//! the counts it gets back.

use qcat_ir::Unitary;

use crate::statevector::BitOrder;

/// One engine step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Dense unitary on `qubits`, most significant operand first.
    Gate {
        /// Matrix to apply.
        unitary: Unitary,
        /// Operands.
        qubits: Vec<usize>,
    },
    /// X on `target` controlled by every qubit in `controls`.
    MultiControlledX {
        /// Control qubits.
        controls: Vec<usize>,
        /// Target qubit.
        target: usize,
    },
    /// Projective measurement of `qubit` into result slot `slot`.
    Measure {
        /// Measured qubit.
        qubit: usize,
        /// Result slot written with the outcome.
        slot: usize,
    },
}

impl Step {
    fn is_measure(&self) -> bool {
        matches!(self, Step::Measure { .. })
    }
}

/// A lowered circuit ready for simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    num_qubits: usize,
    num_slots: usize,
    order: BitOrder,
    steps: Vec<Step>,
}

impl Program {
    /// Empty program over `num_qubits` qubits and `num_slots` result slots.
    pub fn new(num_qubits: usize, num_slots: usize, order: BitOrder) -> Self {
        Self {
            num_qubits,
            num_slots,
            order,
            steps: Vec::new(),
        }
    }

    /// Append a dense gate.
    pub fn gate(&mut self, unitary: Unitary, qubits: Vec<usize>) -> &mut Self {
        self.steps.push(Step::Gate { unitary, qubits });
        self
    }

    /// Append a multi-controlled X.
    pub fn mcx(&mut self, controls: Vec<usize>, target: usize) -> &mut Self {
        self.steps.push(Step::MultiControlledX { controls, target });
        self
    }

    /// Append a measurement; slots beyond the current count grow it.
    pub fn measure(&mut self, qubit: usize, slot: usize) -> &mut Self {
        self.num_slots = self.num_slots.max(slot + 1);
        self.steps.push(Step::Measure { qubit, slot });
        self
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of result slots.
    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    /// Statevector index convention.
    pub fn order(&self) -> BitOrder {
        self.order
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Whether any step measures.
    pub fn has_measurements(&self) -> bool {
        self.steps.iter().any(Step::is_measure)
    }

    /// Whether no gate follows a measurement, so one evolution can be
    /// sampled for every shot.
    pub fn measurements_are_terminal(&self) -> bool {
        match self.steps.iter().position(Step::is_measure) {
            Some(first) => self.steps[first..].iter().all(Step::is_measure),
            None => true,
        }
    }
}
