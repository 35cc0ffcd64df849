//! Statevector simulation engine.

use num_complex::Complex64;
use qcat_ir::Unitary;
use rand::Rng;

/// How a qubit index maps to a bit of the amplitude index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BitOrder {
    /// Qubit `q` is bit `q` of the index (qubit 0 is least significant).
    #[default]
    LittleEndian,
    /// Qubit `q` is bit `n - 1 - q` of the index (qubit 0 is most significant).
    BigEndian,
}

/// A statevector representing a quantum state.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
    order: BitOrder,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize, order: BitOrder) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
            order,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Index convention of this state.
    pub fn order(&self) -> BitOrder {
        self.order
    }

    /// Amplitudes in index order.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume into the amplitude vector.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Bit position of `qubit` in an amplitude index.
    pub fn position(&self, qubit: usize) -> usize {
        match self.order {
            BitOrder::LittleEndian => qubit,
            BitOrder::BigEndian => self.num_qubits - 1 - qubit,
        }
    }

    fn mask(&self, qubit: usize) -> usize {
        1 << self.position(qubit)
    }

    /// Value of `qubit` in basis state `outcome`.
    pub fn bit(&self, outcome: usize, qubit: usize) -> bool {
        outcome & self.mask(qubit) != 0
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply `unitary` to `qubits`; `qubits[0]` is the most significant
    /// operand of the matrix.
    pub fn apply_unitary(&mut self, unitary: &Unitary, qubits: &[usize]) {
        debug_assert_eq!(unitary.num_qubits(), qubits.len());
        match qubits {
            [q] => return self.apply_single(unitary, *q),
            [] => return,
            _ => {}
        }

        let k = qubits.len();
        let dim = 1 << k;
        // Operand m is bit (k - 1 - m) of the local matrix index.
        let masks: Vec<usize> = qubits.iter().map(|&q| self.mask(q)).collect();
        let operand_mask: usize = masks.iter().fold(0, |acc, m| acc | m);
        let offsets: Vec<usize> = (0..dim)
            .map(|local| {
                masks
                    .iter()
                    .enumerate()
                    .filter(|(m, _)| local & (1 << (k - 1 - m)) != 0)
                    .fold(0, |acc, (_, mask)| acc | mask)
            })
            .collect();

        let matrix = unitary.matrix();
        let mut gathered = vec![Complex64::new(0.0, 0.0); dim];
        for base in 0..self.amplitudes.len() {
            if base & operand_mask != 0 {
                continue;
            }
            for (slot, offset) in gathered.iter_mut().zip(&offsets) {
                *slot = self.amplitudes[base | offset];
            }
            for (row, offset) in offsets.iter().enumerate() {
                self.amplitudes[base | offset] = gathered
                    .iter()
                    .enumerate()
                    .map(|(col, amp)| matrix[[row, col]] * amp)
                    .sum();
            }
        }
    }

    fn apply_single(&mut self, unitary: &Unitary, qubit: usize) {
        let mask = self.mask(qubit);
        let (u00, u01) = (unitary.get(0, 0), unitary.get(0, 1));
        let (u10, u11) = (unitary.get(1, 0), unitary.get(1, 1));
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = u00 * a + u01 * b;
                self.amplitudes[j] = u10 * a + u11 * b;
            }
        }
    }

    /// Flip `target` when every control is set.
    pub fn apply_mcx(&mut self, controls: &[usize], target: usize) {
        let ctrl_mask = controls.iter().fold(0, |acc, &c| acc | self.mask(c));
        let tgt_mask = self.mask(target);
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask == ctrl_mask) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Probability of reading 1 on `qubit`.
    pub fn probability_one(&self, qubit: usize) -> f64 {
        let mask = self.mask(qubit);
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Measure `qubit` projectively, collapsing the state.
    pub fn measure<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) -> bool {
        let p1 = self.probability_one(qubit);
        let r: f64 = rng.r#gen();
        let outcome = r < p1;

        let mask = self.mask(qubit);
        let norm = (if outcome { p1 } else { 1.0 - p1 }).sqrt();
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) == outcome {
                if norm > 0.0 {
                    *amp /= norm;
                }
            } else {
                *amp = Complex64::new(0.0, 0.0);
            }
        }
        outcome
    }

    /// Probability of each basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Sample a measurement outcome.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.r#gen();

        let mut cumulative = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            cumulative += amp.norm_sqr();
            if r < cumulative {
                return i;
            }
        }

        // Rounding can leave the cumulative sum just under 1.
        self.amplitudes
            .iter()
            .rposition(|a| a.norm_sqr() > 0.0)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2, BitOrder::LittleEndian);
        assert!(approx_eq(sv.amplitudes()[0], c(1.0)));
        assert!(sv.amplitudes()[1..].iter().all(|a| approx_eq(*a, c(0.0))));
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::new(1, BitOrder::LittleEndian);
        sv.apply_unitary(&Unitary::h(), &[0]);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes()[0], c(sqrt2_inv)));
        assert!(approx_eq(sv.amplitudes()[1], c(sqrt2_inv)));
    }

    #[test]
    fn test_bell_state_both_orders() {
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for order in [BitOrder::LittleEndian, BitOrder::BigEndian] {
            let mut sv = Statevector::new(2, order);
            sv.apply_unitary(&Unitary::h(), &[0]);
            sv.apply_unitary(&Unitary::cx(), &[0, 1]);

            assert!(approx_eq(sv.amplitudes()[0], c(sqrt2_inv)));
            assert!(approx_eq(sv.amplitudes()[1], c(0.0)));
            assert!(approx_eq(sv.amplitudes()[2], c(0.0)));
            assert!(approx_eq(sv.amplitudes()[3], c(sqrt2_inv)));
        }
    }

    #[test]
    fn test_x_index_depends_on_order() {
        let mut little = Statevector::new(3, BitOrder::LittleEndian);
        little.apply_unitary(&Unitary::x(), &[0]);
        assert!(approx_eq(little.amplitudes()[0b001], c(1.0)));

        let mut big = Statevector::new(3, BitOrder::BigEndian);
        big.apply_unitary(&Unitary::x(), &[0]);
        assert!(approx_eq(big.amplitudes()[0b100], c(1.0)));
        assert!(big.bit(0b100, 0));
    }

    #[test]
    fn test_cx_operand_order() {
        // Control on qubit 1, target on qubit 0.
        let mut sv = Statevector::new(2, BitOrder::LittleEndian);
        sv.apply_unitary(&Unitary::x(), &[1]);
        sv.apply_unitary(&Unitary::cx(), &[1, 0]);
        assert!(approx_eq(sv.amplitudes()[0b11], c(1.0)));
    }

    #[test]
    fn test_mcx_matches_dense_unitary() {
        let mut a = Statevector::new(4, BitOrder::BigEndian);
        let mut b = a.clone();
        for q in 0..3 {
            a.apply_unitary(&Unitary::h(), &[q]);
            b.apply_unitary(&Unitary::h(), &[q]);
        }
        a.apply_mcx(&[0, 1, 2], 3);
        b.apply_unitary(&Unitary::multi_controlled_x(3).unwrap(), &[0, 1, 2, 3]);
        for (x, y) in a.amplitudes().iter().zip(b.amplitudes()) {
            assert!(approx_eq(*x, *y));
        }
    }

    #[test]
    fn test_measure_collapses() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sv = Statevector::new(2, BitOrder::LittleEndian);
        sv.apply_unitary(&Unitary::h(), &[0]);
        sv.apply_unitary(&Unitary::cx(), &[0, 1]);

        let first = sv.measure(0, &mut rng);
        let p1 = sv.probability_one(1);
        assert!((p1 - if first { 1.0 } else { 0.0 }).abs() < 1e-10);
        assert_eq!(sv.measure(1, &mut rng), first);
    }

    #[test]
    fn test_sample_deterministic() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sv = Statevector::new(1, BitOrder::LittleEndian);
        sv.apply_unitary(&Unitary::x(), &[0]);

        for _ in 0..100 {
            assert_eq!(sv.sample(&mut rng), 1);
        }
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let mut sv = Statevector::new(3, BitOrder::BigEndian);
        sv.apply_unitary(&Unitary::ry(0.3), &[2]);
        sv.apply_unitary(&Unitary::rxx(1.1), &[0, 2]);
        let total: f64 = sv.probabilities().iter().sum();
        assert!((total - 1.0).abs() < 1e-10);
    }
}
