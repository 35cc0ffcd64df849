//! Closed-form gate unitaries.
//!
//! Matrices use the operand-major convention: operand 0 of a gate is the
//! most significant bit of the row/column index. For a controlled gate the
//! controls are the leading operands, so the active block sits in the
//! bottom-right corner.
//!
//! [`unitary_fn`] maps every gate [`OperationKind`] to a pure
//! `(params) -> Unitary` function. Backends register these as custom gates
//! for kinds their native library lacks, and simulators use them to apply
//! any gate.

use ndarray::{Array2, arr2};
use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4, PI};

use crate::error::{IrError, IrResult};
use crate::operation::OperationKind;

/// Tolerance for floating point comparisons.
const EPSILON: f64 = 1e-10;

/// Largest operand count a dense matrix is built for.
pub const MAX_DENSE_QUBITS: usize = 10;

/// A `(params) -> unitary` constructor.
pub type UnitaryFn = fn(&[f64]) -> IrResult<Unitary>;

#[inline]
fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// A dense unitary matrix on `num_qubits` qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct Unitary {
    matrix: Array2<Complex64>,
    num_qubits: usize,
}

impl Unitary {
    /// Build from row-major data. The dimension must be a power of two.
    pub fn from_vec(dim: usize, data: Vec<Complex64>) -> IrResult<Self> {
        if dim == 0 || !dim.is_power_of_two() {
            return Err(IrError::InvalidMatrix(format!(
                "dimension {dim} is not a power of two"
            )));
        }
        let matrix = Array2::from_shape_vec((dim, dim), data)
            .map_err(|e| IrError::InvalidMatrix(e.to_string()))?;
        Ok(Self::from_array(matrix))
    }

    fn from_array(matrix: Array2<Complex64>) -> Self {
        let num_qubits = matrix.nrows().trailing_zeros() as usize;
        Self { matrix, num_qubits }
    }

    fn from_2x2(a: Complex64, b: Complex64, cc: Complex64, d: Complex64) -> Self {
        Self::from_array(arr2(&[[a, b], [cc, d]]))
    }

    fn diagonal(entries: &[Complex64]) -> Self {
        let mut matrix = Array2::zeros((entries.len(), entries.len()));
        for (i, v) in entries.iter().enumerate() {
            matrix[[i, i]] = *v;
        }
        Self::from_array(matrix)
    }

    /// Identity on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> Self {
        Self::from_array(Array2::eye(1 << num_qubits))
    }

    /// Number of qubits the matrix acts on.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Matrix dimension (`2^num_qubits`).
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Element at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.matrix[[row, col]]
    }

    /// Row-major copy of the elements.
    pub fn to_vec(&self) -> Vec<Complex64> {
        self.matrix.iter().copied().collect()
    }

    /// Matrix product `self * other` (apply `other` first).
    pub fn dot(&self, other: &Unitary) -> Unitary {
        Self::from_array(self.matrix.dot(&other.matrix))
    }

    /// Tensor product with `self` on the leading operands.
    pub fn kron(&self, other: &Unitary) -> Unitary {
        Self::from_array(ndarray::linalg::kron(&self.matrix, &other.matrix))
    }

    /// Multiply every element by a scalar.
    pub fn scaled(&self, factor: Complex64) -> Unitary {
        Self::from_array(self.matrix.mapv(|v| v * factor))
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Unitary {
        Self::from_array(self.matrix.t().mapv(|v| v.conj()))
    }

    /// Add `num_controls` leading control operands.
    ///
    /// Fails with [`IrError::MatrixTooLarge`] when the result would act on
    /// more than [`MAX_DENSE_QUBITS`] qubits.
    pub fn controlled(&self, num_controls: usize) -> IrResult<Unitary> {
        let num_qubits = self.num_qubits.saturating_add(num_controls);
        if num_qubits > MAX_DENSE_QUBITS {
            return Err(IrError::MatrixTooLarge {
                num_qubits,
                max: MAX_DENSE_QUBITS,
            });
        }
        Ok(self.with_controls(num_controls))
    }

    fn with_controls(&self, num_controls: usize) -> Unitary {
        let dim = self.dim();
        let total = dim << num_controls;
        let mut matrix = Array2::eye(total);
        let offset = total - dim;
        for r in 0..dim {
            for col in 0..dim {
                matrix[[offset + r, offset + col]] = self.matrix[[r, col]];
            }
        }
        Self::from_array(matrix)
    }

    /// Lift onto an `num_qubits`-qubit register, with operand `k` placed on
    /// register qubit `operands[k]` (register qubit 0 most significant).
    pub fn embed(&self, operands: &[usize], num_qubits: usize) -> IrResult<Unitary> {
        if operands.len() != self.num_qubits || operands.iter().any(|&q| q >= num_qubits) {
            return Err(IrError::InvalidMatrix(format!(
                "cannot embed a {}-qubit matrix on operands {operands:?} of a {num_qubits}-qubit register",
                self.num_qubits
            )));
        }
        let k = operands.len();
        let shifts: Vec<usize> = operands.iter().map(|&q| num_qubits - 1 - q).collect();
        let operand_mask: usize = shifts.iter().map(|&s| 1usize << s).sum();
        let sub_index = |full: usize| -> usize {
            shifts
                .iter()
                .enumerate()
                .map(|(j, &s)| ((full >> s) & 1) << (k - 1 - j))
                .sum()
        };

        let total = 1 << num_qubits;
        let mut matrix = Array2::zeros((total, total));
        for row in 0..total {
            for col in 0..total {
                if row & !operand_mask == col & !operand_mask {
                    matrix[[row, col]] = self.matrix[[sub_index(row), sub_index(col)]];
                }
            }
        }
        Ok(Self::from_array(matrix))
    }

    /// Whether `U^dagger U` is the identity within `tolerance`.
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        let product = self.adjoint().matrix.dot(&self.matrix);
        let dim = self.dim();
        (0..dim).all(|r| {
            (0..dim).all(|col| {
                let expected = if r == col { c(1.0, 0.0) } else { c(0.0, 0.0) };
                (product[[r, col]] - expected).norm() < tolerance
            })
        })
    }

    /// Element-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Unitary, tolerance: f64) -> bool {
        self.dim() == other.dim()
            && self
                .matrix
                .iter()
                .zip(other.matrix.iter())
                .all(|(a, b)| (a - b).norm() < tolerance)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    pub fn x() -> Self {
        Self::from_2x2(c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0))
    }

    pub fn y() -> Self {
        Self::from_2x2(c(0.0, 0.0), c(0.0, -1.0), c(0.0, 1.0), c(0.0, 0.0))
    }

    pub fn z() -> Self {
        Self::diagonal(&[c(1.0, 0.0), c(-1.0, 0.0)])
    }

    pub fn h() -> Self {
        let s = c(FRAC_1_SQRT_2, 0.0);
        Self::from_2x2(s, s, s, -s)
    }

    /// Phase gate diag(1, e^{i lambda}); also U1.
    pub fn p(lambda: f64) -> Self {
        Self::diagonal(&[c(1.0, 0.0), Complex64::from_polar(1.0, lambda)])
    }

    pub fn s() -> Self {
        Self::p(FRAC_PI_2)
    }

    pub fn sdg() -> Self {
        Self::p(-FRAC_PI_2)
    }

    pub fn t() -> Self {
        Self::p(FRAC_PI_4)
    }

    pub fn tdg() -> Self {
        Self::p(-FRAC_PI_4)
    }

    /// Square root of X.
    pub fn sx() -> Self {
        let a = c(0.5, 0.5);
        let b = c(0.5, -0.5);
        Self::from_2x2(a, b, b, a)
    }

    pub fn sxdg() -> Self {
        Self::sx().adjoint()
    }

    pub fn rx(theta: f64) -> Self {
        let (s, co) = (theta / 2.0).sin_cos();
        Self::from_2x2(c(co, 0.0), c(0.0, -s), c(0.0, -s), c(co, 0.0))
    }

    pub fn ry(theta: f64) -> Self {
        let (s, co) = (theta / 2.0).sin_cos();
        Self::from_2x2(c(co, 0.0), c(-s, 0.0), c(s, 0.0), c(co, 0.0))
    }

    pub fn rz(theta: f64) -> Self {
        Self::diagonal(&[
            Complex64::from_polar(1.0, -theta / 2.0),
            Complex64::from_polar(1.0, theta / 2.0),
        ])
    }

    /// Rotation by `theta` about `cos(phi) X + sin(phi) Y`.
    pub fn r(theta: f64, phi: f64) -> Self {
        let (s, co) = (theta / 2.0).sin_cos();
        let i = c(0.0, 1.0);
        Self::from_2x2(
            c(co, 0.0),
            -i * Complex64::from_polar(s, -phi),
            -i * Complex64::from_polar(s, phi),
            c(co, 0.0),
        )
    }

    /// Generic single-qubit rotation U(theta, phi, lambda); also U3.
    pub fn u(theta: f64, phi: f64, lambda: f64) -> Self {
        let (s, co) = (theta / 2.0).sin_cos();
        Self::from_2x2(
            c(co, 0.0),
            -Complex64::from_polar(s, lambda),
            Complex64::from_polar(s, phi),
            Complex64::from_polar(co, phi + lambda),
        )
    }

    pub fn u2(phi: f64, lambda: f64) -> Self {
        Self::u(FRAC_PI_2, phi, lambda)
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    pub fn cx() -> Self {
        Self::x().with_controls(1)
    }

    pub fn swap() -> Self {
        let mut matrix = Array2::zeros((4, 4));
        matrix[[0, 0]] = c(1.0, 0.0);
        matrix[[1, 2]] = c(1.0, 0.0);
        matrix[[2, 1]] = c(1.0, 0.0);
        matrix[[3, 3]] = c(1.0, 0.0);
        Self::from_array(matrix)
    }

    pub fn iswap() -> Self {
        let mut matrix = Array2::zeros((4, 4));
        matrix[[0, 0]] = c(1.0, 0.0);
        matrix[[1, 2]] = c(0.0, 1.0);
        matrix[[2, 1]] = c(0.0, 1.0);
        matrix[[3, 3]] = c(1.0, 0.0);
        Self::from_array(matrix)
    }

    /// exp(-i theta/2 P) for a Pauli product P.
    fn pauli_rotation(pauli: &Unitary, theta: f64) -> Self {
        let (s, co) = (theta / 2.0).sin_cos();
        let identity = Array2::<Complex64>::eye(pauli.dim());
        Self::from_array(identity.mapv(|v| v * co) + pauli.matrix.mapv(|v| v * c(0.0, -s)))
    }

    pub fn rxx(theta: f64) -> Self {
        Self::pauli_rotation(&Self::x().kron(&Self::x()), theta)
    }

    pub fn ryy(theta: f64) -> Self {
        Self::pauli_rotation(&Self::y().kron(&Self::y()), theta)
    }

    pub fn rzz(theta: f64) -> Self {
        Self::pauli_rotation(&Self::z().kron(&Self::z()), theta)
    }

    /// exp(-i theta/2 Z⊗X), Z on operand 0.
    pub fn rzx(theta: f64) -> Self {
        Self::pauli_rotation(&Self::z().kron(&Self::x()), theta)
    }

    /// Two back-to-back CNOTs with alternating control.
    pub fn dcx() -> Self {
        let cx01 = Self::cx();
        let cx10 = Self::swap().dot(&cx01).dot(&Self::swap());
        cx10.dot(&cx01)
    }

    /// Echoed cross-resonance: RZX(pi/4), X on operand 0, RZX(-pi/4).
    pub fn ecr() -> Self {
        let x0 = Self::x().kron(&Self::identity(1));
        Self::rzx(-FRAC_PI_4).dot(&x0).dot(&Self::rzx(FRAC_PI_4))
    }

    /// Controlled U with an extra global phase on the active block.
    pub fn cu(theta: f64, phi: f64, lambda: f64, gamma: f64) -> Self {
        Self::u(theta, phi, lambda)
            .scaled(Complex64::from_polar(1.0, gamma))
            .with_controls(1)
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// X on the last operand, controlled by all leading operands.
    pub fn multi_controlled_x(num_controls: usize) -> IrResult<Self> {
        Self::x().controlled(num_controls)
    }

    /// Toffoli up to relative phases (Margolus gate).
    pub fn rccx() -> IrResult<Self> {
        let t = 2;
        compose(
            3,
            &[
                (Self::u2(0.0, PI), vec![t]),
                (Self::p(FRAC_PI_4), vec![t]),
                (Self::cx(), vec![1, t]),
                (Self::p(-FRAC_PI_4), vec![t]),
                (Self::cx(), vec![0, t]),
                (Self::p(FRAC_PI_4), vec![t]),
                (Self::cx(), vec![1, t]),
                (Self::p(-FRAC_PI_4), vec![t]),
                (Self::u2(0.0, PI), vec![t]),
            ],
        )
    }

    /// Three-control Toffoli up to relative phases.
    pub fn rc3x() -> IrResult<Self> {
        let t = 3;
        compose(
            4,
            &[
                (Self::u2(0.0, PI), vec![t]),
                (Self::p(FRAC_PI_4), vec![t]),
                (Self::cx(), vec![2, t]),
                (Self::p(-FRAC_PI_4), vec![t]),
                (Self::u2(0.0, PI), vec![t]),
                (Self::cx(), vec![0, t]),
                (Self::p(FRAC_PI_4), vec![t]),
                (Self::cx(), vec![1, t]),
                (Self::p(-FRAC_PI_4), vec![t]),
                (Self::cx(), vec![0, t]),
                (Self::p(FRAC_PI_4), vec![t]),
                (Self::cx(), vec![1, t]),
                (Self::p(-FRAC_PI_4), vec![t]),
                (Self::u2(0.0, PI), vec![t]),
                (Self::p(FRAC_PI_4), vec![t]),
                (Self::cx(), vec![2, t]),
                (Self::p(-FRAC_PI_4), vec![t]),
                (Self::u2(0.0, PI), vec![t]),
            ],
        )
    }
}

/// Multiply out a gate sequence on a small register, first step first.
fn compose(num_qubits: usize, steps: &[(Unitary, Vec<usize>)]) -> IrResult<Unitary> {
    steps
        .iter()
        .try_fold(Unitary::identity(num_qubits), |acc, (gate, operands)| {
            Ok(gate.embed(operands, num_qubits)?.dot(&acc))
        })
}

fn expect_params(kind: OperationKind, params: &[f64], expected: usize) -> IrResult<()> {
    if params.len() != expected {
        return Err(IrError::ParameterCount {
            kind,
            expected,
            got: params.len(),
        });
    }
    if let Some(bad) = params.iter().find(|p| !p.is_finite()) {
        return Err(IrError::InvalidParameter {
            kind,
            reason: format!("{bad} is not finite"),
        });
    }
    Ok(())
}

fn control_count(kind: OperationKind, raw: f64) -> IrResult<usize> {
    if raw < 1.0 || raw.fract() != 0.0 {
        return Err(IrError::InvalidControlCount(kind));
    }
    Ok(raw as usize)
}

/// The `(params) -> unitary` function for a gate kind.
///
/// `params` are the operation's stored parameters; for the multi-controlled
/// kinds these include the control count, which sets the matrix size.
/// Returns `None` for the measurement sentinels and for `mct`, whose
/// control count comes from its qubit groups (see [`mct_unitary`]).
pub fn unitary_fn(kind: OperationKind) -> Option<UnitaryFn> {
    use OperationKind as K;
    let f: UnitaryFn = match kind {
        K::X => |p| fixed(K::X, p, Unitary::x),
        K::Y => |p| fixed(K::Y, p, Unitary::y),
        K::Z => |p| fixed(K::Z, p, Unitary::z),
        K::H => |p| fixed(K::H, p, Unitary::h),
        K::I => |p| fixed(K::I, p, || Unitary::identity(1)),
        K::S => |p| fixed(K::S, p, Unitary::s),
        K::Sdg => |p| fixed(K::Sdg, p, Unitary::sdg),
        K::T => |p| fixed(K::T, p, Unitary::t),
        K::Td => |p| fixed(K::Td, p, Unitary::tdg),
        K::Sx => |p| fixed(K::Sx, p, Unitary::sx),
        K::Sxd => |p| fixed(K::Sxd, p, Unitary::sxdg),
        K::Rx => |p| {
            expect_params(K::Rx, p, 1)?;
            Ok(Unitary::rx(p[0]))
        },
        K::Ry => |p| {
            expect_params(K::Ry, p, 1)?;
            Ok(Unitary::ry(p[0]))
        },
        K::Rz => |p| {
            expect_params(K::Rz, p, 1)?;
            Ok(Unitary::rz(p[0]))
        },
        K::P => |p| {
            expect_params(K::P, p, 1)?;
            Ok(Unitary::p(p[0]))
        },
        K::U1 => |p| {
            expect_params(K::U1, p, 1)?;
            Ok(Unitary::p(p[0]))
        },
        K::R => |p| {
            expect_params(K::R, p, 2)?;
            Ok(Unitary::r(p[0], p[1]))
        },
        K::U2 => |p| {
            expect_params(K::U2, p, 2)?;
            Ok(Unitary::u2(p[0], p[1]))
        },
        K::U => |p| {
            expect_params(K::U, p, 3)?;
            Ok(Unitary::u(p[0], p[1], p[2]))
        },
        K::U3 => |p| {
            expect_params(K::U3, p, 3)?;
            Ok(Unitary::u(p[0], p[1], p[2]))
        },
        K::Cx => |p| fixed(K::Cx, p, Unitary::cx),
        K::Cy => |p| fixed(K::Cy, p, || Unitary::y().with_controls(1)),
        K::Cz => |p| fixed(K::Cz, p, || Unitary::z().with_controls(1)),
        K::Ch => |p| fixed(K::Ch, p, || Unitary::h().with_controls(1)),
        K::Csx => |p| fixed(K::Csx, p, || Unitary::sx().with_controls(1)),
        K::Swap => |p| fixed(K::Swap, p, Unitary::swap),
        K::Iswap => |p| fixed(K::Iswap, p, Unitary::iswap),
        K::Dcx => |p| fixed(K::Dcx, p, Unitary::dcx),
        K::Ecr => |p| fixed(K::Ecr, p, Unitary::ecr),
        K::Rxx => |p| {
            expect_params(K::Rxx, p, 1)?;
            Ok(Unitary::rxx(p[0]))
        },
        K::Ryy => |p| {
            expect_params(K::Ryy, p, 1)?;
            Ok(Unitary::ryy(p[0]))
        },
        K::Rzz => |p| {
            expect_params(K::Rzz, p, 1)?;
            Ok(Unitary::rzz(p[0]))
        },
        K::Rzx => |p| {
            expect_params(K::Rzx, p, 1)?;
            Ok(Unitary::rzx(p[0]))
        },
        K::Crx => |p| {
            expect_params(K::Crx, p, 1)?;
            Ok(Unitary::rx(p[0]).with_controls(1))
        },
        K::Cry => |p| {
            expect_params(K::Cry, p, 1)?;
            Ok(Unitary::ry(p[0]).with_controls(1))
        },
        K::Crz => |p| {
            expect_params(K::Crz, p, 1)?;
            Ok(Unitary::rz(p[0]).with_controls(1))
        },
        K::Cphase => |p| {
            expect_params(K::Cphase, p, 1)?;
            Ok(Unitary::p(p[0]).with_controls(1))
        },
        K::Cu1 => |p| {
            expect_params(K::Cu1, p, 1)?;
            Ok(Unitary::p(p[0]).with_controls(1))
        },
        K::Cu3 => |p| {
            expect_params(K::Cu3, p, 3)?;
            Ok(Unitary::u(p[0], p[1], p[2]).with_controls(1))
        },
        K::Cu => |p| {
            expect_params(K::Cu, p, 4)?;
            Ok(Unitary::cu(p[0], p[1], p[2], p[3]))
        },
        K::Ccx => |p| fixed(K::Ccx, p, || Unitary::x().with_controls(2)),
        K::Cswap => |p| fixed(K::Cswap, p, || Unitary::swap().with_controls(1)),
        K::Rccx => |p| {
            expect_params(K::Rccx, p, 0)?;
            Unitary::rccx()
        },
        K::Rc3x => |p| {
            expect_params(K::Rc3x, p, 0)?;
            Unitary::rc3x()
        },
        K::C3x => |p| fixed(K::C3x, p, || Unitary::x().with_controls(3)),
        K::C3sx => |p| fixed(K::C3sx, p, || Unitary::sx().with_controls(3)),
        K::C4x => |p| fixed(K::C4x, p, || Unitary::x().with_controls(4)),
        K::Mcx => |p| {
            expect_params(K::Mcx, p, 1)?;
            Unitary::multi_controlled_x(control_count(K::Mcx, p[0])?)
        },
        K::McxGrayCode => |p| {
            expect_params(K::McxGrayCode, p, 1)?;
            Unitary::multi_controlled_x(control_count(K::McxGrayCode, p[0])?)
        },
        K::McxRecursive => |p| {
            expect_params(K::McxRecursive, p, 1)?;
            Unitary::multi_controlled_x(control_count(K::McxRecursive, p[0])?)
        },
        K::McxVchain => |p| {
            expect_params(K::McxVchain, p, 2)?;
            Unitary::multi_controlled_x(control_count(K::McxVchain, p[0])?)
        },
        K::Mcp => |p| {
            expect_params(K::Mcp, p, 2)?;
            Unitary::p(p[0]).controlled(control_count(K::Mcp, p[1])?)
        },
        K::Mct | K::Measure | K::MeasureAll => return None,
    };
    Some(f)
}

fn fixed(kind: OperationKind, params: &[f64], build: impl FnOnce() -> Unitary) -> IrResult<Unitary> {
    expect_params(kind, params, 0)?;
    Ok(build())
}

/// Unitary of an `mct` with `num_controls` controls (ancillas excluded).
pub fn mct_unitary(num_controls: usize) -> IrResult<Unitary> {
    if num_controls == 0 {
        return Err(IrError::InvalidControlCount(OperationKind::Mct));
    }
    Unitary::multi_controlled_x(num_controls)
}

/// Unitary of any gate kind with the given stored parameters.
pub fn unitary_for(kind: OperationKind, params: &[f64]) -> IrResult<Unitary> {
    let f = unitary_fn(kind).ok_or(IrError::NotUnitary(kind))?;
    f(params)
}

/// Whether two matrices agree up to a global phase.
pub fn equal_up_to_phase(a: &Unitary, b: &Unitary) -> bool {
    if a.dim() != b.dim() {
        return false;
    }
    let Some((ai, bi)) = a
        .matrix
        .iter()
        .zip(b.matrix.iter())
        .find(|(x, _)| x.norm() > EPSILON)
    else {
        return b.matrix.iter().all(|v| v.norm() < EPSILON);
    };
    if bi.norm() < EPSILON {
        return false;
    }
    let phase = ai / bi;
    a.approx_eq(&b.scaled(phase), 1e-9)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_params(kind: OperationKind) -> Vec<f64> {
        match kind {
            OperationKind::Mcx | OperationKind::McxGrayCode | OperationKind::McxRecursive => {
                vec![3.0]
            }
            OperationKind::McxVchain => vec![2.0, 0.0],
            OperationKind::Mcp => vec![0.3, 2.0],
            _ => (0..kind.num_params()).map(|i| 0.37 + i as f64).collect(),
        }
    }

    #[test]
    fn test_every_gate_is_unitary() {
        for kind in OperationKind::ALL {
            let Some(f) = unitary_fn(kind) else {
                assert!(matches!(
                    kind,
                    OperationKind::Mct | OperationKind::Measure | OperationKind::MeasureAll
                ));
                continue;
            };
            let u = f(&sample_params(kind)).unwrap();
            assert!(u.is_unitary(1e-9), "{kind} is not unitary");
            if let Some(n) = kind.num_qubits() {
                assert_eq!(u.num_qubits(), n as usize, "{kind} has the wrong arity");
            }
        }
    }

    #[test]
    fn test_parameter_count_checked() {
        let err = unitary_for(OperationKind::Rx, &[]).unwrap_err();
        assert_eq!(
            err,
            IrError::ParameterCount {
                kind: OperationKind::Rx,
                expected: 1,
                got: 0
            }
        );
        assert!(matches!(
            unitary_for(OperationKind::Rz, &[f64::NAN]),
            Err(IrError::InvalidParameter { .. })
        ));
        assert!(matches!(
            unitary_for(OperationKind::Mcx, &[0.0]),
            Err(IrError::InvalidControlCount(OperationKind::Mcx))
        ));
        assert!(matches!(
            unitary_for(OperationKind::Measure, &[]),
            Err(IrError::NotUnitary(_))
        ));
    }

    #[test]
    fn test_known_identities() {
        // u2(0, pi) is H
        assert!(Unitary::u2(0.0, PI).approx_eq(&Unitary::h(), 1e-10));
        // SX squared is X
        assert!(Unitary::sx().dot(&Unitary::sx()).approx_eq(&Unitary::x(), 1e-10));
        // R(theta, 0) is RX(theta)
        assert!(Unitary::r(0.7, 0.0).approx_eq(&Unitary::rx(0.7), 1e-10));
        // U(theta, 0, 0) is RY(theta)
        assert!(Unitary::u(0.7, 0.0, 0.0).approx_eq(&Unitary::ry(0.7), 1e-10));
        // RZ equals P up to global phase
        assert!(equal_up_to_phase(&Unitary::rz(0.9), &Unitary::p(0.9)));
        // cu with zero gamma is cu3
        assert!(
            Unitary::cu(0.1, 0.2, 0.3, 0.0)
                .approx_eq(&Unitary::u(0.1, 0.2, 0.3).controlled(1).unwrap(), 1e-10)
        );
    }

    #[test]
    fn test_relative_phase_toffolis() {
        let rccx = Unitary::rccx().unwrap();
        let ccx = Unitary::multi_controlled_x(2).unwrap();
        for r in 0..8 {
            for col in 0..8 {
                assert!((rccx.get(r, col).norm() - ccx.get(r, col).norm()).abs() < 1e-10);
            }
        }

        let rc3x = Unitary::rc3x().unwrap();
        let c3x = Unitary::multi_controlled_x(3).unwrap();
        for r in 0..16 {
            for col in 0..16 {
                assert!((rc3x.get(r, col).norm() - c3x.get(r, col).norm()).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_controlled_layout() {
        let cx = Unitary::cx();
        // |10> -> |11>
        assert!((cx.get(3, 2) - c(1.0, 0.0)).norm() < EPSILON);
        assert!((cx.get(2, 3) - c(1.0, 0.0)).norm() < EPSILON);
        assert!((cx.get(0, 0) - c(1.0, 0.0)).norm() < EPSILON);
    }

    #[test]
    fn test_wide_controls_rejected() {
        let at_cap = Unitary::x().controlled(MAX_DENSE_QUBITS - 1).unwrap();
        assert_eq!(at_cap.num_qubits(), MAX_DENSE_QUBITS);

        for controls in [MAX_DENSE_QUBITS, 63, 64, usize::MAX] {
            assert!(matches!(
                Unitary::x().controlled(controls),
                Err(IrError::MatrixTooLarge { max: MAX_DENSE_QUBITS, .. })
            ));
        }
        assert!(matches!(mct_unitary(64), Err(IrError::MatrixTooLarge { num_qubits: 65, .. })));
        assert!(unitary_for(OperationKind::Mcp, &[0.5, 40.0]).is_err());
    }

    #[test]
    fn test_embed_reverses_cx() {
        let cx10 = Unitary::cx().embed(&[1, 0], 2).unwrap();
        // control on register qubit 1 (LSB): |01> -> |11>
        assert!((cx10.get(3, 1) - c(1.0, 0.0)).norm() < EPSILON);
        assert!(Unitary::cx().embed(&[0, 2], 2).is_err());
    }

    #[test]
    fn test_dcx_is_cx_then_reversed_cx() {
        let dcx = Unitary::dcx();
        // |01> -> cx01 -> |01> -> cx10 -> |11>
        assert!((dcx.get(3, 1) - c(1.0, 0.0)).norm() < EPSILON);
    }

    #[test]
    fn test_from_vec_validates_shape() {
        assert!(Unitary::from_vec(3, vec![c(1.0, 0.0); 9]).is_err());
        assert!(Unitary::from_vec(2, vec![c(1.0, 0.0); 3]).is_err());
        let id = Unitary::from_vec(2, vec![c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0)]);
        assert_eq!(id.unwrap(), Unitary::identity(1));
    }
}
