//! qcat circuit intermediate representation
//!
//! This crate holds the provider-agnostic half of qcat: the catalog of
//! operation kinds, the operation record, the append-only [`Circuit`]
//! builder and the closed-form unitary of every gate.
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qcat_ir::{Circuit, OperationKind, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 2);
//! circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?.measure_all()?;
//!
//! assert_eq!(circuit.len(), 3);
//! assert_eq!(circuit.operations()[1].kind, OperationKind::Cx);
//!
//! // Out-of-range indices are rejected and nothing is appended.
//! assert!(circuit.x(QubitId(2)).is_err());
//! assert_eq!(circuit.len(), 3);
//! # Ok::<(), qcat_ir::IrError>(())
//! ```
//!
//! # Operation layout
//!
//! | Kinds | `qubit_args` | `params` |
//! |-------|--------------|----------|
//! | single-qubit | `[[q]]` | rotation angles |
//! | controlled two-qubit | `[[control], [target]]` | angles |
//! | `ccx`, `c3x`, `c4x`, ... | one group per operand | none |
//! | `mcx`, `mcx_gray_code`, `mcx_recursive` | `[[controls.., target, ancillas..]]` | `[control_count]` |
//! | `mcx_vchain` | `[[controls.., target, ancillas..]]` | `[control_count, dirty]` |
//! | `mcp` | `[[controls.., target]]` | `[lambda, control_count]` |
//! | `mct` | `[[controls..], [target], [ancillas..]]` | none, plus `mode` |
//! | `measure` | `[[q]]` | none, `classical_args` optional |
//! | `measure_all` | `[]` | none |

pub mod circuit;
pub mod error;
pub mod operation;
pub mod qubit;
pub mod unitary;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use operation::{McxMode, Operation, OperationKind};
pub use qubit::{ClbitId, QubitId};
pub use unitary::{MAX_DENSE_QUBITS, Unitary, UnitaryFn, mct_unitary, unitary_fn, unitary_for};
