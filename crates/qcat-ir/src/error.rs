//! Error types for the IR crate.

use crate::operation::OperationKind;
use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur while building or inspecting a circuit.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A qubit index was outside the declared circuit size.
    #[error("Qubit is out of bound: {qubit} (circuit has {num_qubits} qubits, operation: {operation})")]
    QubitOutOfBounds {
        /// The offending qubit.
        qubit: QubitId,
        /// Declared number of qubits.
        num_qubits: u32,
        /// Operation that referenced the qubit.
        operation: OperationKind,
    },

    /// A classical bit index was outside the declared circuit size.
    #[error(
        "Classical Bit is out of bound: {clbit} (circuit has {num_clbits} classical bits, operation: {operation})"
    )]
    ClbitOutOfBounds {
        /// The offending classical bit.
        clbit: ClbitId,
        /// Declared number of classical bits.
        num_clbits: u32,
        /// Operation that referenced the classical bit.
        operation: OperationKind,
    },

    /// A multi-controlled operation was given no control qubits.
    #[error("Operation '{0}' requires at least one control qubit")]
    InvalidControlCount(OperationKind),

    /// Wrong number of parameters for an operation kind.
    #[error("Operation '{kind}' expects {expected} parameters, got {got}")]
    ParameterCount {
        /// The operation kind.
        kind: OperationKind,
        /// Expected parameter count.
        expected: usize,
        /// Provided parameter count.
        got: usize,
    },

    /// A parameter value is not usable (NaN, infinite, or out of range).
    #[error("Invalid parameter for '{kind}': {reason}")]
    InvalidParameter {
        /// The operation kind.
        kind: OperationKind,
        /// Why the parameter was rejected.
        reason: String,
    },

    /// The operation kind has no unitary (measurements).
    #[error("Operation '{0}' has no unitary matrix")]
    NotUnitary(OperationKind),

    /// Matrix data does not describe a square power-of-two matrix.
    #[error("Invalid matrix: {0}")]
    InvalidMatrix(String),

    /// A dense matrix would exceed the supported operand count.
    #[error("Matrix on {num_qubits} qubits exceeds the dense limit of {max}")]
    MatrixTooLarge {
        /// Operand count of the requested matrix.
        num_qubits: usize,
        /// Largest supported operand count.
        max: usize,
    },

    /// An operation name could not be parsed.
    #[error("Unknown operation: '{0}'")]
    UnknownOperation(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
