//! Type-erased handle to a translated, backend-native circuit.

use std::any::Any;
use std::fmt;

use crate::provider::Provider;

/// A circuit in a backend's own representation.
///
/// Translators produce concrete types; the dispatcher stores them behind
/// this trait and hands them back to the backend that created them.
pub trait NativeCircuit: Any + fmt::Debug + Send + Sync {
    /// Provider the circuit was translated for.
    fn provider(&self) -> Provider;

    /// Number of qubits on the native register.
    fn num_qubits(&self) -> u32;

    /// Number of native instructions, measurements included.
    fn len(&self) -> usize;

    /// Whether the circuit has no instructions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;
}

impl dyn NativeCircuit {
    /// Downcast to the concrete native type.
    pub fn downcast_ref<T: NativeCircuit>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}
