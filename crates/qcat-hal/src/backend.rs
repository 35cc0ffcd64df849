//! Backend trait.
//!
//! A backend owns one provider's gate map, translator, drawer, and
//! executor:
//!
//! ```text
//!   Circuit ──translate()──→ Native ──execute()──→ ExecutionResult
//!                              │
//!                              └────draw()──→ String
//! ```
//!
//! | Method | Returns |
//! |--------|---------|
//! | `provider()` | `Provider` |
//! | `name()` | `&str` |
//! | `translate()` | `HalResult<Self::Native>` |
//! | `execute()` | `HalResult<ExecutionResult>` |
//! | `draw()` | `String` |
//!
//! [`DynBackend`] is the object-safe face of [`Backend`], implemented for
//! every backend. The dispatcher stores backends and their translations
//! behind it without knowing the concrete native types.

use qcat_ir::Circuit;

use crate::error::{HalError, HalResult};
use crate::native::NativeCircuit;
use crate::options::ExecuteOptions;
use crate::provider::Provider;
use crate::result::ExecutionResult;

/// A provider backend.
///
/// # Contract
///
/// - `translate()` is pure: the same circuit always yields an equal native
///   circuit, and the input is never modified.
/// - `translate()` fails with [`HalError::UnsupportedOperation`] on the
///   first operation kind missing from the gate map.
/// - `execute()` runs locally when the options carry neither credentials
///   nor a device, and fails with [`HalError::MissingCredentials`] when a
///   device is named without credentials.
pub trait Backend: Send + Sync {
    /// Translated circuit type.
    type Native: NativeCircuit + Clone;

    /// Provider this backend serves.
    fn provider(&self) -> Provider;

    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Lower a circuit to the native representation.
    fn translate(&self, circuit: &Circuit) -> HalResult<Self::Native>;

    /// Run a translated circuit.
    fn execute(
        &self,
        native: &Self::Native,
        options: &ExecuteOptions,
    ) -> HalResult<ExecutionResult>;

    /// Text diagram of a translated circuit.
    fn draw(&self, native: &Self::Native) -> String;
}

/// Object-safe wrapper over [`Backend`].
pub trait DynBackend: Send + Sync {
    /// Provider this backend serves.
    fn provider(&self) -> Provider;

    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Lower a circuit to a boxed native circuit.
    fn translate_dyn(&self, circuit: &Circuit) -> HalResult<Box<dyn NativeCircuit>>;

    /// Run a native circuit produced by this backend.
    fn execute_dyn(
        &self,
        native: &dyn NativeCircuit,
        options: &ExecuteOptions,
    ) -> HalResult<ExecutionResult>;

    /// Draw a native circuit produced by this backend.
    fn draw_dyn(&self, native: &dyn NativeCircuit) -> HalResult<String>;
}

impl<B: Backend> DynBackend for B {
    fn provider(&self) -> Provider {
        Backend::provider(self)
    }

    fn name(&self) -> &str {
        Backend::name(self)
    }

    fn translate_dyn(&self, circuit: &Circuit) -> HalResult<Box<dyn NativeCircuit>> {
        Ok(Box::new(Backend::translate(self, circuit)?))
    }

    fn execute_dyn(
        &self,
        native: &dyn NativeCircuit,
        options: &ExecuteOptions,
    ) -> HalResult<ExecutionResult> {
        Backend::execute(self, downcast::<B>(self, native)?, options)
    }

    fn draw_dyn(&self, native: &dyn NativeCircuit) -> HalResult<String> {
        Ok(Backend::draw(self, downcast::<B>(self, native)?))
    }
}

fn downcast<'a, B: Backend>(
    backend: &B,
    native: &'a dyn NativeCircuit,
) -> HalResult<&'a B::Native> {
    native.downcast_ref::<B::Native>().ok_or_else(|| {
        HalError::Backend(format!(
            "circuit translated for '{}' cannot run on '{}'",
            native.provider(),
            Backend::provider(backend)
        ))
    })
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::*;
    use crate::result::Counts;

    #[derive(Debug, Clone, PartialEq)]
    struct ToyNative {
        provider: Provider,
        ops: usize,
    }

    impl NativeCircuit for ToyNative {
        fn provider(&self) -> Provider {
            self.provider
        }
        fn num_qubits(&self) -> u32 {
            1
        }
        fn len(&self) -> usize {
            self.ops
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct ToyBackend;

    impl Backend for ToyBackend {
        type Native = ToyNative;

        fn provider(&self) -> Provider {
            Provider::Ibm
        }
        fn name(&self) -> &str {
            "toy"
        }
        fn translate(&self, circuit: &Circuit) -> HalResult<ToyNative> {
            Ok(ToyNative {
                provider: Provider::Ibm,
                ops: circuit.len(),
            })
        }
        fn execute(&self, native: &ToyNative, _: &ExecuteOptions) -> HalResult<ExecutionResult> {
            let mut counts = Counts::new();
            counts.insert("0", native.ops as u64);
            Ok(ExecutionResult::counts(Provider::Ibm, "toy", counts, 1))
        }
        fn draw(&self, native: &ToyNative) -> String {
            format!("toy[{}]", native.ops)
        }
    }

    #[derive(Debug, Clone)]
    struct OtherNative;

    impl NativeCircuit for OtherNative {
        fn provider(&self) -> Provider {
            Provider::Google
        }
        fn num_qubits(&self) -> u32 {
            1
        }
        fn len(&self) -> usize {
            0
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_dyn_roundtrip() {
        let backend: Box<dyn DynBackend> = Box::new(ToyBackend);
        let mut circuit = Circuit::new(1);
        circuit.h(qcat_ir::QubitId(0)).unwrap();

        let native = backend.translate_dyn(&circuit).unwrap();
        assert_eq!(native.len(), 1);
        assert_eq!(backend.draw_dyn(native.as_ref()).unwrap(), "toy[1]");

        let result = backend
            .execute_dyn(native.as_ref(), &ExecuteOptions::default())
            .unwrap();
        assert_eq!(result.as_counts().unwrap().get("0"), 1);
    }

    #[test]
    fn test_foreign_native_is_rejected() {
        let backend: Box<dyn DynBackend> = Box::new(ToyBackend);
        let err = backend.draw_dyn(&OtherNative).unwrap_err();
        assert!(err.to_string().contains("google"));
    }
}
