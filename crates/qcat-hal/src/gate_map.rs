//! Per-backend gate capability tables.
//!
//! A [`GateMap`] maps every [`OperationKind`] a backend accepts to either a
//! native gate constructor, a custom gate defined by a closed-form unitary,
//! or one of the sentinels that translators special-case. Kinds absent from
//! the table are rejected with [`HalError::UnsupportedOperation`].

use std::fmt;

use qcat_ir::{IrResult, OperationKind, Unitary, UnitaryFn, unitary_fn};
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::error::{HalError, HalResult};
use crate::provider::Provider;

/// Constructor of a backend-native gate from the operation's parameters.
///
/// Translators validate the parameter count before calling it.
pub type NativeCtor<G> = fn(&[f64]) -> G;

/// A gate the backend lacks natively, registered from its unitary.
#[derive(Clone, Copy)]
pub struct CustomGateDef {
    /// Operation kind this definition implements.
    pub kind: OperationKind,
    /// Name the backend shows for the gate.
    pub name: &'static str,
    unitary: UnitaryFn,
}

impl CustomGateDef {
    /// Evaluate the unitary for concrete parameters.
    pub fn unitary(&self, params: &[f64]) -> IrResult<Unitary> {
        (self.unitary)(params)
    }
}

impl fmt::Debug for CustomGateDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomGateDef")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// How a backend realizes one operation kind.
pub enum GateEntry<G> {
    /// A gate from the backend's own library.
    Native(NativeCtor<G>),
    /// A unitary-defined extension gate.
    Custom(CustomGateDef),
    /// Single-qubit measurement.
    Measure,
    /// Measure every qubit.
    MeasureAll,
    /// X controlled by N qubits, built from the control list directly.
    MultiControlledX,
}

impl<G> GateEntry<G> {
    /// Short label for diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            GateEntry::Native(_) => "native",
            GateEntry::Custom(_) => "custom",
            GateEntry::Measure => "measure",
            GateEntry::MeasureAll => "measure_all",
            GateEntry::MultiControlledX => "multi_controlled_x",
        }
    }
}

impl<G> fmt::Debug for GateEntry<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateEntry::Custom(def) => f.debug_tuple("Custom").field(def).finish(),
            other => f.write_str(other.label()),
        }
    }
}

/// Immutable gate table of one backend.
pub struct GateMap<G> {
    provider: Provider,
    entries: FxHashMap<OperationKind, GateEntry<G>>,
}

impl<G> GateMap<G> {
    /// Start building a table for `provider`.
    pub fn builder(provider: Provider) -> GateMapBuilder<G> {
        GateMapBuilder {
            provider,
            entries: FxHashMap::default(),
        }
    }

    /// Provider this table belongs to.
    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Look up how `kind` is realized.
    pub fn get(&self, kind: OperationKind) -> HalResult<&GateEntry<G>> {
        self.entries
            .get(&kind)
            .ok_or(HalError::UnsupportedOperation {
                kind,
                provider: self.provider,
            })
    }

    /// Whether `kind` has an entry.
    pub fn supports(&self, kind: OperationKind) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Mapped kinds in code order.
    pub fn kinds(&self) -> Vec<OperationKind> {
        let mut kinds: Vec<_> = self.entries.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Kinds realized as custom gates, in code order.
    pub fn custom_kinds(&self) -> Vec<OperationKind> {
        let mut kinds: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, e)| matches!(e, GateEntry::Custom(_)))
            .map(|(k, _)| *k)
            .collect();
        kinds.sort();
        kinds
    }

    /// Number of mapped kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<G> fmt::Debug for GateMap<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateMap")
            .field("provider", &self.provider)
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// Builder for [`GateMap`].
pub struct GateMapBuilder<G> {
    provider: Provider,
    entries: FxHashMap<OperationKind, GateEntry<G>>,
}

impl<G> GateMapBuilder<G> {
    /// Map `kind` to a native constructor.
    #[must_use]
    pub fn native(mut self, kind: OperationKind, ctor: NativeCtor<G>) -> Self {
        self.entries.insert(kind, GateEntry::Native(ctor));
        self
    }

    /// Map `kind` to a custom gate built from its closed-form unitary.
    ///
    /// Kinds without a unitary (measurements, `mct`) cannot be custom gates
    /// and are left unmapped.
    #[must_use]
    pub fn custom(mut self, kind: OperationKind) -> Self {
        match unitary_fn(kind) {
            Some(unitary) => {
                self.entries.insert(
                    kind,
                    GateEntry::Custom(CustomGateDef {
                        kind,
                        name: kind.name(),
                        unitary,
                    }),
                );
            }
            None => warn!(
                "{} gate map: '{}' has no unitary and was not registered",
                self.provider, kind
            ),
        }
        self
    }

    /// Map several kinds to custom gates.
    #[must_use]
    pub fn custom_all(self, kinds: &[OperationKind]) -> Self {
        kinds.iter().fold(self, |builder, kind| builder.custom(*kind))
    }

    /// Map the measurement and multi-controlled-X sentinels.
    #[must_use]
    pub fn sentinels(mut self) -> Self {
        self.entries.insert(OperationKind::Measure, GateEntry::Measure);
        self.entries
            .insert(OperationKind::MeasureAll, GateEntry::MeasureAll);
        self.entries
            .insert(OperationKind::Mct, GateEntry::MultiControlledX);
        self
    }

    /// Route `kind` through the multi-controlled-X sentinel.
    #[must_use]
    pub fn multi_controlled_x(mut self, kind: OperationKind) -> Self {
        self.entries.insert(kind, GateEntry::MultiControlledX);
        self
    }

    /// Finish the table.
    pub fn build(self) -> GateMap<G> {
        GateMap {
            provider: self.provider,
            entries: self.entries,
        }
    }
}
