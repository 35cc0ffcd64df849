//! The provider-dispatching circuit.

use std::ops::{Deref, DerefMut};

use qcat_hal::{
    BackendRegistry, DynBackend, ExecuteOptions, ExecutionResult, HalError, HalResult,
    NativeCircuit, Provider,
};
use qcat_ir::Circuit;
use tracing::{debug, instrument};

use crate::config::QcatConfig;
use crate::default_registry;

/// Cached translation of the IR.
#[derive(Debug)]
enum Cache {
    Untranslated,
    Translated {
        provider: Provider,
        native: Box<dyn NativeCircuit>,
        /// IR generation when translated.
        generation: u64,
    },
}

/// A circuit written once and dispatched to any registered provider.
///
/// Gate methods come from [`Circuit`] through `Deref`/`DerefMut`. `draw`
/// and `execute` translate lazily and keep the last translation; it is
/// reused until a different provider is requested or the IR is borrowed
/// mutably.
///
/// ```
/// use qcat::{ExecuteOptions, Provider, QCircuit, QubitId};
///
/// let mut qc = QCircuit::new(2);
/// qc.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?.measure_all()?;
///
/// let result = qc.execute(Provider::Google, &ExecuteOptions::new().with_seed(7))?;
/// let counts = result.as_counts().unwrap();
/// assert_eq!(counts.get("00") + counts.get("11"), 1000);
///
/// qc.draw(Provider::Google)?;
/// assert_eq!(qc.translation_count(), 1);
/// # Ok::<(), qcat::HalError>(())
/// ```
#[derive(Debug)]
pub struct QCircuit {
    circuit: Circuit,
    provider: Provider,
    options: ExecuteOptions,
    registry: BackendRegistry,
    cache: Cache,
    /// Bumped on every mutable borrow of the IR.
    generation: u64,
    translations: usize,
}

impl QCircuit {
    /// Circuit on `num_qubits` qubits with no classical bits.
    pub fn new(num_qubits: u32) -> Self {
        Self::from_circuit(Circuit::new(num_qubits))
    }

    /// Circuit with `num_clbits` classical bits for targeted measurements.
    pub fn with_clbits(num_qubits: u32, num_clbits: u32) -> Self {
        Self::from_circuit(Circuit::with_size("circuit", num_qubits, num_clbits))
    }

    /// Wrap an existing IR circuit.
    pub fn from_circuit(circuit: Circuit) -> Self {
        Self {
            circuit,
            provider: Provider::default(),
            options: ExecuteOptions::default(),
            registry: default_registry(),
            cache: Cache::Untranslated,
            generation: 0,
            translations: 0,
        }
    }

    /// Circuit whose default provider and run options come from `config`.
    pub fn from_config(num_qubits: u32, num_clbits: u32, config: &QcatConfig) -> Self {
        Self::with_clbits(num_qubits, num_clbits)
            .with_provider(config.default_provider)
            .with_options(config.execute_options())
    }

    /// Set the provider used by [`draw_default`](Self::draw_default) and
    /// [`execute_default`](Self::execute_default).
    #[must_use]
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    /// Set the options used by [`execute_default`](Self::execute_default).
    #[must_use]
    pub fn with_options(mut self, options: ExecuteOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the backend table, e.g. to add a backend for a provider
    /// that has none bundled.
    #[must_use]
    pub fn with_registry(mut self, registry: BackendRegistry) -> Self {
        self.registry = registry;
        self.cache = Cache::Untranslated;
        self
    }

    /// Default provider.
    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Change the default provider.
    pub fn set_provider(&mut self, provider: Provider) {
        self.provider = provider;
    }

    /// Default run options.
    pub fn options(&self) -> &ExecuteOptions {
        &self.options
    }

    /// The IR.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Unwrap into the IR.
    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    /// Number of translations performed so far.
    pub fn translation_count(&self) -> usize {
        self.translations
    }

    /// Provider of the cached translation, if any.
    pub fn translated_for(&self) -> Option<Provider> {
        match &self.cache {
            Cache::Untranslated => None,
            Cache::Translated { provider, .. } => Some(*provider),
        }
    }

    /// Translate for `provider` without touching the cache.
    pub fn translate(&self, provider: Provider) -> HalResult<Box<dyn NativeCircuit>> {
        self.registry.get(provider)?.translate_dyn(&self.circuit)
    }

    /// Cached translation for `provider`, translating if needed.
    pub fn native(&mut self, provider: Provider) -> HalResult<&dyn NativeCircuit> {
        self.ensure_translated(provider)?;
        self.cached()
    }

    /// Text diagram of the circuit in `provider`'s native form.
    pub fn draw(&mut self, provider: Provider) -> HalResult<String> {
        self.ensure_translated(provider)?;
        let backend = self.registry.get(provider)?;
        backend.draw_dyn(self.cached()?)
    }

    /// [`draw`](Self::draw) for the default provider.
    pub fn draw_default(&mut self) -> HalResult<String> {
        self.draw(self.provider)
    }

    /// Run the circuit on `provider`.
    #[instrument(skip(self, options), fields(qubits = self.circuit.num_qubits(), ops = self.circuit.len()))]
    pub fn execute(
        &mut self,
        provider: Provider,
        options: &ExecuteOptions,
    ) -> HalResult<ExecutionResult> {
        self.ensure_translated(provider)?;
        let backend = self.registry.get(provider)?;
        backend.execute_dyn(self.cached()?, options)
    }

    /// [`execute`](Self::execute) with the default provider and options.
    pub fn execute_default(&mut self) -> HalResult<ExecutionResult> {
        let options = self.options.clone();
        self.execute(self.provider, &options)
    }

    fn ensure_translated(&mut self, provider: Provider) -> HalResult<()> {
        let generation = self.generation;
        let fresh = matches!(
            &self.cache,
            Cache::Translated { provider: cached, generation: g, .. }
                if *cached == provider && *g == generation
        );
        if fresh {
            return Ok(());
        }

        let backend: &dyn DynBackend = self.registry.get(provider)?;
        debug!(
            "Translating {} operations for {provider} (cached: {:?})",
            self.circuit.len(),
            self.translated_for()
        );
        let native = backend.translate_dyn(&self.circuit)?;
        self.cache = Cache::Translated {
            provider,
            native,
            generation,
        };
        self.translations += 1;
        Ok(())
    }

    fn cached(&self) -> HalResult<&dyn NativeCircuit> {
        match &self.cache {
            Cache::Translated { native, .. } => Ok(native.as_ref()),
            Cache::Untranslated => Err(HalError::Backend("circuit has not been translated".into())),
        }
    }
}

impl Deref for QCircuit {
    type Target = Circuit;

    fn deref(&self) -> &Circuit {
        &self.circuit
    }
}

impl DerefMut for QCircuit {
    fn deref_mut(&mut self) -> &mut Circuit {
        self.generation = self.generation.wrapping_add(1);
        &mut self.circuit
    }
}

impl From<Circuit> for QCircuit {
    fn from(circuit: Circuit) -> Self {
        Self::from_circuit(circuit)
    }
}
