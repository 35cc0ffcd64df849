//! Backend registry keyed by provider.
//!
//! The [`BackendRegistry`] is the dispatcher's lookup table: one backend
//! per [`Provider`], registered up front.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::backend::DynBackend;
use crate::error::{HalError, HalResult};
use crate::provider::Provider;

/// Registered backends, at most one per provider.
pub struct BackendRegistry {
    backends: FxHashMap<Provider, Box<dyn DynBackend>>,
}

impl BackendRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            backends: FxHashMap::default(),
        }
    }

    /// Register a backend under its own provider, replacing any previous
    /// backend for that provider.
    pub fn register(&mut self, backend: impl DynBackend + 'static) {
        let provider = backend.provider();
        debug!("Registering backend '{}' for {}", backend.name(), provider);
        self.backends.insert(provider, Box::new(backend));
    }

    /// Backend for `provider`.
    pub fn get(&self, provider: Provider) -> HalResult<&dyn DynBackend> {
        self.backends
            .get(&provider)
            .map(Box::as_ref)
            .ok_or(HalError::UnsupportedProvider(provider))
    }

    /// Providers with a registered backend, in declaration order.
    pub fn providers(&self) -> Vec<Provider> {
        let mut providers: Vec<_> = self.backends.keys().copied().collect();
        providers.sort();
        providers
    }

    /// Check if a backend is registered for `provider`.
    pub fn has_backend(&self, provider: Provider) -> bool {
        self.backends.contains_key(&provider)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("providers", &self.providers())
            .finish()
    }
}
