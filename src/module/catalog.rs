//! Compile-time module catalog.
//!
//! Loading native plugins from disk has no safe equivalent here, so dynamic
//! modules are instead linked into the binary and exposed through this
//! catalog: a registry of constructors keyed by module id, with configuration
//! deciding which entries get materialized. The load path keeps the original
//! resolve/construct/verify steps, just without the filesystem.

use std::collections::HashMap;
use std::sync::Arc;

use super::Module;
use crate::types::{Error, Result};

/// Constructor producing a fresh module instance.
pub type ModuleConstructor = Arc<dyn Fn() -> Arc<dyn Module> + Send + Sync>;

/// Registry of loadable module constructors, keyed by module id.
///
/// Built once by the bootstrapper before the runtime starts; loading never
/// mutates it.
#[derive(Default)]
pub struct ModuleCatalog {
    entries: HashMap<String, ModuleConstructor>,
}

impl std::fmt::Debug for ModuleCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleCatalog")
            .field("ids", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under `id`. Last registration wins; the
    /// catalog is assembled single-threaded at bootstrap.
    pub fn register<F>(&mut self, id: impl Into<String>, constructor: F)
    where
        F: Fn() -> Arc<dyn Module> + Send + Sync + 'static,
    {
        let id = id.into();
        tracing::debug!(id = %id, "catalog entry registered");
        self.entries.insert(id, Arc::new(constructor));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Resolve `id` to a module instance.
    ///
    /// An unknown id fails with `ModuleNotFound`. A constructor whose module
    /// reports a different id than the one it was registered under violates
    /// the contract and fails with `InvalidModuleType`.
    pub fn load(&self, id: &str) -> Result<Arc<dyn Module>> {
        let constructor = self
            .entries
            .get(id)
            .ok_or_else(|| Error::module_not_found(id))?;

        let module = constructor();
        if module.id() != id {
            tracing::error!(
                requested = id,
                reported = module.id(),
                "catalog entry id mismatch"
            );
            return Err(Error::invalid_module_type(format!(
                "catalog entry {} produced module reporting id {}",
                id,
                module.id()
            )));
        }
        Ok(module)
    }
}
