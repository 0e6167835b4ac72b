//! Host-supplied dependencies for runtime assembly.

use std::sync::Arc;

use crate::bus::EventBus;
use crate::module::{Cache, ModuleCatalog, ModuleOptions, Storage};

/// Builder for the handles the runtime injects into modules.
///
/// Anything left unset falls back to a default at assembly time (the event
/// bus) or stays absent (cache, storage); modules check presence themselves.
#[derive(Debug, Default)]
pub struct RuntimeOptions {
    pub(crate) event_bus: Option<Arc<dyn EventBus>>,
    pub(crate) cache: Option<Arc<dyn Cache>>,
    pub(crate) storage: Option<Arc<dyn Storage>>,
    pub(crate) catalog: ModuleCatalog,
}

impl RuntimeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default in-memory event bus.
    pub fn with_event_bus(mut self, bus: Arc<dyn EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Supply the catalog of loadable modules.
    pub fn with_catalog(mut self, catalog: ModuleCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub(crate) fn module_options(&self, bus: Arc<dyn EventBus>) -> ModuleOptions {
        let mut options = ModuleOptions::new().with_event_bus(bus);
        if let Some(cache) = &self.cache {
            options = options.with_cache(cache.clone());
        }
        if let Some(storage) = &self.storage {
            options = options.with_storage(storage.clone());
        }
        options
    }
}
