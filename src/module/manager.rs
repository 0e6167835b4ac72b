//! Module registry and lifecycle orchestration.
//!
//! Registration is fail-fast and non-transactional: a failed initialize
//! keeps the module out of the registry, a failed registration mid-batch
//! leaves earlier registrations in place, and a failed start leaves earlier
//! modules running. Partial states are expected outcomes the host must
//! handle; there is no rollback and no compensating stop.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use super::catalog::ModuleCatalog;
use super::{Module, ModuleOptions};
use crate::types::{Error, ModuleConfig, Result};

/// Registry of modules keyed by id, guarded by a single reader/writer lock.
///
/// Ids are unique: a second registration with an id already present is
/// rejected and the original entry retained. Entries are never removed.
#[derive(Debug)]
pub struct ModuleManager {
    modules: RwLock<HashMap<String, Arc<dyn Module>>>,
    options: ModuleOptions,
}

impl ModuleManager {
    pub fn new(options: ModuleOptions) -> Self {
        Self {
            modules: RwLock::new(HashMap::new()),
            options,
        }
    }

    /// The dependency bag handed to each module's `initialize`.
    pub fn options(&self) -> &ModuleOptions {
        &self.options
    }

    /// Initialize a module and add it to the registry.
    ///
    /// `initialize` runs outside any lock; if it fails, its error propagates
    /// unchanged and the registry is untouched. The exclusive lock is held
    /// only for the duplicate check and insert.
    pub async fn register_module(&self, module: Arc<dyn Module>) -> Result<()> {
        if let Err(err) = module.initialize(&self.options).await {
            tracing::error!(id = module.id(), error = %err, "failed to initialize module");
            return Err(err);
        }

        let mut modules = self.modules.write().await;
        if modules.contains_key(module.id()) {
            let err = Error::duplicate_module(module.id());
            tracing::error!(id = module.id(), "module registration failed: duplicate id");
            return Err(err);
        }

        tracing::info!(
            id = module.id(),
            name = module.name(),
            version = module.version(),
            "module registered"
        );
        modules.insert(module.id().to_string(), module);
        Ok(())
    }

    /// Register modules in order, stopping at the first failure.
    ///
    /// Modules registered before the failure stay registered.
    pub async fn register_modules(&self, modules: Vec<Arc<dyn Module>>) -> Result<()> {
        for module in modules {
            self.register_module(module).await?;
        }
        Ok(())
    }

    /// Look up a module by id. Absence is not an error.
    pub async fn get_module(&self, id: &str) -> Option<Arc<dyn Module>> {
        self.modules.read().await.get(id).cloned()
    }

    /// Snapshot of the registry, insulated from concurrent registration.
    pub async fn get_modules(&self) -> HashMap<String, Arc<dyn Module>> {
        self.modules.read().await.clone()
    }

    /// Start every registered module sequentially on the caller's task.
    ///
    /// Stops at the first failure and returns it; modules after the failing
    /// one are never started. Iteration follows the registry map's
    /// enumeration order; it is not sorted by declared dependencies.
    pub async fn start_all_modules(&self, cancel: &CancellationToken) -> Result<()> {
        tracing::info!("starting all modules");
        let modules = self.get_modules().await;
        for module in modules.values() {
            if let Err(err) = module.start(cancel).await {
                tracing::error!(id = module.id(), error = %err, "failed to start module");
                return Err(err);
            }
            tracing::debug!(id = module.id(), "module started");
        }
        Ok(())
    }

    /// Materialize one module from the catalog and register it.
    ///
    /// Fail-fast: an unknown id or a contract violation propagates and the
    /// registry is untouched. Catalog-loaded modules go through the same
    /// `register_module` path as statically registered ones.
    pub async fn load_and_register_module(
        &self,
        catalog: &ModuleCatalog,
        id: &str,
    ) -> Result<()> {
        let module = catalog.load(id)?;
        self.register_module(module).await
    }

    /// Load every enabled catalog entry, best-effort.
    ///
    /// Disabled entries are skipped. Entries with an empty id and per-entry
    /// load failures are logged and skipped without aborting the batch,
    /// the opposite of `register_modules`' fail-fast contract.
    pub async fn load_all_modules(&self, catalog: &ModuleCatalog, configs: &[ModuleConfig]) {
        tracing::info!("loading catalog modules");
        for entry in configs {
            if !entry.enable {
                continue;
            }
            if entry.id.is_empty() {
                tracing::error!(name = %entry.name, "module id is required, entry skipped");
                continue;
            }
            if let Err(err) = self.load_and_register_module(catalog, &entry.id).await {
                tracing::error!(id = %entry.id, name = %entry.name, error = %err, "failed to load module");
            }
        }
    }
}
