//! Runtime assembly.
//!
//! The [`Runtime`] is what a host process embeds: it wires the event bus and
//! dependency bag into a [`ModuleManager`], loads catalog modules selected by
//! configuration, exposes the capability hook walk, and drives startup.
//! Servers, caches, and storage backends are the host's to construct; the
//! runtime only carries their handles.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::bus::{EventBus, MemoryEventBus};
use crate::module::{
    Module, ModuleCatalog, ModuleManager, RouteRegistrar, ServiceRegistrar,
};
use crate::types::{Config, Result};

mod options;

pub use options::RuntimeOptions;

/// An embeddable modular application runtime.
#[derive(Debug)]
pub struct Runtime {
    config: Config,
    manager: ModuleManager,
    catalog: ModuleCatalog,
    event_bus: Arc<dyn EventBus>,
}

impl Runtime {
    /// Assemble a runtime from configuration and host-supplied handles.
    pub fn new(config: Config, options: RuntimeOptions) -> Self {
        let event_bus = options
            .event_bus
            .clone()
            .unwrap_or_else(|| Arc::new(MemoryEventBus::from_config(&config.bus)));

        let manager = ModuleManager::new(options.module_options(event_bus.clone()));

        tracing::info!(
            name = %config.runtime.name,
            version = %config.runtime.version,
            env = %config.runtime.env,
            "runtime assembled"
        );

        Self {
            config,
            manager,
            catalog: options.catalog,
            event_bus,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn manager(&self) -> &ModuleManager {
        &self.manager
    }

    pub fn event_bus(&self) -> &Arc<dyn EventBus> {
        &self.event_bus
    }

    /// Register statically constructed modules, fail-fast.
    pub async fn register_modules(&self, modules: Vec<Arc<dyn Module>>) -> Result<()> {
        self.manager.register_modules(modules).await
    }

    /// Load the catalog modules selected in `config.modules`, best-effort.
    pub async fn load_modules_from_config(&self) {
        self.manager
            .load_all_modules(&self.catalog, &self.config.modules)
            .await;
    }

    /// Walk registered modules and let route-capable ones contribute routes.
    pub async fn contribute_routes(&self, registrar: &mut dyn RouteRegistrar) {
        let modules = self.manager.get_modules().await;
        for module in modules.values() {
            if let Some(hook) = module.route_hook() {
                tracing::info!(id = module.id(), "registering module routes");
                hook.register_routes(registrar);
            }
        }
    }

    /// Walk registered modules and let service-capable ones contribute RPC services.
    pub async fn contribute_services(&self, registrar: &mut dyn ServiceRegistrar) {
        let modules = self.manager.get_modules().await;
        for module in modules.values() {
            if let Some(hook) = module.service_hook() {
                tracing::info!(id = module.id(), "registering module services");
                hook.register_services(registrar);
            }
        }
    }

    /// Start all registered modules sequentially, fail-fast.
    pub async fn start(&self, cancel: &CancellationToken) -> Result<()> {
        self.manager.start_all_modules(cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{ModuleOptions, RouteContributor};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct RoutedModule;

    #[async_trait]
    impl Module for RoutedModule {
        fn id(&self) -> &str {
            "web"
        }
        fn name(&self) -> &str {
            "web module"
        }
        fn version(&self) -> &str {
            "0.1.0"
        }
        fn description(&self) -> &str {
            "contributes one route"
        }

        async fn initialize(&self, _options: &ModuleOptions) -> Result<()> {
            Ok(())
        }
        async fn start(&self, _cancel: &CancellationToken) -> Result<()> {
            Ok(())
        }
        async fn stop(&self, _cancel: &CancellationToken) -> Result<()> {
            Ok(())
        }

        fn route_hook(&self) -> Option<&dyn RouteContributor> {
            Some(self)
        }
    }

    impl RouteContributor for RoutedModule {
        fn register_routes(&self, registrar: &mut dyn RouteRegistrar) {
            registrar.route("GET", "/healthz");
        }
    }

    #[derive(Debug, Default)]
    struct RecordingRegistrar {
        routes: Vec<(String, String)>,
    }

    impl RouteRegistrar for RecordingRegistrar {
        fn route(&mut self, method: &str, path: &str) {
            self.routes.push((method.to_string(), path.to_string()));
        }
    }

    #[tokio::test]
    async fn default_bus_is_injected_into_modules() {
        let runtime = Runtime::new(Config::default(), RuntimeOptions::new());
        assert!(runtime.manager().options().event_bus().is_some());
    }

    #[tokio::test]
    async fn route_capable_modules_contribute_routes() {
        let runtime = Runtime::new(Config::default(), RuntimeOptions::new());
        runtime
            .register_modules(vec![Arc::new(RoutedModule) as Arc<dyn Module>])
            .await
            .unwrap();

        let mut registrar = RecordingRegistrar::default();
        runtime.contribute_routes(&mut registrar).await;
        assert_eq!(
            registrar.routes,
            vec![("GET".to_string(), "/healthz".to_string())]
        );

        // No service hooks registered; the walk is a no-op.
        #[derive(Debug, Default)]
        struct NoopServices(usize);
        impl ServiceRegistrar for NoopServices {
            fn service(&mut self, _name: &str) {
                self.0 += 1;
            }
        }
        let mut services = NoopServices::default();
        runtime.contribute_services(&mut services).await;
        assert_eq!(services.0, 0);
    }

    #[tokio::test]
    async fn start_runs_registered_modules() {
        let runtime = Runtime::new(Config::default(), RuntimeOptions::new());
        runtime
            .register_modules(vec![Arc::new(RoutedModule) as Arc<dyn Module>])
            .await
            .unwrap();

        let cancel = CancellationToken::new();
        runtime.start(&cancel).await.unwrap();
    }
}
