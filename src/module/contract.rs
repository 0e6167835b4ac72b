//! The module contract.
//!
//! A module is a self-contained unit of application functionality with a
//! four-stage lifecycle: initialize, start, stop, plus static identity.
//! Optional capabilities are declared through explicit hook accessors rather
//! than discovered structurally, so the set of capabilities a module carries
//! is enumerable at registration time.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::ModuleOptions;
use crate::types::Result;

/// Lifecycle and identity contract implemented by every module.
///
/// `initialize` always runs before the module enters the registry, and
/// `start` is only ever invoked on registered modules, so initialization is
/// guaranteed to precede startup by construction.
///
/// `dependencies` is declarative only: startup iterates the registry in
/// unspecified order and does not topologically sort by it. Modules that
/// need another module running first must tolerate it starting later.
#[async_trait]
pub trait Module: Send + Sync + std::fmt::Debug {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn version(&self) -> &str;
    fn description(&self) -> &str;

    /// Ids of modules this one depends on. Documentation for operators and
    /// tooling; never consulted by the startup path.
    fn dependencies(&self) -> &[String] {
        &[]
    }

    /// Prepare the module with its injected dependencies. Runs outside any
    /// registry lock; a failure keeps the module out of the registry.
    async fn initialize(&self, options: &ModuleOptions) -> Result<()>;

    /// Begin doing work. Runs sequentially on the caller's task during
    /// `start_all_modules`.
    async fn start(&self, cancel: &CancellationToken) -> Result<()>;

    /// Release resources. Orchestrated by the host, not by the manager.
    async fn stop(&self, cancel: &CancellationToken) -> Result<()>;

    /// Hook for contributing HTTP routes, if this module has any.
    fn route_hook(&self) -> Option<&dyn RouteContributor> {
        None
    }

    /// Hook for contributing RPC services, if this module has any.
    fn service_hook(&self) -> Option<&dyn ServiceContributor> {
        None
    }
}

/// Capability: the module exposes HTTP routes.
///
/// The registrar is implemented by the host's web server adapter; the core
/// only carries the call through.
pub trait RouteContributor {
    fn register_routes(&self, registrar: &mut dyn RouteRegistrar);
}

/// Capability: the module exposes RPC services.
pub trait ServiceContributor {
    fn register_services(&self, registrar: &mut dyn ServiceRegistrar);
}

/// Route sink supplied by the host's web server adapter.
pub trait RouteRegistrar {
    fn route(&mut self, method: &str, path: &str);
}

/// Service sink supplied by the host's RPC server adapter.
pub trait ServiceRegistrar {
    fn service(&mut self, name: &str);
}
