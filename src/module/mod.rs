//! Module lifecycle subsystem.
//!
//! - [`Module`]: the lifecycle and identity contract modules implement
//! - [`ModuleManager`]: registry, registration, and sequential startup
//! - [`ModuleCatalog`]: configuration-selected loading of linked-in modules
//! - [`ModuleOptions`]: the dependency bag injected at initialization

mod catalog;
mod contract;
mod manager;
mod options;

pub use catalog::{ModuleCatalog, ModuleConstructor};
pub use contract::{
    Module, RouteContributor, RouteRegistrar, ServiceContributor, ServiceRegistrar,
};
pub use manager::ModuleManager;
pub use options::{Cache, ModuleOptions, Storage};
