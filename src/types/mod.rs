//! Core types for the modulith runtime.
//!
//! This module provides foundational types used throughout the system:
//! - **IDs**: Strongly-typed identifiers (SubscriberId)
//! - **Errors**: Runtime error types with thiserror derives
//! - **Config**: Configuration structures for the runtime, bus, and module selection

mod config;
mod errors;
mod ids;

pub use config::{BusConfig, Config, ModuleConfig, ObservabilityConfig, RuntimeConfig};
pub use errors::{Error, ModuleError, Result};
pub use ids::SubscriberId;
