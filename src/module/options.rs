//! Dependency bag handed to every module's `initialize`.
//!
//! The core threads these handles through without examining them; which ones
//! a module uses is the module's business. The cache and storage contracts
//! exist only as boundary traits; their implementations live outside the
//! runtime.

use async_trait::async_trait;
use std::sync::Arc;

use crate::bus::EventBus;

/// Key/value cache handle. Implemented by host-side adapters.
#[async_trait]
pub trait Cache: Send + Sync + std::fmt::Debug {
    async fn get(&self, key: &str) -> Option<Vec<u8>>;
    async fn set(&self, key: &str, value: Vec<u8>);
    async fn delete(&self, key: &str);
}

/// Persistent storage handle. Implemented by host-side adapters.
#[async_trait]
pub trait Storage: Send + Sync + std::fmt::Debug {
    async fn put(&self, key: &str, value: Vec<u8>) -> std::io::Result<()>;
    async fn get(&self, key: &str) -> std::io::Result<Option<Vec<u8>>>;
}

/// Shared dependencies injected into modules at initialization.
#[derive(Debug, Clone, Default)]
pub struct ModuleOptions {
    event_bus: Option<Arc<dyn EventBus>>,
    cache: Option<Arc<dyn Cache>>,
    storage: Option<Arc<dyn Storage>>,
}

impl ModuleOptions {
    pub fn new() -> Self {
        Self::default()
    }

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

    pub fn event_bus(&self) -> Option<&Arc<dyn EventBus>> {
        self.event_bus.as_ref()
    }

    pub fn cache(&self) -> Option<&Arc<dyn Cache>> {
        self.cache.as_ref()
    }

    pub fn storage(&self) -> Option<&Arc<dyn Storage>> {
        self.storage.as_ref()
    }
}
