//! # Modulith - Embeddable Modular Application Runtime
//!
//! Independently built modules register into a host process, are initialized
//! and started under a common lifecycle, and communicate through an
//! in-memory event bus without holding references to one another.
//!
//! ## Architecture
//!
//! ```text
//!   host process
//!   ┌───────────────────────────────────────────────┐
//!   │  Runtime                                      │
//!   │  ┌──────────────┐  ┌─────────────────────┐    │
//!   │  │ModuleManager │  │ ModuleCatalog       │    │
//!   │  │ (registry +  │←─│ (config-selected    │    │
//!   │  │  startup)    │  │  linked-in modules) │    │
//!   │  └──────┬───────┘  └─────────────────────┘    │
//!   │         │ injects                             │
//!   │  ┌──────▼───────┐     publish/subscribe       │
//!   │  │   modules    │◄───────────────────────┐    │
//!   │  └──────────────┘                        │    │
//!   │                     ┌────────────────────▼─┐  │
//!   │                     │    MemoryEventBus    │  │
//!   │                     └──────────────────────┘  │
//!   └───────────────────────────────────────────────┘
//! ```
//!
//! Startup is sequential and fail-fast; event delivery is at-most-once and
//! best-effort with per-subscriber FIFO ordering.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod bus;
pub mod module;
pub mod runtime;
pub mod types;

// Internal utilities
pub mod observability;

pub use bus::{Event, EventBus, MemoryEventBus};
pub use module::{Module, ModuleCatalog, ModuleManager, ModuleOptions};
pub use runtime::{Runtime, RuntimeOptions};
pub use types::{Config, Error, Result};
