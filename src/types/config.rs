//! Configuration structures.
//!
//! Plain serde structs with per-section defaults; the host process decides
//! where the values come from (file, env, hardcoded).

use serde::{Deserialize, Serialize};

/// Global runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Application identity.
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Event bus tuning.
    #[serde(default)]
    pub bus: BusConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Modules to load from the catalog at startup.
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
}

/// Application identity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Application name.
    pub name: String,

    /// Application version.
    pub version: String,

    /// Deployment environment (development, production, ...).
    pub env: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            name: "modulith".to_string(),
            version: "0.0.0".to_string(),
            env: "development".to_string(),
        }
    }
}

/// Event bus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// Bounded inbound queue capacity per subscriber.
    pub subscriber_queue_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            subscriber_queue_capacity: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// One catalog-loadable module selection entry.
///
/// Carries no lifecycle behavior itself; it only tells the loader which
/// catalog ids to materialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Catalog id of the module.
    #[serde(default)]
    pub id: String,

    /// Human-readable name, used only for log context.
    #[serde(default)]
    pub name: String,

    /// Disabled entries are skipped without error.
    #[serde(default)]
    pub enable: bool,
}
