//! Runtime error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context. Module lifecycle failures are carried
//! through unchanged as the error source, never rewrapped into another kind.

use thiserror::Error;

/// Runtime result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error produced by a module's own lifecycle code.
pub type ModuleError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error enum for the modulith runtime.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed event rejected at the publish boundary (empty id or topic).
    #[error("validation error: {0}")]
    Validation(String),

    /// A module with the same id is already registered.
    #[error("duplicate module id: {0}")]
    DuplicateModule(String),

    /// No catalog entry for the requested module id.
    #[error("module not found: {0}")]
    ModuleNotFound(String),

    /// A catalog entry produced something that does not honor the module contract.
    #[error("invalid module type: {0}")]
    InvalidModuleType(String),

    /// The event bus is closed; publish, subscribe, and close all fail.
    #[error("event bus is closed")]
    BusClosed,

    /// A module's initialize/start/stop failed; the source is the module's
    /// own error, propagated verbatim.
    #[error("module {id} failed during {phase}")]
    Module {
        id: String,
        phase: &'static str,
        #[source]
        source: ModuleError,
    },

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenience constructors
impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn duplicate_module(id: impl Into<String>) -> Self {
        Self::DuplicateModule(id.into())
    }

    pub fn module_not_found(id: impl Into<String>) -> Self {
        Self::ModuleNotFound(id.into())
    }

    pub fn invalid_module_type(msg: impl Into<String>) -> Self {
        Self::InvalidModuleType(msg.into())
    }

    pub fn module(id: impl Into<String>, phase: &'static str, source: ModuleError) -> Self {
        Self::Module {
            id: id.into(),
            phase,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_error_preserves_source() {
        let inner = std::io::Error::other("boom");
        let err = Error::module("billing", "initialize", Box::new(inner));

        assert_eq!(err.to_string(), "module billing failed during initialize");

        let source = std::error::Error::source(&err).expect("source present");
        assert_eq!(source.to_string(), "boom");
    }

    #[test]
    fn bus_closed_message() {
        assert_eq!(Error::BusClosed.to_string(), "event bus is closed");
    }
}
