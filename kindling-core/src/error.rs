//! Error types for each part of the engine.

use std::sync::Arc;
use thiserror::Error;

/// Configuration layering and binding errors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source failed to produce its pairs.
    #[error("config source {name} failed: {message}")]
    Source {
        /// Name of the source that failed.
        name: String,
        /// Error message.
        message: String,
    },

    /// A configuration section could not be bound to a typed value.
    #[error("binding section {section} failed: {message}")]
    Bind {
        /// The section that was being bound.
        section: String,
        /// Error message.
        message: String,
    },

    /// Catch-all. Include context.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Capability registry errors. Resolution failures are configuration
/// errors caught at resolution time, not at registration time.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No binding exists for the requested capability.
    #[error("no binding registered for {capability}")]
    NotRegistered {
        /// Type name of the requested capability.
        capability: &'static str,
    },

    /// A binding produced a value of an unexpected type.
    #[error("binding for {capability} produced a value of the wrong type")]
    WrongType {
        /// Type name of the requested capability.
        capability: &'static str,
    },

    /// A factory failed while constructing a value.
    #[error("factory for {capability} failed: {message}")]
    Factory {
        /// Type name of the capability being constructed.
        capability: &'static str,
        /// Error message.
        message: String,
    },

    /// The provider was already released.
    #[error("service provider has been disposed")]
    Disposed,

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Work-unit execution errors. These belong to the unit, not the engine;
/// the host propagates them verbatim and never retries.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ExecError {
    /// The unit failed. Include context.
    #[error("{0}")]
    Failed(String),

    /// Catch-all for domain error types.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Invalid builder usage. Always immediate, always fatal to the calling
/// code path, never retried by the engine.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CompositionError {
    /// `build` was invoked a second time on the same builder.
    #[error("this application has already been built")]
    AlreadyBuilt,

    /// Configuration layering failed while finalizing the merged view.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The registry failed while assembling framework services.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Host lifecycle and execution errors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HostError {
    /// Initialization failed when the host was built; the error was captured
    /// and is re-raised here at first meaningful use.
    #[error("host initialization failed: {0}")]
    Initialization(Arc<RegistryError>),

    /// A run was requested with no registered executables.
    #[error("no executables registered; register at least one before running")]
    NoExecutables,

    /// An executable failed. Sequential runs abort the remaining units;
    /// concurrent runs report the first failure in registration order.
    #[error("executable failed: {0}")]
    Executable(#[from] ExecError),

    /// Resolving registered services failed.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A concurrently running executable panicked.
    #[error("executable task panicked: {0}")]
    Panicked(String),

    /// The host was already shut down.
    #[error("host has been shut down")]
    Disposed,
}
