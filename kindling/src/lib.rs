#![deny(missing_docs)]
//! # kindling — umbrella crate
//!
//! Provides a single import surface for the kindling composition engine.
//! Re-exports the protocol and implementation crates, plus a `prelude` for
//! the happy path.

pub use kindling_config;
pub use kindling_core;
pub use kindling_host;
pub use kindling_registry;

/// Happy-path imports for composing and running an application host.
pub mod prelude {
    pub use kindling_config::{ConfigBuilder, EnvSource, MemorySource};
    pub use kindling_core::{
        CompositionError, ConfigError, ConfigSource, Configuration, ExecError, Executable,
        HostError, RegistryError,
    };
    pub use kindling_host::{
        AppBuilder, BuilderContext, Host, LoggingOptions, Options, OptionsBinder,
    };
    pub use kindling_registry::{
        Binding, DefaultProviderFactory, Lifetime, ProviderFactory, ProviderOptions,
        ServiceCollection, ServiceProvider,
    };
}
