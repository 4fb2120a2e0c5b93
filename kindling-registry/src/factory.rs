//! The provider-construction seam.

use crate::collection::ServiceCollection;
use crate::provider::{ProviderOptions, ServiceProvider};
use kindling_core::RegistryError;

/// Capability: construct a provider from a populated collection.
///
/// The engine seeds a [`DefaultProviderFactory`] binding and resolves the
/// winning factory through the bootstrap provider; replacing the binding lets
/// an application swap in its own construction strategy without the engine
/// knowing anything about it.
pub trait ProviderFactory: Send + Sync {
    /// Build a provider over the given collection.
    fn create(&self, services: &ServiceCollection) -> Result<ServiceProvider, RegistryError>;
}

/// The framework-default factory: builds the provider directly from the
/// collection per its [`ProviderOptions`].
#[derive(Debug, Clone, Default)]
pub struct DefaultProviderFactory {
    options: ProviderOptions,
}

impl DefaultProviderFactory {
    /// Create a default factory with the given options.
    pub fn new(options: ProviderOptions) -> Self {
        Self { options }
    }

    /// The options this factory builds with.
    pub fn options(&self) -> &ProviderOptions {
        &self.options
    }
}

impl ProviderFactory for DefaultProviderFactory {
    fn create(&self, services: &ServiceCollection) -> Result<ServiceProvider, RegistryError> {
        services.build_provider_with(&self.options)
    }
}
