//! Ordered binding accumulation.

use crate::provider::{ProviderOptions, ServiceProvider};
use kindling_core::RegistryError;
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

/// How long a resolved value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// One instance per provider, created on first resolution and cached.
    Singleton,
    /// A fresh instance on every resolution.
    Transient,
}

pub(crate) type AnyValue = Box<dyn Any + Send + Sync>;
type AnyFactory = Arc<dyn Fn(&ServiceProvider) -> Result<AnyValue, RegistryError> + Send + Sync>;

/// One registry entry: a capability, an optional concrete identity, a
/// lifetime, and the factory that produces the value.
///
/// The concrete identity exists for deduplication
/// ([`ServiceCollection::try_add_enumerable`]) and introspection; it is
/// never used for resolution.
#[derive(Clone)]
pub struct Binding {
    capability: TypeId,
    capability_name: &'static str,
    concrete: Option<TypeId>,
    lifetime: Lifetime,
    factory: AnyFactory,
}

impl Binding {
    fn with_lifetime<T, F>(lifetime: Lifetime, factory: F) -> Self
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<T, RegistryError> + Send + Sync + 'static,
    {
        Self {
            capability: TypeId::of::<T>(),
            capability_name: type_name::<T>(),
            concrete: None,
            lifetime,
            factory: Arc::new(move |provider| {
                factory(provider).map(|value| Box::new(value) as AnyValue)
            }),
        }
    }

    /// A binding resolved once per provider and cached.
    pub fn singleton<T, F>(factory: F) -> Self
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<T, RegistryError> + Send + Sync + 'static,
    {
        Self::with_lifetime(Lifetime::Singleton, factory)
    }

    /// A binding resolved fresh on every request.
    pub fn transient<T, F>(factory: F) -> Self
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<T, RegistryError> + Send + Sync + 'static,
    {
        Self::with_lifetime(Lifetime::Transient, factory)
    }

    /// A singleton binding around an already-constructed value.
    pub fn instance<T>(value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        Self::with_lifetime(Lifetime::Singleton, move |_| Ok(value.clone()))
    }

    /// Record the concrete type behind this binding, enabling deduplication
    /// and introspection by implementation identity.
    pub fn with_concrete<C: 'static>(mut self) -> Self {
        self.concrete = Some(TypeId::of::<C>());
        self
    }

    /// The capability this binding satisfies.
    pub fn capability(&self) -> TypeId {
        self.capability
    }

    /// Type name of the capability, for diagnostics.
    pub fn capability_name(&self) -> &'static str {
        self.capability_name
    }

    /// The concrete identity, when recorded.
    pub fn concrete(&self) -> Option<TypeId> {
        self.concrete
    }

    /// The binding's lifetime.
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub(crate) fn instantiate(&self, provider: &ServiceProvider) -> Result<AnyValue, RegistryError> {
        (self.factory)(provider)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("capability", &self.capability_name)
            .field("lifetime", &self.lifetime)
            .field("has_concrete", &self.concrete.is_some())
            .finish_non_exhaustive()
    }
}

/// An append-only ordered list of bindings.
///
/// Registration order is load-bearing: multi-binding resolution follows it,
/// and single resolution takes the last entry. Cloning the collection yields
/// an independent snapshot that shares the factories; providers built from
/// the clone materialize their own singletons.
#[derive(Debug, Clone, Default)]
pub struct ServiceCollection {
    bindings: Vec<Binding>,
}

impl ServiceCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Append a binding.
    pub fn add(&mut self, binding: Binding) -> &mut Self {
        self.bindings.push(binding);
        self
    }

    /// Append a singleton binding for capability `T`.
    pub fn add_singleton<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<T, RegistryError> + Send + Sync + 'static,
    {
        self.add(Binding::singleton(factory))
    }

    /// Append a transient binding for capability `T`.
    pub fn add_transient<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<T, RegistryError> + Send + Sync + 'static,
    {
        self.add(Binding::transient(factory))
    }

    /// Append a singleton binding around an existing value.
    pub fn add_instance<T>(&mut self, value: T) -> &mut Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.add(Binding::instance(value))
    }

    /// Append the binding unless one with the same capability and the same
    /// concrete identity is already registered.
    ///
    /// Returns whether the binding was added. A binding without a concrete
    /// identity cannot be deduplicated and is always added.
    pub fn try_add_enumerable(&mut self, binding: Binding) -> bool {
        if let Some(concrete) = binding.concrete() {
            let duplicate = self.bindings.iter().any(|existing| {
                existing.capability() == binding.capability()
                    && existing.concrete() == Some(concrete)
            });
            if duplicate {
                return false;
            }
        }
        self.bindings.push(binding);
        true
    }

    /// Remove every binding for the new binding's capability, then append it.
    pub fn replace(&mut self, binding: Binding) -> &mut Self {
        self.bindings
            .retain(|existing| existing.capability() != binding.capability());
        self.bindings.push(binding);
        self
    }

    /// The registered bindings, in registration order.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Build a provider over a snapshot of the current bindings.
    ///
    /// Cannot fail: factories run lazily, so a binding whose dependencies
    /// are unresolvable fails at resolution time.
    pub fn build_provider(&self) -> ServiceProvider {
        ServiceProvider::new(self.bindings.clone())
    }

    /// Build a provider per the given options.
    ///
    /// With [`ProviderOptions::validate_on_build`] set, every singleton
    /// binding is materialized eagerly so factory failures surface here
    /// instead of at first resolution.
    pub fn build_provider_with(
        &self,
        options: &ProviderOptions,
    ) -> Result<ServiceProvider, RegistryError> {
        let provider = self.build_provider();
        if options.validate_on_build {
            provider.materialize_singletons()?;
        }
        Ok(provider)
    }
}
