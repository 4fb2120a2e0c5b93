//! Resolution against a binding snapshot.

use crate::collection::{AnyValue, Binding, Lifetime};
use kindling_core::RegistryError;
use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Options controlling provider construction.
#[derive(Debug, Clone, Default)]
pub struct ProviderOptions {
    /// Materialize every singleton binding at build time so factory failures
    /// surface immediately instead of at first resolution.
    pub validate_on_build: bool,
}

/// Resolves capabilities against an immutable binding snapshot.
///
/// Singletons are materialized lazily, once per provider: two providers
/// built from clones of one collection hold independent instances. After
/// [`dispose`](ServiceProvider::dispose) every resolution fails with
/// [`RegistryError::Disposed`].
pub struct ServiceProvider {
    bindings: Vec<Binding>,
    singletons: Mutex<HashMap<usize, AnyValue>>,
    disposed: AtomicBool,
}

impl ServiceProvider {
    pub(crate) fn new(bindings: Vec<Binding>) -> Self {
        Self {
            bindings,
            singletons: Mutex::new(HashMap::new()),
            disposed: AtomicBool::new(false),
        }
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<usize, AnyValue>> {
        self.singletons
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_open(&self) -> Result<(), RegistryError> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(RegistryError::Disposed);
        }
        Ok(())
    }

    /// Resolve the last-registered binding for `T`, if any.
    ///
    /// `Ok(None)` means the capability is not registered; factory failures
    /// and resolution after disposal are errors.
    pub fn get<T>(&self) -> Result<Option<T>, RegistryError>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.ensure_open()?;
        let target = TypeId::of::<T>();
        let found = self
            .bindings
            .iter()
            .enumerate()
            .rev()
            .find(|(_, binding)| binding.capability() == target);
        match found {
            Some((index, _)) => self.resolve_at::<T>(index).map(Some),
            None => Ok(None),
        }
    }

    /// Resolve the last-registered binding for `T`, failing when absent.
    pub fn get_required<T>(&self) -> Result<T, RegistryError>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.get::<T>()?.ok_or(RegistryError::NotRegistered {
            capability: type_name::<T>(),
        })
    }

    /// Resolve every binding for `T`, in registration order.
    ///
    /// An empty vector means nothing is registered for the capability.
    pub fn get_all<T>(&self) -> Result<Vec<T>, RegistryError>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.ensure_open()?;
        let target = TypeId::of::<T>();
        let mut resolved = Vec::new();
        for (index, binding) in self.bindings.iter().enumerate() {
            if binding.capability() == target {
                resolved.push(self.resolve_at::<T>(index)?);
            }
        }
        Ok(resolved)
    }

    fn resolve_at<T>(&self, index: usize) -> Result<T, RegistryError>
    where
        T: Clone + Send + Sync + 'static,
    {
        let binding = &self.bindings[index];
        match binding.lifetime() {
            Lifetime::Transient => {
                let value = binding.instantiate(self)?;
                value
                    .downcast::<T>()
                    .map(|boxed| *boxed)
                    .map_err(|_| RegistryError::WrongType {
                        capability: binding.capability_name(),
                    })
            }
            Lifetime::Singleton => {
                if let Some(value) = self.cache().get(&index) {
                    return value.downcast_ref::<T>().cloned().ok_or(
                        RegistryError::WrongType {
                            capability: binding.capability_name(),
                        },
                    );
                }
                // Instantiate outside the lock: the factory may resolve its
                // own dependencies through this provider.
                let value = binding.instantiate(self)?;
                let mut cache = self.cache();
                let entry = cache.entry(index).or_insert(value);
                entry
                    .downcast_ref::<T>()
                    .cloned()
                    .ok_or(RegistryError::WrongType {
                        capability: binding.capability_name(),
                    })
            }
        }
    }

    pub(crate) fn materialize_singletons(&self) -> Result<(), RegistryError> {
        for (index, binding) in self.bindings.iter().enumerate() {
            if binding.lifetime() != Lifetime::Singleton {
                continue;
            }
            if self.cache().contains_key(&index) {
                continue;
            }
            let value = binding.instantiate(self)?;
            self.cache().entry(index).or_insert(value);
        }
        Ok(())
    }

    /// Number of bindings in the snapshot.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the snapshot holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Whether the provider has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Release the provider: drop every materialized singleton and refuse
    /// further resolution.
    ///
    /// Idempotent: a second call finds the provider already released and
    /// does nothing.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.cache().clear();
    }
}

impl fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("bindings", &self.bindings.len())
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}
