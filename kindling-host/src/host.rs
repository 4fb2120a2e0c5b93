//! The built application host.

use kindling_core::{Configuration, Executable, HostError, RegistryError};
use kindling_registry::{ProviderFactory, ServiceCollection, ServiceProvider};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// A configured application host.
///
/// Owns the application provider (and the bootstrap provider when it is
/// still distinct), the application collection, and the final configuration.
/// Produced already initialized by [`AppBuilder::build`](crate::AppBuilder::build):
/// either the application provider came up, or the failure was captured and
/// a raw fallback provider built directly from the collection keeps the host
/// minimally usable.
///
/// A captured initialization error is re-raised from [`run`](Host::run) and
/// [`run_concurrent`](Host::run_concurrent) at first meaningful use;
/// [`services`](Host::services) never re-raises, so a degraded host can
/// still resolve non-failing capabilities.
pub struct Host {
    services: ServiceCollection,
    application: ServiceProvider,
    bootstrap: Option<ServiceProvider>,
    configuration: Configuration,
    init_error: Option<Arc<RegistryError>>,
    disposed: AtomicBool,
}

impl Host {
    /// Construct the host and perform the initialize step.
    ///
    /// The application provider is produced through the resolved factory. On
    /// failure the error is captured, never propagated, and a raw fallback
    /// provider is built directly from the collection so the host is never
    /// left without one. A custom factory's bootstrap provider is released
    /// as soon as the factory has run; the default path keeps it for
    /// last-release at shutdown.
    pub(crate) fn initialize(
        services: ServiceCollection,
        bootstrap: ServiceProvider,
        factory: Arc<dyn ProviderFactory>,
        custom: bool,
        configuration: Configuration,
    ) -> Self {
        match factory.create(&services) {
            Ok(application) => {
                let bootstrap = if custom {
                    bootstrap.dispose();
                    None
                } else {
                    Some(bootstrap)
                };
                Self {
                    services,
                    application,
                    bootstrap,
                    configuration,
                    init_error: None,
                    disposed: AtomicBool::new(false),
                }
            }
            Err(error) => {
                warn!(%error, "application provider construction failed; continuing degraded");
                let application = services.build_provider();
                Self {
                    services,
                    application,
                    bootstrap: Some(bootstrap),
                    configuration,
                    init_error: Some(Arc::new(error)),
                    disposed: AtomicBool::new(false),
                }
            }
        }
    }

    /// The application-level provider.
    pub fn services(&self) -> &ServiceProvider {
        &self.application
    }

    /// The final merged configuration.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// The error captured during initialization, if the host is degraded.
    pub fn initialization_error(&self) -> Option<Arc<RegistryError>> {
        self.init_error.as_ref().map(Arc::clone)
    }

    /// The application collection the providers were built from.
    pub fn collection(&self) -> &ServiceCollection {
        &self.services
    }

    fn ready(&self) -> Result<Vec<Arc<dyn Executable>>, HostError> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(HostError::Disposed);
        }
        if let Some(error) = &self.init_error {
            return Err(HostError::Initialization(Arc::clone(error)));
        }
        let executables = self.application.get_all::<Arc<dyn Executable>>()?;
        if executables.is_empty() {
            return Err(HostError::NoExecutables);
        }
        Ok(executables)
    }

    /// Run every registered executable in registration order.
    ///
    /// Exactly one `execute` is in flight at any instant: each unit is
    /// awaited to completion before the next starts. The first failure
    /// aborts the remaining sequence and propagates; already-completed units
    /// are not rolled back.
    ///
    /// # Errors
    ///
    /// Re-raises a captured initialization error; fails with
    /// [`HostError::NoExecutables`] when nothing is registered, with
    /// [`HostError::Disposed`] after shutdown, or with the first unit's
    /// error.
    pub async fn run(&self, args: &[String]) -> Result<(), HostError> {
        let executables = self.ready()?;
        debug!(count = executables.len(), "running executables in order");
        for executable in executables {
            executable.execute(args).await?;
        }
        Ok(())
    }

    /// Run every registered executable concurrently.
    ///
    /// Every unit is spawned before any is awaited, so their suspension
    /// points interleave freely and no ordering holds between their side
    /// effects. The aggregate waits for all units, then reports the first
    /// failure in registration order; additional failures are logged, never
    /// silently dropped. A unit that panics surfaces as
    /// [`HostError::Panicked`].
    ///
    /// # Errors
    ///
    /// Same preconditions as [`run`](Host::run).
    pub async fn run_concurrent(&self, args: &[String]) -> Result<(), HostError> {
        let executables = self.ready()?;
        debug!(count = executables.len(), "running executables concurrently");

        let mut handles = Vec::with_capacity(executables.len());
        for executable in executables {
            let args = args.to_vec();
            handles.push(tokio::spawn(
                async move { executable.execute(&args).await },
            ));
        }

        let mut first_error: Option<HostError> = None;
        for handle in handles {
            let outcome = match handle.await {
                Ok(result) => result.map_err(HostError::from),
                Err(join_error) => Err(HostError::Panicked(join_error.to_string())),
            };
            if let Err(error) = outcome {
                if first_error.is_none() {
                    first_error = Some(error);
                } else {
                    warn!(%error, "additional executable failure");
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Release the host's providers in reverse-acquisition order: the
    /// application provider first, then the bootstrap provider when it is
    /// still held.
    ///
    /// Idempotent and best-effort: a second call finds the host already
    /// shut down and does nothing, and each provider is released regardless
    /// of the other. Also invoked on drop, so release is deterministic
    /// without an explicit call. After shutdown, runs fail with
    /// [`HostError::Disposed`] and resolution through the provider fails
    /// with [`RegistryError::Disposed`].
    pub fn shutdown(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!("releasing host providers");
        self.application.dispose();
        if let Some(bootstrap) = &self.bootstrap {
            bootstrap.dispose();
        }
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("degraded", &self.init_error.is_some())
            .field("disposed", &self.disposed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
