//! Accumulates composition callbacks and freezes them into a [`Host`].

use crate::context::BuilderContext;
use crate::host::Host;
use crate::logging::LoggingOptions;
use crate::options::{Options, OptionsBinder};
use kindling_config::{ConfigBuilder, EnvSource, MemorySource};
use kindling_core::{CompositionError, Configuration, Executable, RegistryError};
use kindling_registry::{
    Binding, DefaultProviderFactory, ProviderFactory, ProviderOptions, ServiceCollection,
    ServiceProvider,
};
use serde::de::DeserializeOwned;
use std::any::TypeId;
use std::collections::BTreeMap;
use std::sync::Arc;

type ConfigOp = Box<dyn Fn(&BuilderContext, &mut ConfigBuilder) + Send + Sync>;
type ServiceOp = Box<dyn Fn(&BuilderContext, &mut ServiceCollection) + Send + Sync>;
type LoggingOp = Box<dyn Fn(&BuilderContext, &mut LoggingOptions) + Send + Sync>;

/// A builder for [`Host`].
///
/// Callbacks registered here have no immediate side effect: they are replayed,
/// in registration order, during the one-time [`build`](AppBuilder::build)
/// transition. Later configuration layers override earlier keys; later
/// service registrations replace earlier ones for a singleton slot.
#[derive(Default)]
pub struct AppBuilder {
    settings: BTreeMap<String, String>,
    config_ops: Vec<ConfigOp>,
    service_ops: Vec<ServiceOp>,
    logging_ops: Vec<LoggingOp>,
    built: bool,
}

impl AppBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with pre-configured defaults, registered before any
    /// caller-supplied callback so callers can override them:
    ///
    /// - an environment layer for `APP_*` variables, plus an
    ///   `APP_{env}_*` layer above it when `APP_ENVIRONMENT` selects one;
    /// - a logging callback pulling the `Logging` configuration section;
    /// - the default provider with eager validation disabled.
    pub fn with_defaults() -> Self {
        let mut builder = Self::new();
        builder
            .configure(|_, config| {
                config.add_source(EnvSource::prefixed("APP"));
                if let Ok(environment) = std::env::var("APP_ENVIRONMENT") {
                    config.add_source(EnvSource::prefixed(format!("APP_{environment}")));
                }
            })
            .configure_logging(|context, logging| {
                logging.apply_section(&context.configuration.section("Logging"));
            })
            .use_default_provider(ProviderOptions {
                validate_on_build: false,
            });
        builder
    }

    /// Add or replace a setting in the builder's own pre-build snapshot.
    ///
    /// Settings are seeded into the layering pipeline as the lowest-priority
    /// layer, before any registered layering callback, so later layers can
    /// override them.
    pub fn use_setting(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Read a setting from the builder's own pre-build snapshot.
    pub fn get_setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    /// Append a configuration-layering callback. May be called multiple
    /// times; callbacks run in registration order and may add, override, or
    /// remove layers.
    pub fn configure<F>(&mut self, op: F) -> &mut Self
    where
        F: Fn(&BuilderContext, &mut ConfigBuilder) + Send + Sync + 'static,
    {
        self.config_ops.push(Box::new(op));
        self
    }

    /// Append a service-registration callback. May be called multiple times;
    /// callbacks run in registration order against the fresh collection and
    /// observe the finalized configuration through the context.
    pub fn configure_services<F>(&mut self, op: F) -> &mut Self
    where
        F: Fn(&BuilderContext, &mut ServiceCollection) + Send + Sync + 'static,
    {
        self.service_ops.push(Box::new(op));
        self
    }

    /// Context-free form of [`configure_services`](AppBuilder::configure_services).
    pub fn services<F>(&mut self, op: F) -> &mut Self
    where
        F: Fn(&mut ServiceCollection) + Send + Sync + 'static,
    {
        self.configure_services(move |_, collection| op(collection))
    }

    /// Append a logging callback. The callbacks fold into one
    /// [`LoggingOptions`] value that is seeded into the registry; the engine
    /// never installs a subscriber itself.
    pub fn configure_logging<F>(&mut self, op: F) -> &mut Self
    where
        F: Fn(&BuilderContext, &mut LoggingOptions) + Send + Sync + 'static,
    {
        self.logging_ops.push(Box::new(op));
        self
    }

    /// Run `E` when the host runs. May be called multiple times; registering
    /// the same type twice yields one entry, while distinct types each get
    /// their own entry, executed in registration order.
    pub fn executable<E>(&mut self) -> &mut Self
    where
        E: Executable + Default + 'static,
    {
        self.configure_services(|_, services| {
            services.try_add_enumerable(
                Binding::singleton::<Arc<dyn Executable>, _>(|_| {
                    Ok(Arc::new(E::default()) as Arc<dyn Executable>)
                })
                .with_concrete::<E>(),
            );
        })
    }

    /// Run an `E` constructed by `factory` when the host runs.
    ///
    /// The factory resolves through the application provider, so executables
    /// with dependencies fail at resolution time, not registration time.
    /// Deduplicated by concrete type like [`executable`](AppBuilder::executable).
    pub fn executable_with<E, F>(&mut self, factory: F) -> &mut Self
    where
        E: Executable + 'static,
        F: Fn(&ServiceProvider) -> Result<E, RegistryError> + Send + Sync + 'static,
    {
        let factory = Arc::new(factory);
        self.configure_services(move |_, services| {
            let factory = Arc::clone(&factory);
            services.try_add_enumerable(
                Binding::singleton::<Arc<dyn Executable>, _>(move |provider| {
                    Ok(Arc::new(factory(provider)?) as Arc<dyn Executable>)
                })
                .with_concrete::<E>(),
            );
        })
    }

    /// Replace the provider-factory binding with the framework default
    /// carrying the given options.
    pub fn use_default_provider(&mut self, options: ProviderOptions) -> &mut Self {
        self.configure_services(move |_, services| {
            let options = options.clone();
            services.replace(
                Binding::transient::<Arc<dyn ProviderFactory>, _>(move |_| {
                    Ok(Arc::new(DefaultProviderFactory::new(options.clone()))
                        as Arc<dyn ProviderFactory>)
                })
                .with_concrete::<DefaultProviderFactory>(),
            );
        })
    }

    /// Replace the provider-factory binding with a custom factory.
    ///
    /// A custom factory constructs the application provider from the
    /// application collection; the bootstrap provider is released as soon as
    /// it has run.
    pub fn use_provider_factory(&mut self, factory: Arc<dyn ProviderFactory>) -> &mut Self {
        self.configure_services(move |_, services| {
            let factory = Arc::clone(&factory);
            services.replace(Binding::transient::<Arc<dyn ProviderFactory>, _>(
                move |_| Ok(Arc::clone(&factory)),
            ));
        })
    }

    /// Register a typed options snapshot bound from a configuration section.
    ///
    /// Resolves as `Arc<Options<T>>`; binding happens lazily at first
    /// resolution, against the finalized configuration.
    pub fn options<T>(&mut self, section: &str) -> &mut Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        let section = section.to_string();
        self.configure_services(move |_, services| {
            let section = section.clone();
            services.add(Binding::singleton::<Arc<Options<T>>, _>(move |provider| {
                let binder = provider.get_required::<Arc<OptionsBinder>>()?;
                let value: T =
                    binder
                        .bind(&section)
                        .map_err(|error| RegistryError::Factory {
                            capability: std::any::type_name::<Options<T>>(),
                            message: error.to_string(),
                        })?;
                Ok(Arc::new(Options::new(value)))
            }));
        })
    }

    /// The single state transition: merge configuration, populate the
    /// registry, and hand both to a new [`Host`].
    ///
    /// Steps, in order: fail on a repeated call; merge the settings snapshot
    /// and every layering callback into the final configuration (replacing
    /// the shared context's view exactly once); seed framework defaults
    /// (context, configuration, options binder, logging options, provider
    /// factory); replay service callbacks; clone the collection into the
    /// application snapshot; build the bootstrap provider and resolve the
    /// winning factory through it; construct the host.
    ///
    /// Initialization failures do not abort the build; the host captures
    /// them and comes up degraded (see [`Host::initialization_error`]).
    ///
    /// # Errors
    ///
    /// [`CompositionError::AlreadyBuilt`] on a second call, or a
    /// configuration error when a layer fails to load.
    pub fn build(&mut self) -> Result<Host, CompositionError> {
        if self.built {
            return Err(CompositionError::AlreadyBuilt);
        }
        self.built = true;

        let mut services = ServiceCollection::new();

        // Settings are the lowest-priority layer; layering callbacks observe
        // them through the context and may stack anything above.
        let mut context = BuilderContext {
            configuration: Configuration::from_pairs(self.settings.clone()),
        };
        let mut config = ConfigBuilder::new();
        config.add_source(MemorySource::new(self.settings.clone()).named("settings"));
        for op in &self.config_ops {
            op(&context, &mut config);
        }
        let configuration = config.build()?;
        // The one-time replacement: everything from here on observes final values.
        context.configuration = configuration.clone();
        let context = Arc::new(context);

        services.add_instance::<Arc<BuilderContext>>(Arc::clone(&context));
        services.add_instance::<Arc<Configuration>>(Arc::new(configuration.clone()));
        services.add_instance::<Arc<OptionsBinder>>(Arc::new(OptionsBinder::new(
            configuration.clone(),
        )));

        let mut logging = LoggingOptions::default();
        for op in &self.logging_ops {
            op(&context, &mut logging);
        }
        services.add_instance::<Arc<LoggingOptions>>(Arc::new(logging));

        services.add(
            Binding::transient::<Arc<dyn ProviderFactory>, _>(|_| {
                Ok(Arc::new(DefaultProviderFactory::default()) as Arc<dyn ProviderFactory>)
            })
            .with_concrete::<DefaultProviderFactory>(),
        );

        for op in &self.service_ops {
            op(&context, &mut services);
        }

        // Two provider lifetimes: the clone is the application graph, so a
        // bootstrap-only facility cannot leak into it.
        let application = services.clone();
        let bootstrap = services.build_provider();
        let factory = bootstrap.get_required::<Arc<dyn ProviderFactory>>()?;
        let custom = services
            .bindings()
            .iter()
            .rev()
            .find(|binding| binding.capability() == TypeId::of::<Arc<dyn ProviderFactory>>())
            .is_some_and(|binding| {
                binding.concrete() != Some(TypeId::of::<DefaultProviderFactory>())
            });

        Ok(Host::initialize(
            application,
            bootstrap,
            factory,
            custom,
            configuration,
        ))
    }
}
