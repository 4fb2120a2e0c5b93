use kindling_core::{Configuration, RegistryError};
use kindling_host::{AppBuilder, BuilderContext, LoggingOptions, Options, OptionsBinder};
use kindling_registry::{
    ProviderFactory, ProviderOptions, ServiceCollection, ServiceProvider,
};
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// --- Single-build guarantee ---

#[test]
fn build_twice_fails_with_composition_error() {
    let mut builder = AppBuilder::new();
    builder.build().unwrap();

    let error = builder.build().unwrap_err();
    assert!(error.to_string().contains("already been built"));
}

#[test]
fn build_twice_fails_even_with_registrations_between() {
    let mut builder = AppBuilder::new();
    builder.build().unwrap();

    builder.use_setting("A", "1");
    builder.services(|_| {});
    assert!(builder.build().is_err());
}

// --- Settings and layering ---

#[test]
fn use_setting_round_trips_before_build() {
    let mut builder = AppBuilder::new();
    builder.use_setting("X", "v");
    assert_eq!(builder.get_setting("X"), Some("v"));
    assert_eq!(builder.get_setting("missing"), None);
}

#[test]
fn settings_are_visible_in_final_configuration() {
    let mut builder = AppBuilder::new();
    builder.use_setting("X", "v");

    let host = builder.build().unwrap();
    assert_eq!(host.configuration().get("X"), Some("v"));
}

#[test]
fn later_layer_overrides_settings() {
    let mut builder = AppBuilder::new();
    builder.use_setting("X", "low").configure(|_, config| {
        config.add_source(kindling_config::MemorySource::new([("X", "high")]));
    });

    let host = builder.build().unwrap();
    assert_eq!(host.configuration().get("X"), Some("high"));
}

#[test]
fn layering_callbacks_observe_settings_through_context() {
    let seen = Arc::new(Mutex::new(None::<String>));
    let probe = Arc::clone(&seen);

    let mut builder = AppBuilder::new();
    builder.use_setting("X", "v").configure(move |context, _| {
        *probe.lock().unwrap() = context.configuration.get("X").map(str::to_string);
    });
    builder.build().unwrap();

    assert_eq!(seen.lock().unwrap().as_deref(), Some("v"));
}

#[test]
fn service_callbacks_observe_final_configuration() {
    let seen = Arc::new(Mutex::new(None::<String>));
    let probe = Arc::clone(&seen);

    let mut builder = AppBuilder::new();
    builder
        .use_setting("X", "low")
        .configure(|_, config| {
            config.add_source(kindling_config::MemorySource::new([("X", "final")]));
        })
        .configure_services(move |context, _| {
            *probe.lock().unwrap() = context.configuration.get("X").map(str::to_string);
        });
    builder.build().unwrap();

    assert_eq!(seen.lock().unwrap().as_deref(), Some("final"));
}

// --- Framework seeds ---

#[test]
fn framework_defaults_are_resolvable() {
    let mut builder = AppBuilder::new();
    builder.use_setting("X", "v");
    let host = builder.build().unwrap();
    let services = host.services();

    let context = services.get_required::<Arc<BuilderContext>>().unwrap();
    assert_eq!(context.configuration.get("X"), Some("v"));

    let config = services.get_required::<Arc<Configuration>>().unwrap();
    assert_eq!(config.get("X"), Some("v"));

    services.get_required::<Arc<OptionsBinder>>().unwrap();
    services.get_required::<Arc<LoggingOptions>>().unwrap();
    services.get_required::<Arc<dyn ProviderFactory>>().unwrap();

    // The collection behind the providers carries the same seeds.
    assert_eq!(host.collection().len(), services.len());
}

#[test]
fn seeded_singletons_can_be_replaced_by_later_registrations() {
    let mut builder = AppBuilder::new();
    builder.use_setting("X", "seeded").services(|services| {
        services.add_instance::<Arc<Configuration>>(Arc::new(Configuration::from_pairs([
            ("X", "replaced"),
        ])));
    });

    let host = builder.build().unwrap();
    let config = host.services().get_required::<Arc<Configuration>>().unwrap();
    assert_eq!(config.get("X"), Some("replaced"));
}

// --- Provider factory ---

struct CountingFactory {
    calls: Arc<AtomicUsize>,
}

impl ProviderFactory for CountingFactory {
    fn create(&self, services: &ServiceCollection) -> Result<ServiceProvider, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(services.build_provider())
    }
}

struct ExplodingFactory;

impl ProviderFactory for ExplodingFactory {
    fn create(&self, _services: &ServiceCollection) -> Result<ServiceProvider, RegistryError> {
        Err(RegistryError::Factory {
            capability: "provider",
            message: "startup dependency unavailable".into(),
        })
    }
}

#[test]
fn custom_factory_constructs_the_application_provider() {
    let calls = Arc::new(AtomicUsize::new(0));

    let mut builder = AppBuilder::new();
    builder
        .use_setting("X", "v")
        .use_provider_factory(Arc::new(CountingFactory {
            calls: Arc::clone(&calls),
        }));

    let host = builder.build().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(host.initialization_error().is_none());
    assert_eq!(
        host.services()
            .get_required::<Arc<Configuration>>()
            .unwrap()
            .get("X"),
        Some("v")
    );
}

#[test]
fn failing_factory_degrades_the_host_instead_of_aborting_build() {
    let mut builder = AppBuilder::new();
    builder
        .use_setting("X", "v")
        .use_provider_factory(Arc::new(ExplodingFactory));

    let host = builder.build().unwrap();
    let captured = host.initialization_error().expect("captured error");
    assert!(captured.to_string().contains("startup dependency unavailable"));

    // The fallback provider still resolves non-failing capabilities.
    let config = host.services().get_required::<Arc<Configuration>>().unwrap();
    assert_eq!(config.get("X"), Some("v"));
}

#[test]
fn replaced_default_provider_options_are_honored() {
    let mut builder = AppBuilder::new();
    builder
        .use_default_provider(ProviderOptions {
            validate_on_build: true,
        })
        .services(|services| {
            services.add_singleton::<Arc<String>, _>(|_| {
                Err(RegistryError::Factory {
                    capability: "string",
                    message: "broken singleton".into(),
                })
            });
        });

    // Eager validation fails inside the factory; the host comes up degraded.
    let host = builder.build().unwrap();
    let captured = host.initialization_error().expect("captured error");
    assert!(captured.to_string().contains("broken singleton"));
}

// --- Logging options ---

#[test]
fn logging_callbacks_fold_in_registration_order() {
    let mut builder = AppBuilder::new();
    builder
        .use_setting("Logging:Filter", "info")
        .configure_logging(|context, logging| {
            logging.apply_section(&context.configuration.section("Logging"));
        })
        .configure_logging(|_, logging| {
            logging.ansi = false;
        });

    let host = builder.build().unwrap();
    let logging = host.services().get_required::<Arc<LoggingOptions>>().unwrap();
    assert_eq!(logging.filter.as_deref(), Some("info"));
    assert!(!logging.ansi);
}

// --- Typed options ---

#[derive(Debug, Deserialize)]
struct GreetingOptions {
    name: String,
    retries: u32,
    verbose: bool,
}

#[test]
fn options_bind_from_a_configuration_section() {
    let mut builder = AppBuilder::new();
    builder
        .use_setting("Greeting:name", "world")
        .use_setting("Greeting:retries", "3")
        .use_setting("Greeting:verbose", "true")
        .options::<GreetingOptions>("Greeting");

    let host = builder.build().unwrap();
    let options = host
        .services()
        .get_required::<Arc<Options<GreetingOptions>>>()
        .unwrap();
    assert_eq!(options.get().name, "world");
    assert_eq!(options.get().retries, 3);
    assert!(options.get().verbose);
}

#[derive(Debug, Deserialize)]
struct Endpoint {
    host: String,
    port: u16,
}

#[derive(Debug, Deserialize)]
struct ServiceOptions {
    endpoint: Endpoint,
}

#[test]
fn nested_sections_bind_as_nested_structs() {
    let mut builder = AppBuilder::new();
    builder
        .use_setting("Service:endpoint:host", "localhost")
        .use_setting("Service:endpoint:port", "8080")
        .options::<ServiceOptions>("Service");

    let host = builder.build().unwrap();
    let options = host
        .services()
        .get_required::<Arc<Options<ServiceOptions>>>()
        .unwrap();
    assert_eq!(options.get().endpoint.host, "localhost");
    assert_eq!(options.get().endpoint.port, 8080);
}

#[derive(Debug, Deserialize)]
struct HostsOptions {
    hosts: Vec<String>,
}

#[test]
fn numeric_keys_bind_as_arrays() {
    let mut builder = AppBuilder::new();
    builder
        .use_setting("Cluster:hosts:0", "a")
        .use_setting("Cluster:hosts:1", "b")
        .options::<HostsOptions>("Cluster");

    let host = builder.build().unwrap();
    let options = host
        .services()
        .get_required::<Arc<Options<HostsOptions>>>()
        .unwrap();
    assert_eq!(options.get().hosts, vec!["a", "b"]);
}

#[test]
fn options_binding_failure_is_a_resolution_error() {
    #[derive(Debug, Deserialize)]
    struct Strict {
        #[allow(dead_code)]
        required: u32,
    }

    let mut builder = AppBuilder::new();
    builder.options::<Strict>("Missing");

    let host = builder.build().unwrap();
    let error = host
        .services()
        .get_required::<Arc<Options<Strict>>>()
        .unwrap_err();
    assert!(error.to_string().contains("Missing"));
}
