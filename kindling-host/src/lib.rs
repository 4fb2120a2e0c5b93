#![deny(missing_docs)]
//! The builder-to-host pipeline.
//!
//! [`AppBuilder`] accumulates configuration-layering and service-registration
//! callbacks and freezes them exactly once into a [`Host`]. The host owns the
//! resulting providers, executes registered
//! [`Executable`](kindling_core::Executable)s sequentially
//! ([`Host::run`]) or concurrently ([`Host::run_concurrent`]), and releases
//! its providers deterministically on [`Host::shutdown`].
//!
//! ```no_run
//! use kindling_host::AppBuilder;
//! # use kindling_core::{ExecError, Executable};
//! # #[derive(Default)]
//! # struct Migrate;
//! # #[async_trait::async_trait]
//! # impl Executable for Migrate {
//! #     async fn execute(&self, _args: &[String]) -> Result<(), ExecError> { Ok(()) }
//! # }
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = AppBuilder::with_defaults();
//! builder
//!     .use_setting("Greeting:Name", "world")
//!     .executable::<Migrate>();
//! let host = builder.build()?;
//! host.run(&[]).await?;
//! host.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod context;
pub mod host;
pub mod logging;
pub mod options;

pub use builder::AppBuilder;
pub use context::BuilderContext;
pub use host::Host;
pub use logging::LoggingOptions;
pub use options::{Options, OptionsBinder};
