//! Logging configuration the engine accepts but never interprets.

use kindling_core::Configuration;
use tracing_subscriber::EnvFilter;

/// Options folded from `configure_logging` callbacks and seeded into the
/// registry as `Arc<LoggingOptions>`.
///
/// The engine only carries these; installing a subscriber is the entry
/// point's decision via [`try_init`](LoggingOptions::try_init). Internally
/// the engine emits plain `tracing` events (host lifecycle at `debug`,
/// failures at `warn`) against whatever subscriber the application wired.
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Filter directives in `tracing_subscriber::EnvFilter` syntax
    /// (`info`, `kindling_host=debug,warn`). `None` falls back to the
    /// `RUST_LOG` environment variable.
    pub filter: Option<String>,
    /// Emit ANSI color codes.
    pub ansi: bool,
    /// Include the event's target in output.
    pub with_target: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            filter: None,
            ansi: true,
            with_target: true,
        }
    }
}

impl LoggingOptions {
    /// Apply a configuration section (conventionally `Logging`): reads
    /// `Filter`, `Ansi`, and `WithTarget` keys when present.
    pub fn apply_section(&mut self, section: &Configuration) {
        if let Some(filter) = section.get("Filter") {
            self.filter = Some(filter.to_string());
        }
        if let Some(ansi) = section.get("Ansi") {
            self.ansi = ansi.eq_ignore_ascii_case("true");
        }
        if let Some(with_target) = section.get("WithTarget") {
            self.with_target = with_target.eq_ignore_ascii_case("true");
        }
    }

    /// Install a `tracing-subscriber` fmt subscriber per these options.
    ///
    /// # Errors
    ///
    /// Fails when the filter directives do not parse or when a global
    /// subscriber is already installed.
    pub fn try_init(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let filter = match &self.filter {
            Some(directives) => EnvFilter::try_new(directives)?,
            None => EnvFilter::from_default_env(),
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(self.ansi)
            .with_target(self.with_target)
            .try_init()?;
        Ok(())
    }
}
