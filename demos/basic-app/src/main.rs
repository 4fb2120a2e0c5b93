//! Minimal host composition: two executables, one run per discipline.

use async_trait::async_trait;
use kindling::prelude::*;
use std::sync::Arc;

/// Greets whoever the configuration names.
#[derive(Default)]
struct Greet;

#[async_trait]
impl Executable for Greet {
    async fn execute(&self, _args: &[String]) -> Result<(), ExecError> {
        tracing::info!("hello");
        Ok(())
    }
}

/// Greets by name, resolved from configuration through the provider.
struct GreetByName {
    name: String,
}

#[async_trait]
impl Executable for GreetByName {
    async fn execute(&self, args: &[String]) -> Result<(), ExecError> {
        tracing::info!(name = %self.name, ?args, "hello again");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut builder = AppBuilder::with_defaults();
    builder
        .use_setting("Greeting:Name", "world")
        .executable::<Greet>()
        .executable_with::<GreetByName, _>(|provider| {
            let config = provider.get_required::<Arc<Configuration>>()?;
            Ok(GreetByName {
                name: config.get("Greeting:Name").unwrap_or("stranger").to_string(),
            })
        });

    let host = builder.build()?;
    host.services()
        .get_required::<Arc<LoggingOptions>>()?
        .try_init()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    host.run(&args).await?;
    host.shutdown();
    Ok(())
}
