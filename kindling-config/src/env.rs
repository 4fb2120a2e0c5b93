//! Process-environment configuration layer.

use kindling_core::{ConfigError, ConfigSource};

/// A layer over the process environment variables.
///
/// With a prefix, only variables named `PREFIX_*` are included and the
/// `PREFIX_` qualifier is stripped. In the remaining name, `__` maps to the
/// `:` section separator, so `APP_Logging__Filter=debug` yields the key
/// `Logging:Filter`. Names are taken verbatim otherwise; lookups are
/// case-sensitive.
///
/// Variables whose name or value is not valid UTF-8 are skipped.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    prefix: Option<String>,
    name: String,
}

impl EnvSource {
    /// A layer over every environment variable.
    pub fn new() -> Self {
        Self {
            prefix: None,
            name: "env".to_string(),
        }
    }

    /// A layer over variables carrying the given prefix.
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("env:{prefix}"),
            prefix: Some(prefix),
        }
    }
}

impl ConfigSource for EnvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Vec<(String, String)>, ConfigError> {
        let qualifier = self.prefix.as_ref().map(|prefix| format!("{prefix}_"));
        let mut pairs = Vec::new();
        for (key, value) in std::env::vars_os() {
            let (Ok(key), Ok(value)) = (key.into_string(), value.into_string()) else {
                continue;
            };
            let key = match &qualifier {
                Some(qualifier) => match key.strip_prefix(qualifier.as_str()) {
                    Some(rest) => rest.to_string(),
                    None => continue,
                },
                None => key,
            };
            pairs.push((key.replace("__", ":"), value));
        }
        Ok(pairs)
    }
}
