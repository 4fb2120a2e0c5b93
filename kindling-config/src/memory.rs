//! In-memory configuration layer.

use kindling_core::{ConfigError, ConfigSource};

/// A named in-memory layer of key-value pairs.
///
/// Used for builder settings, defaults, and tests. The name only appears in
/// error messages and diagnostics.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    pairs: Vec<(String, String)>,
}

impl MemorySource {
    /// Create a layer from the given pairs.
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: "memory".to_string(),
            pairs: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Set the layer's name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl ConfigSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Vec<(String, String)>, ConfigError> {
        Ok(self.pairs.clone())
    }
}
