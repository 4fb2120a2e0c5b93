//! Ordered accumulation and one-shot merge of configuration layers.

use kindling_core::{ConfigError, ConfigSource, Configuration};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Accumulates configuration layers and merges them in registration order.
///
/// Layering callbacks receive `&mut ConfigBuilder` and may add, override, or
/// remove layers before the final view is produced. The builder itself is
/// cheap state; all the work happens in [`build`](ConfigBuilder::build).
#[derive(Default)]
pub struct ConfigBuilder {
    sources: Vec<Arc<dyn ConfigSource>>,
}

impl ConfigBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Append a layer. Later layers win on key collision.
    pub fn add_source(&mut self, source: impl ConfigSource + 'static) -> &mut Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// The registered layers, in registration order.
    pub fn sources(&self) -> &[Arc<dyn ConfigSource>] {
        &self.sources
    }

    /// Remove every registered layer.
    pub fn clear(&mut self) -> &mut Self {
        self.sources.clear();
        self
    }

    /// Merge all layers into the final immutable view.
    ///
    /// Layers are applied in registration order; within the merged map a
    /// later layer's value replaces an earlier layer's value for the same
    /// key. The first source that fails to load aborts the merge.
    pub fn build(&self) -> Result<Configuration, ConfigError> {
        let mut merged: BTreeMap<String, String> = BTreeMap::new();
        for source in &self.sources {
            for (key, value) in source.load()? {
                merged.insert(key, value);
            }
        }
        Ok(Configuration::from_pairs(merged))
    }
}
