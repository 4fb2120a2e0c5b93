//! The configuration contract: layered sources and the merged view.

use crate::error::ConfigError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One named source of configuration key-value pairs.
///
/// Sources are merged in registration order: a later source's key shadows an
/// earlier source's same key. The engine performs no schema validation;
/// values are opaque strings until something binds them.
///
/// Keys use `:` as the section separator (`Logging:Filter`). Loading is
/// synchronous; sources read memory, the process environment, or similar.
pub trait ConfigSource: Send + Sync {
    /// A short name for this source, used in error messages.
    fn name(&self) -> &str;

    /// Produce this source's pairs. Order within one source is not
    /// significant; collisions are resolved across sources, not within them.
    fn load(&self) -> Result<Vec<(String, String)>, ConfigError>;
}

/// The immutable merged configuration view.
///
/// Produced exactly once per build by merging every registered layer; cheap
/// to clone and safe to share, since there is nothing to synchronize once
/// the merge has happened.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    values: Arc<BTreeMap<String, String>>,
}

impl Configuration {
    /// Build a view from an ordered iterator of pairs. Later pairs win on
    /// key collision.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = BTreeMap::new();
        for (key, value) in pairs {
            values.insert(key.into(), value.into());
        }
        Self {
            values: Arc::new(values),
        }
    }

    /// Look up a value by exact key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Whether the view contains the exact key.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// A sub-view of every key under `prefix:`, with the qualifier stripped.
    ///
    /// `section("Logging")` turns `Logging:Filter=debug` into `Filter=debug`.
    /// A key equal to the bare prefix is not part of the section.
    pub fn section(&self, prefix: &str) -> Configuration {
        let qualifier = format!("{prefix}:");
        Configuration::from_pairs(
            self.values
                .iter()
                .filter_map(|(key, value)| {
                    key.strip_prefix(&qualifier)
                        .map(|rest| (rest.to_string(), value.clone()))
                }),
        )
    }

    /// Iterate over all pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// All keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of keys in the view.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the view holds no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
