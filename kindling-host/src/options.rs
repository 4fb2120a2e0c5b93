//! Typed binding of configuration sections.

use kindling_core::{ConfigError, Configuration};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A typed snapshot bound from a configuration section.
///
/// Registered via `AppBuilder::options::<T>(section)` and resolved as
/// `Arc<Options<T>>`. Binding happens lazily, at first resolution.
#[derive(Debug)]
pub struct Options<T> {
    value: T,
}

impl<T> Options<T> {
    pub(crate) fn new(value: T) -> Self {
        Self { value }
    }

    /// The bound value.
    pub fn get(&self) -> &T {
        &self.value
    }
}

/// Binds configuration sections to typed values through serde.
///
/// Seeded into the registry as `Arc<OptionsBinder>` over the final
/// configuration. Flat `:`-separated keys are rebuilt into a nested JSON
/// tree: a node whose keys are all numeric becomes an array, and scalar
/// leaves parse speculatively as bool or number, falling back to string.
/// A scalar and a section sharing one key resolve to the section.
#[derive(Debug, Clone)]
pub struct OptionsBinder {
    configuration: Configuration,
}

impl OptionsBinder {
    /// Create a binder over the given configuration.
    pub fn new(configuration: Configuration) -> Self {
        Self { configuration }
    }

    /// Bind `section` to a `T`. An empty section name binds the whole view.
    pub fn bind<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
        let view = if section.is_empty() {
            self.configuration.clone()
        } else {
            self.configuration.section(section)
        };
        serde_json::from_value(json_tree(&view)).map_err(|error| ConfigError::Bind {
            section: section.to_string(),
            message: error.to_string(),
        })
    }
}

fn json_tree(view: &Configuration) -> Value {
    let mut root = Map::new();
    for (key, value) in view.iter() {
        let path: Vec<&str> = key.split(':').collect();
        insert_path(&mut root, &path, value);
    }
    arrayify(Value::Object(root))
}

fn insert_path(node: &mut Map<String, Value>, path: &[&str], leaf: &str) {
    match path {
        [] => {}
        [last] => {
            node.insert((*last).to_string(), parse_leaf(leaf));
        }
        [head, rest @ ..] => {
            let child = node
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(map) = child {
                insert_path(map, rest, leaf);
            }
        }
    }
}

fn parse_leaf(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(integer) = raw.parse::<i64>() {
        return Value::Number(integer.into());
    }
    if let Ok(float) = raw.parse::<f64>()
        && let Some(number) = serde_json::Number::from_f64(float)
    {
        return Value::Number(number);
    }
    Value::String(raw.to_string())
}

fn arrayify(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let map: Map<String, Value> = map
                .into_iter()
                .map(|(key, child)| (key, arrayify(child)))
                .collect();
            let indexed: Option<Vec<(usize, &Value)>> = map
                .iter()
                .map(|(key, child)| key.parse::<usize>().ok().map(|index| (index, child)))
                .collect();
            match indexed {
                Some(mut entries) if !entries.is_empty() => {
                    entries.sort_by_key(|(index, _)| *index);
                    Value::Array(entries.into_iter().map(|(_, child)| child.clone()).collect())
                }
                _ => Value::Object(map),
            }
        }
        other => other,
    }
}
