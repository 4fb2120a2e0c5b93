#![deny(missing_docs)]
//! Configuration layering for kindling.
//!
//! The [`ConfigBuilder`] collects [`ConfigSource`] layers in registration
//! order and merges them into one immutable
//! [`Configuration`](kindling_core::Configuration); a later layer's key
//! shadows an earlier layer's same key. Two sources are provided:
//! [`MemorySource`] (named in-memory pairs) and [`EnvSource`] (process
//! environment variables with an optional prefix filter).
//!
//! No file parsing lives here. A settings file becomes a layer by loading it
//! elsewhere and handing the pairs to a [`MemorySource`].

pub mod builder;
pub mod env;
pub mod memory;

pub use builder::ConfigBuilder;
pub use env::EnvSource;
pub use kindling_core::ConfigSource;
pub use memory::MemorySource;
