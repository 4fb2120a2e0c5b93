#![deny(missing_docs)]
//! Hand-built capability registry for kindling.
//!
//! A capability is a type, conventionally `Arc<dyn Trait>` or
//! `Arc<Concrete>`, and the registry maps each capability to an ordered
//! list of factory bindings. [`ServiceCollection`] accumulates bindings;
//! [`ServiceProvider`] resolves them, caching singletons lazily. Multiple
//! bindings behind one capability resolve as an ordered collection
//! ([`ServiceProvider::get_all`]); single resolution takes the last
//! registration, so later registrations replace earlier ones for a slot.
//!
//! There is no reflection and no ambient container: factories are plain
//! closures indexed by `TypeId`, and a type whose dependencies cannot be
//! resolved fails at resolution time, not registration time.

pub mod collection;
pub mod factory;
pub mod provider;

pub use collection::{Binding, Lifetime, ServiceCollection};
pub use factory::{DefaultProviderFactory, ProviderFactory};
pub use kindling_core::RegistryError;
pub use provider::{ProviderOptions, ServiceProvider};
