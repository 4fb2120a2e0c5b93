//! The shared context passed to builder callbacks.

use kindling_core::Configuration;

/// The best-known configuration view at the point a callback runs.
///
/// Configuration-layering callbacks observe the builder's pre-build settings
/// snapshot; the view is replaced exactly once when `build` finalizes the
/// merged configuration, so service-registration callbacks (and anything
/// resolving the seeded `Arc<BuilderContext>` at run time) observe final
/// values. Callbacks receive `&BuilderContext`; there is no shared mutable
/// object to coordinate.
#[derive(Debug, Clone, Default)]
pub struct BuilderContext {
    /// The merged configuration as of this point in the build.
    pub configuration: Configuration,
}
