//! Built-in plugin back-ends.
//!
//! `blur-nav-bar` is front-end only and therefore has no back-end here.

pub mod disable_autoplay;
pub mod navigation;

use crate::managers::plugin_registry::PluginRegistry;

/// Registry populated with every built-in back-end.
pub fn builtin_registry() -> PluginRegistry {
    PluginRegistry::new()
        .with_backend(navigation::ID, navigation::NavigationPlugin)
        .with_backend(disable_autoplay::ID, disable_autoplay::DisableAutoplayPlugin)
}
