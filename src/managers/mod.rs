// Tunedeck lifecycle managers
// Managers own the stateful pieces of the main window: geometry and close
// semantics, plugin attachment and navigation interception.

pub mod navigation_guard;
pub mod plugin_registry;
pub mod window_lifecycle;
