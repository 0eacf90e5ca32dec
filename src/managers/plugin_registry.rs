//! Plugin Registry for Tunedeck.
//!
//! Maps stable plugin identifiers to back-end capabilities and attaches the
//! enabled ones to a freshly created window.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::host::WindowHandle;
use crate::types::errors::PluginError;

/// Non-visual half of a plugin, attached once per window instance.
pub trait PluginBackend {
    fn attach(&self, window: &WindowHandle) -> Result<(), PluginError>;
}

impl<F> PluginBackend for F
where
    F: Fn(&WindowHandle) -> Result<(), PluginError>,
{
    fn attach(&self, window: &WindowHandle) -> Result<(), PluginError> {
        self(window)
    }
}

/// Registry of plugin back-ends keyed by plugin identifier.
///
/// Plugins without a back-end (front-end only) are simply absent from the
/// table.
#[derive(Default)]
pub struct PluginRegistry {
    backends: HashMap<String, Box<dyn PluginBackend>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `backend` under `id`, replacing any previous back-end.
    pub fn register(&mut self, id: &str, backend: Box<dyn PluginBackend>) {
        if self.backends.insert(id.to_string(), backend).is_some() {
            debug!(event = "plugins.backend_replaced", plugin = id);
        }
    }

    /// Builder form of [`PluginRegistry::register`].
    pub fn with_backend(mut self, id: &str, backend: impl PluginBackend + 'static) -> Self {
        self.register(id, Box::new(backend));
        self
    }

    pub fn has_backend(&self, id: &str) -> bool {
        self.backends.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Attaches every enabled plugin that has a back-end, in `enabled` order.
    ///
    /// Plugins without a back-end are skipped. The first failing back-end
    /// aborts the remaining loads and its error is returned unchanged.
    /// Returns the number of back-ends attached.
    pub fn load_enabled_plugins(
        &self,
        enabled: &[String],
        window: &WindowHandle,
    ) -> Result<usize, PluginError> {
        let mut attached = 0;
        for id in enabled {
            let Some(backend) = self.backends.get(id) else {
                debug!(event = "plugins.no_backend", plugin = %id);
                continue;
            };
            backend.attach(window)?;
            attached += 1;
            info!(event = "plugins.attached", plugin = %id, window_id = %window.id());
        }
        Ok(attached)
    }
}
