use serde::{Deserialize, Serialize};

/// A plugin entry as stored in settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub id: String,
    pub enabled: bool,
}

impl PluginDescriptor {
    pub fn new(id: &str, enabled: bool) -> Self {
        Self {
            id: id.to_string(),
            enabled,
        }
    }
}
