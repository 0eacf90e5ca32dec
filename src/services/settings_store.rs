// Tunedeck Settings Store
// Persists window geometry, the last hosted URL, plugin state and options.
// Settings are stored as a JSON file at the platform-specific config path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::plugin::PluginDescriptor;
use crate::types::settings::AppSettings;
use crate::types::window::{WindowPosition, WindowSize, WindowState};

/// Trait defining the settings store interface.
pub trait SettingsStoreTrait {
    fn load(&mut self) -> Result<AppSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &AppSettings;
    fn get_value(&self, key: &str) -> Result<serde_json::Value, SettingsError>;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> Option<&Path>;
}

/// Settings store that keeps settings in memory and mirrors them to a JSON file.
///
/// A store created with [`SettingsStore::in_memory`] has no backing file and
/// never touches disk.
pub struct SettingsStore {
    config_path: Option<PathBuf>,
    settings: AppSettings,
}

impl SettingsStore {
    /// Creates a new SettingsStore.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses the platform-specific config directory with `config.json`.
    pub fn new(path_override: Option<PathBuf>) -> Self {
        let config_path =
            path_override.unwrap_or_else(|| platform::get_config_dir().join("config.json"));
        Self {
            config_path: Some(config_path),
            settings: AppSettings::default(),
        }
    }

    /// Creates a store with no backing file, seeded with `settings`.
    pub fn in_memory(settings: AppSettings) -> Self {
        Self {
            config_path: None,
            settings,
        }
    }

    /// Geometry the next main window should be built with.
    pub fn window_state(&self) -> WindowState {
        WindowState {
            size: self.settings.window_size,
            position: self.settings.window_position,
            maximized: self.settings.window_maximized,
        }
    }

    pub fn set_window_position(&mut self, position: WindowPosition) -> Result<(), SettingsError> {
        self.settings.window_position = Some(position);
        self.save()
    }

    pub fn set_window_size(&mut self, size: WindowSize) -> Result<(), SettingsError> {
        if size.width == 0 || size.height == 0 {
            return Err(SettingsError::InvalidValue(format!(
                "window-size must be non-zero, got {}x{}",
                size.width, size.height
            )));
        }
        self.settings.window_size = size;
        self.save()
    }

    pub fn set_window_maximized(&mut self, maximized: bool) -> Result<(), SettingsError> {
        self.settings.window_maximized = maximized;
        self.save()
    }

    /// Last persisted in-page URL of the hosted application.
    pub fn url(&self) -> &str {
        &self.settings.url
    }

    pub fn set_url(&mut self, url: &str) -> Result<(), SettingsError> {
        self.settings.url = url.to_string();
        self.save()
    }

    /// Identifiers of enabled plugins, in stored order.
    pub fn enabled_plugins(&self) -> Vec<String> {
        self.settings
            .plugins
            .iter()
            .filter(|p| p.enabled)
            .map(|p| p.id.clone())
            .collect()
    }

    /// Enables or disables a plugin, appending it if it is not yet known.
    pub fn set_plugin_enabled(&mut self, id: &str, enabled: bool) -> Result<(), SettingsError> {
        match self.settings.plugins.iter_mut().find(|p| p.id == id) {
            Some(plugin) => plugin.enabled = enabled,
            None => self
                .settings
                .plugins
                .push(PluginDescriptor::new(id, enabled)),
        }
        self.save()
    }

    pub fn start_at_login(&self) -> bool {
        self.settings.options.start_at_login
    }

    pub fn is_app_visible(&self) -> bool {
        self.settings.options.app_visible
    }

    pub fn is_tray_enabled(&self) -> bool {
        self.settings.options.tray
    }

    pub fn auto_update(&self) -> bool {
        self.settings.options.auto_update
    }
}

impl SettingsStoreTrait for SettingsStore {
    /// Loads settings from the JSON config file.
    ///
    /// If the file does not exist, returns default settings.
    /// If the file exists but is malformed, returns a serialization error.
    fn load(&mut self) -> Result<AppSettings, SettingsError> {
        let Some(path) = self.config_path.as_deref() else {
            return Ok(self.settings.clone());
        };

        if !path.exists() {
            self.settings = AppSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        let settings: AppSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Saves the current settings to the JSON config file.
    ///
    /// Creates parent directories if they don't exist.
    fn save(&self) -> Result<(), SettingsError> {
        let Some(path) = self.config_path.as_deref() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn get_settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Reads a value by dot-notation key path, e.g. `"window-size.width"`.
    fn get_value(&self, key: &str) -> Result<serde_json::Value, SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let json_value = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        let mut current = &json_value;
        for part in key.split('.') {
            current = current
                .get(part)
                .ok_or_else(|| SettingsError::InvalidKey(format!("Key '{}' not found", key)))?;
        }
        Ok(current.clone())
    }

    /// Updates an individual setting by dot-notation key path.
    ///
    /// Converts the current settings to a `serde_json::Value`, navigates the
    /// dot-separated key path, updates the target value, then deserializes
    /// back into `AppSettings`. Saves to disk after a successful update.
    ///
    /// # Examples
    /// - `"url"` → updates `settings.url`
    /// - `"window-size.width"` → updates `settings.window_size.width`
    /// - `"options.tray"` → updates `settings.options.tray`
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let parts: Vec<&str> = key.split('.').collect();

        let mut json_value = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        {
            let mut current = &mut json_value;
            for (i, part) in parts.iter().enumerate() {
                if i == parts.len() - 1 {
                    match current {
                        serde_json::Value::Object(map) => {
                            if !map.contains_key(*part) {
                                return Err(SettingsError::InvalidKey(format!(
                                    "Key '{}' not found in settings",
                                    key
                                )));
                            }
                            map.insert(part.to_string(), value.clone());
                        }
                        _ => {
                            return Err(SettingsError::InvalidKey(format!(
                                "Cannot navigate to key '{}': intermediate value is not an object",
                                key
                            )));
                        }
                    }
                } else {
                    current = match current.get_mut(*part) {
                        Some(v) => v,
                        None => {
                            return Err(SettingsError::InvalidKey(format!(
                                "Key '{}' not found in settings",
                                key
                            )));
                        }
                    };
                }
            }
        }

        // Round-trip through AppSettings to validate the new value
        let new_settings: AppSettings = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        self.settings = new_settings;
        self.save()?;

        Ok(())
    }

    /// Resets all settings to factory defaults and saves to disk.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = AppSettings::default();
        self.save()?;
        Ok(())
    }

    fn get_config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
