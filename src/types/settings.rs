use serde::{Deserialize, Serialize};

use super::plugin::PluginDescriptor;
use super::window::{WindowPosition, WindowSize};

/// Entry URL of the hosted application. Its origin is the hosted origin.
pub const DEFAULT_URL: &str = "https://music.youtube.com";

/// Top-level persisted settings container.
///
/// Field names serialize in kebab-case, so the on-disk keys are
/// `window-size`, `window-maximized`, `window-position`, `url`, `plugins`
/// and `options`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct AppSettings {
    pub window_size: WindowSize,
    pub window_maximized: bool,
    #[serde(default)]
    pub window_position: Option<WindowPosition>,
    pub url: String,
    pub plugins: Vec<PluginDescriptor>,
    pub options: AppOptions,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            window_size: WindowSize::default(),
            window_maximized: false,
            window_position: None,
            url: DEFAULT_URL.to_string(),
            plugins: Self::default_plugins(),
            options: AppOptions::default(),
        }
    }
}

impl AppSettings {
    /// Returns the plugins shipped with the application and their default state.
    pub fn default_plugins() -> Vec<PluginDescriptor> {
        vec![
            PluginDescriptor::new("navigation", true),
            PluginDescriptor::new("blur-nav-bar", true),
            PluginDescriptor::new("disable-autoplay", false),
        ]
    }
}

/// User-facing application options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct AppOptions {
    /// Keep the app in the tray; closing the window hides it.
    pub tray: bool,
    /// Show the window once its content is ready.
    #[serde(default = "default_true")]
    pub app_visible: bool,
    pub start_at_login: bool,
    #[serde(default = "default_true")]
    pub auto_update: bool,
    #[serde(default)]
    pub hide_menu: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            tray: false,
            app_visible: true,
            start_at_login: false,
            auto_update: true,
            hide_menu: false,
        }
    }
}
