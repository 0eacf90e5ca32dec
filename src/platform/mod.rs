// Tunedeck platform conventions
// Provides the config path and the per-OS window/quit conventions.
//
// Uses `cfg!(target_os)` so the conventions can still be overridden in tests.

use std::path::PathBuf;

const APP_DIR_NAME: &str = "tunedeck";

/// Environment variable that forces a development build at runtime.
pub const DEV_ENV_VAR: &str = "TUNEDECK_DEV";

/// Per-platform conventions the lifecycle logic depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformPolicy {
    /// Closing the main window hides it instead of destroying it.
    pub hide_on_close: bool,
    /// The process stays alive with no window (persistent dock/menu bar).
    pub keeps_running_without_windows: bool,
}

impl PlatformPolicy {
    /// Conventions of the platform this binary was compiled for.
    ///
    /// - **macOS**: hide on close, keep running without windows.
    /// - **Linux / Windows**: destroy on close, quit when the last window closes.
    pub fn current() -> Self {
        let mac = cfg!(target_os = "macos");
        Self {
            hide_on_close: mac,
            keeps_running_without_windows: mac,
        }
    }
}

impl Default for PlatformPolicy {
    fn default() -> Self {
        Self::current()
    }
}

/// Returns the configuration directory for Tunedeck.
///
/// - **Linux**: `$XDG_CONFIG_HOME/tunedeck` or `~/.config/tunedeck`
/// - **macOS**: `~/Library/Application Support/tunedeck`
/// - **Windows**: `%APPDATA%/tunedeck`
pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

/// True for debug builds or when `TUNEDECK_DEV` is set to a truthy value.
pub fn is_dev_build() -> bool {
    cfg!(debug_assertions) || dev_flag(std::env::var(DEV_ENV_VAR).ok().as_deref())
}

fn dev_flag(value: Option<&str>) -> bool {
    matches!(value, Some("1") | Some("true") | Some("yes"))
}
