use thiserror::Error;

// === SettingsError ===

/// Errors related to settings persistence.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === WindowError ===

/// Errors raised while building or driving the main window.
#[derive(Debug, Error)]
pub enum WindowError {
    /// The native window could not be created.
    #[error("Window creation failed: {0}")]
    CreationFailed(String),
    /// A main window already exists; only one may be live at a time.
    #[error("Main window already exists: {0}")]
    AlreadyExists(String),
    /// The requested transition is not valid from the window's current status.
    #[error("Invalid window transition: {0}")]
    InvalidTransition(String),
}

// === PluginError ===

/// Errors raised by plugin back-ends.
#[derive(Debug, Error)]
pub enum PluginError {
    /// A plugin back-end failed while attaching to a window.
    #[error("Plugin '{id}' failed to attach: {reason}")]
    AttachFailed { id: String, reason: String },
}

// === NavigationError ===

/// Errors related to URLs the main window navigates to.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// The URL could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    /// The URL has no tuple origin (e.g. `data:` or `file:` URLs).
    #[error("URL has no origin: {0}")]
    OpaqueOrigin(String),
    /// The URL could not be reached.
    #[error("Unreachable URL '{url}': {reason}")]
    Unreachable { url: String, reason: String },
}

// === UpdateError ===

/// Errors related to update checks.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// A network error occurred while checking for updates.
    #[error("Update network error: {0}")]
    NetworkError(String),
    /// Failed to parse the release information.
    #[error("Update parse error: {0}")]
    ParseError(String),
}

// === AppError ===

/// Top-level error surfaced by the application orchestrator.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Window(#[from] WindowError),
    #[error(transparent)]
    Plugin(#[from] PluginError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}
