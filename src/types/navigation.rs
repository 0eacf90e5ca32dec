use serde::{Deserialize, Serialize};

/// Affinity group shared by the main window and every window it opens.
pub const MAIN_WINDOW_AFFINITY: &str = "main-window";

/// Privilege level of content running in a window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Privilege {
    /// No access to native integration. The default for opened windows.
    Reduced,
    Full,
}

/// Properties of a window opened from the hosted content.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowFeatures {
    pub affinity: Option<String>,
    pub privilege: Option<Privilege>,
}

/// A request from the hosted content to open a new window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWindowRequest {
    pub url: String,
    pub features: WindowFeatures,
}

/// A single request-header override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRewrite {
    pub header: String,
    pub value: String,
}

/// Where a window opened from the hosted content is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewWindowRoute {
    /// Replaces the main window's content (hosted or intercepted origins).
    MainWindow,
    /// Handed to the system browser.
    External,
}
