use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Logical window size in pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1100,
            height: 550,
        }
    }
}

/// Logical window position of the top-left corner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

impl WindowPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Persisted geometry of the main window.
///
/// `size` is always the last non-maximized size; `maximized` is tracked on its
/// own so that un-maximizing restores the prior size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowState {
    pub size: WindowSize,
    pub position: Option<WindowPosition>,
    pub maximized: bool,
}

/// Everything a window factory needs to construct the native window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowOptions {
    pub title: String,
    pub size: WindowSize,
    pub position: Option<WindowPosition>,
    pub min_size: WindowSize,
    /// Windows are always built hidden; they are shown on ready-to-show.
    pub visible: bool,
}

/// Lifecycle status of the main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStatus {
    /// Constructed but not yet shown.
    Created,
    Visible,
    Hidden,
    Destroyed,
}

/// Outcome of a close request on the main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    /// The close was cancelled and the window hidden instead.
    Hide,
    /// The window may be destroyed.
    Destroy,
}

/// Unique identity of a native window instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(Uuid);

impl WindowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
