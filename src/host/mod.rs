//! Seams between the lifecycle core and the native host.
//!
//! The core never touches a windowing system directly: it drives windows
//! through [`NativeWindow`], builds them through [`WindowFactory`] and reaches
//! menus, tray, login items, dialogs and the update service through [`Shell`].
//! The `gui` host implements these over `tao` + `wry`; [`recording`] provides
//! in-process implementations that record every call.

pub mod recording;

use std::rc::Rc;

use crate::types::errors::WindowError;
use crate::types::update::Notice;
use crate::types::window::{WindowId, WindowOptions};

/// Operations the core performs on a live native window.
///
/// All methods take `&self`; implementations use interior mutability since
/// every call happens on the single dispatch thread.
pub trait NativeWindow {
    fn id(&self) -> WindowId;
    fn maximize(&self);
    fn show(&self);
    fn hide(&self);
    fn is_visible(&self) -> bool;
    fn load_url(&self, url: &str);
    fn load_url_with_headers(&self, url: &str, headers: &[(String, String)]);
    /// Replaces the content with the bundled static error page.
    fn load_error_page(&self);
    /// Runs `script` in the current document and on every later page load.
    fn inject_script(&self, script: &str);
    fn destroy(&self);
}

/// Shared handle to the main window. Cloning yields the same window.
pub type WindowHandle = Rc<dyn NativeWindow>;

/// Builds native windows.
pub trait WindowFactory {
    fn build(&self, options: &WindowOptions) -> Result<WindowHandle, WindowError>;
}

/// Process-level collaborators outside the lifecycle core.
pub trait Shell {
    fn set_application_menu(&mut self, window: &WindowHandle);
    fn set_up_tray(&mut self, window: &WindowHandle);
    /// True when a tray icon exists from which a hidden window can be
    /// restored and the app quit.
    fn has_tray(&self) -> bool;
    fn set_login_item(&mut self, open_at_login: bool);
    fn unregister_all_shortcuts(&mut self);
    fn quit(&mut self);
    fn show_message(&mut self, parent: Option<&WindowHandle>, notice: &Notice);
    /// Starts an update check off the dispatch thread. A found update comes
    /// back through `App::on_update_available`.
    fn request_update_check(&mut self);
}
