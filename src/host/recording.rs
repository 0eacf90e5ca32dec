//! In-process host that records every call made by the core.
//!
//! Drives the headless build of the binary and the test suite.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{NativeWindow, Shell, WindowFactory, WindowHandle};
use crate::types::errors::WindowError;
use crate::types::update::Notice;
use crate::types::window::{WindowId, WindowOptions};

/// A call made on a [`RecordingWindow`].
#[derive(Debug, Clone, PartialEq)]
pub enum WindowCall {
    Maximize,
    Show,
    Hide,
    LoadUrl(String),
    LoadUrlWithHeaders(String, Vec<(String, String)>),
    LoadErrorPage,
    InjectScript(String),
    Destroy,
}

/// Window that keeps visibility state and a log of calls.
#[derive(Debug)]
pub struct RecordingWindow {
    id: WindowId,
    options: WindowOptions,
    visible: Cell<bool>,
    maximized: Cell<bool>,
    calls: RefCell<Vec<WindowCall>>,
}

impl RecordingWindow {
    pub fn new(options: WindowOptions) -> Self {
        Self {
            id: WindowId::new(),
            visible: Cell::new(options.visible),
            maximized: Cell::new(false),
            options,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Options the window was built with.
    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized.get()
    }

    pub fn calls(&self) -> Vec<WindowCall> {
        self.calls.borrow().clone()
    }

    /// URLs passed to `load_url`, in order.
    pub fn loaded_urls(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                WindowCall::LoadUrl(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &WindowCall) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: WindowCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl NativeWindow for RecordingWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn maximize(&self) {
        self.maximized.set(true);
        self.record(WindowCall::Maximize);
    }

    fn show(&self) {
        self.visible.set(true);
        self.record(WindowCall::Show);
    }

    fn hide(&self) {
        self.visible.set(false);
        self.record(WindowCall::Hide);
    }

    fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn load_url(&self, url: &str) {
        self.record(WindowCall::LoadUrl(url.to_string()));
    }

    fn load_url_with_headers(&self, url: &str, headers: &[(String, String)]) {
        self.record(WindowCall::LoadUrlWithHeaders(url.to_string(), headers.to_vec()));
    }

    fn load_error_page(&self) {
        self.record(WindowCall::LoadErrorPage);
    }

    fn inject_script(&self, script: &str) {
        self.record(WindowCall::InjectScript(script.to_string()));
    }

    fn destroy(&self) {
        self.visible.set(false);
        self.record(WindowCall::Destroy);
    }
}

/// Factory that builds [`RecordingWindow`]s and remembers them.
#[derive(Debug, Default)]
pub struct RecordingFactory {
    windows: RefCell<Vec<Rc<RecordingWindow>>>,
    fail_next: Cell<bool>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `build` call fail.
    pub fn fail_next_build(&self) {
        self.fail_next.set(true);
    }

    pub fn built_count(&self) -> usize {
        self.windows.borrow().len()
    }

    pub fn last_window(&self) -> Option<Rc<RecordingWindow>> {
        self.windows.borrow().last().cloned()
    }
}

impl WindowFactory for RecordingFactory {
    fn build(&self, options: &WindowOptions) -> Result<WindowHandle, WindowError> {
        if self.fail_next.replace(false) {
            return Err(WindowError::CreationFailed(
                "recording factory told to fail".to_string(),
            ));
        }
        let window = Rc::new(RecordingWindow::new(options.clone()));
        self.windows.borrow_mut().push(window.clone());
        Ok(window as WindowHandle)
    }
}

/// A call made on a [`RecordingShell`].
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCall {
    SetApplicationMenu(WindowId),
    SetUpTray(WindowId),
    SetLoginItem(bool),
    UnregisterAllShortcuts,
    Quit,
    ShowMessage(Notice),
    RequestUpdateCheck,
}

/// Shell recording its calls into a log shared by all clones.
///
/// Reports a tray unless built with [`RecordingShell::without_tray`].
#[derive(Debug, Clone)]
pub struct RecordingShell {
    calls: Rc<RefCell<Vec<ShellCall>>>,
    tray: bool,
}

impl Default for RecordingShell {
    fn default() -> Self {
        Self {
            calls: Rc::default(),
            tray: true,
        }
    }
}

impl RecordingShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// A shell with no tray icon to restore a hidden window from.
    pub fn without_tray() -> Self {
        Self {
            tray: false,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ShellCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, call: &ShellCall) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: ShellCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Shell for RecordingShell {
    fn set_application_menu(&mut self, window: &WindowHandle) {
        self.record(ShellCall::SetApplicationMenu(window.id()));
    }

    fn set_up_tray(&mut self, window: &WindowHandle) {
        self.record(ShellCall::SetUpTray(window.id()));
    }

    fn has_tray(&self) -> bool {
        self.tray
    }

    fn set_login_item(&mut self, open_at_login: bool) {
        self.record(ShellCall::SetLoginItem(open_at_login));
    }

    fn unregister_all_shortcuts(&mut self) {
        self.record(ShellCall::UnregisterAllShortcuts);
    }

    fn quit(&mut self) {
        self.record(ShellCall::Quit);
    }

    fn show_message(&mut self, _parent: Option<&WindowHandle>, notice: &Notice) {
        self.record(ShellCall::ShowMessage(notice.clone()));
    }

    fn request_update_check(&mut self) {
        self.record(ShellCall::RequestUpdateCheck);
    }
}
