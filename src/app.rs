//! App Core for Tunedeck.
//!
//! The orchestrator reacting to process lifecycle signals (ready, activate,
//! window-all-closed, before-quit) and routing window and content events to
//! the managers. It is the sole owner of the main window.

use tracing::{debug, info};

use crate::host::{Shell, WindowFactory};
use crate::managers::navigation_guard::{HostedOrigin, InterceptorTable, NavigationGuard};
use crate::managers::plugin_registry::PluginRegistry;
use crate::managers::window_lifecycle::{MainWindow, WindowLifecycleManager};
use crate::platform::PlatformPolicy;
use crate::services::settings_store::SettingsStore;
use crate::types::errors::{AppError, WindowError};
use crate::types::navigation::{NewWindowRequest, NewWindowRoute, WindowFeatures};
use crate::types::settings::DEFAULT_URL;
use crate::types::update::{Notice, UpdateInfo};
use crate::types::window::{CloseDecision, WindowPosition, WindowSize};

pub const APP_TITLE: &str = "Tunedeck";

/// Single-slot cell holding the main window.
///
/// `create` refuses to build while the slot is occupied, so at most one main
/// window exists at any time.
#[derive(Default)]
pub struct MainWindowSlot {
    window: Option<MainWindow>,
}

impl MainWindowSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `build` and stores its window. Fails without calling `build` when
    /// a window already exists.
    pub fn create(
        &mut self,
        build: impl FnOnce() -> Result<MainWindow, AppError>,
    ) -> Result<&mut MainWindow, AppError> {
        if let Some(existing) = &self.window {
            return Err(WindowError::AlreadyExists(existing.id().to_string()).into());
        }
        let window = build()?;
        Ok(self.window.insert(window))
    }

    /// Empties the slot, returning the window it held.
    pub fn clear(&mut self) -> Option<MainWindow> {
        self.window.take()
    }

    pub fn get(&self) -> Option<&MainWindow> {
        self.window.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut MainWindow> {
        self.window.as_mut()
    }

    pub fn is_occupied(&self) -> bool {
        self.window.is_some()
    }
}

/// Central application struct wiring settings, managers and the shell.
pub struct App {
    settings: SettingsStore,
    lifecycle: WindowLifecycleManager,
    plugins: PluginRegistry,
    interceptors: InterceptorTable,
    hosted: HostedOrigin,
    shell: Box<dyn Shell>,
    main_window: MainWindowSlot,
    force_quit: bool,
    dev_build: bool,
}

impl App {
    /// Creates an App hosting the default entry URL, with no plugins and the
    /// known authentication-provider interceptors.
    pub fn new(
        settings: SettingsStore,
        shell: Box<dyn Shell>,
        policy: PlatformPolicy,
    ) -> Result<Self, AppError> {
        let hosted = HostedOrigin::parse(DEFAULT_URL)?;
        Ok(Self {
            settings,
            lifecycle: WindowLifecycleManager::new(APP_TITLE, hosted.clone(), policy),
            plugins: PluginRegistry::new(),
            interceptors: InterceptorTable::auth_providers(),
            hosted,
            shell,
            main_window: MainWindowSlot::new(),
            force_quit: false,
            dev_build: false,
        })
    }

    pub fn with_plugins(mut self, plugins: PluginRegistry) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn with_interceptors(mut self, interceptors: InterceptorTable) -> Self {
        self.interceptors = interceptors;
        self
    }

    /// Development builds never check for updates.
    pub fn with_dev_build(mut self, dev_build: bool) -> Self {
        self.dev_build = dev_build;
        self
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    pub fn main_window(&self) -> Option<&MainWindow> {
        self.main_window.get()
    }

    pub fn is_force_quit(&self) -> bool {
        self.force_quit
    }

    // ─── Process lifecycle ───

    /// Ready: create the window, wire menu, tray and login item, then request
    /// an update check off the critical path.
    pub fn on_ready(&mut self, factory: &dyn WindowFactory) -> Result<(), AppError> {
        self.create_main_window(factory)?;

        if let Some(window) = self.main_window.get() {
            let handle = window.handle().clone();
            self.shell.set_application_menu(&handle);
            self.shell.set_up_tray(&handle);
        }
        self.shell.set_login_item(self.settings.start_at_login());

        if self.settings.auto_update() && !self.dev_build {
            debug!(event = "app.update_check_requested");
            self.shell.request_update_check();
        }
        info!(event = "app.ready");
        Ok(())
    }

    /// Activate: recreate a missing window or show a hidden one.
    pub fn on_activate(&mut self, factory: &dyn WindowFactory) -> Result<(), AppError> {
        match self.main_window.get_mut() {
            None => self.create_main_window(factory),
            Some(window) if !window.is_visible() => {
                self.lifecycle.show(window)?;
                Ok(())
            }
            Some(_) => Ok(()),
        }
    }

    /// All windows closed: quit unless the platform keeps apps running.
    pub fn on_window_all_closed(&mut self) {
        if self.lifecycle.policy().keeps_running_without_windows {
            debug!(event = "app.kept_running_without_windows");
            return;
        }
        info!(event = "app.quitting");
        self.shell.unregister_all_shortcuts();
        self.shell.quit();
    }

    /// Before quit: later close requests are never turned into a hide.
    pub fn on_before_quit(&mut self) {
        self.force_quit = true;
        info!(event = "app.force_quit_raised");
    }

    /// User-initiated quit (quit shortcut or menu): raises force-quit first so
    /// the close that follows is never turned into a hide.
    pub fn on_quit_requested(&mut self) {
        self.on_before_quit();
        self.shell.unregister_all_shortcuts();
        self.shell.quit();
    }

    pub fn on_update_available(&mut self, info: &UpdateInfo) {
        info!(event = "app.update_available", version = %info.version);
        let parent = self.main_window.get().map(|w| w.handle().clone());
        self.shell
            .show_message(parent.as_ref(), &Notice::update_available(info));
    }

    // ─── Window events ───

    pub fn on_window_moved(&mut self, position: WindowPosition) {
        if self.main_window.is_occupied() {
            self.lifecycle.on_moved(&mut self.settings, position);
        }
    }

    pub fn on_window_resized(&mut self, size: WindowSize, maximized: bool) {
        if self.main_window.is_occupied() {
            self.lifecycle.on_resized(&mut self.settings, size, maximized);
        }
    }

    /// A window starting hidden is only honored when the user can bring it
    /// back through a tray or the platform's reopen convention.
    pub fn on_ready_to_show(&mut self) -> Result<(), AppError> {
        let app_visible = self.settings.is_app_visible() || !self.can_restore_hidden_window();
        if let Some(window) = self.main_window.get_mut() {
            self.lifecycle.on_ready_to_show(window, app_visible)?;
        }
        Ok(())
    }

    pub fn on_close_requested(&mut self) -> Result<CloseDecision, AppError> {
        let tray_enabled = self.settings.is_tray_enabled() && self.shell.has_tray();
        match self.main_window.get_mut() {
            Some(window) => Ok(self
                .lifecycle
                .on_close_requested(window, tray_enabled, self.force_quit)?),
            None => Ok(CloseDecision::Destroy),
        }
    }

    /// The main window was destroyed; the slot is emptied so a later
    /// activation can recreate it.
    pub fn on_window_closed(&mut self) {
        if let Some(mut window) = self.main_window.clear() {
            self.lifecycle.on_destroyed(&mut window);
            info!(event = "window.destroyed", window_id = %window.id());
        }
    }

    // ─── Content events ───

    pub fn on_load_failed(&mut self, url: &str) -> bool {
        match self.main_window.get_mut() {
            Some(window) => {
                let handle = window.handle().clone();
                window.guard_mut().on_load_failed(&handle, url)
            }
            None => false,
        }
    }

    pub fn on_navigated_in_page(&mut self, url: &str) -> bool {
        match self.main_window.get_mut() {
            Some(window) => window.guard_mut().on_navigated_in_page(url, &mut self.settings),
            None => false,
        }
    }

    pub fn on_will_navigate(&mut self, url: &str) -> bool {
        self.main_window
            .get_mut()
            .map(|w| w.guard_mut().on_will_navigate(url))
            .unwrap_or(false)
    }

    pub fn request_headers(&self, url: &str) -> Vec<(String, String)> {
        self.main_window
            .get()
            .map(|w| w.guard().request_headers(url))
            .unwrap_or_default()
    }

    pub fn on_new_window(&mut self, request: &NewWindowRequest) -> Option<WindowFeatures> {
        self.main_window
            .get_mut()
            .map(|w| w.guard_mut().on_new_window(request))
    }

    pub fn route_new_window(&self, url: &str) -> Option<NewWindowRoute> {
        self.main_window
            .get()
            .map(|w| w.guard().route_new_window(url))
    }

    // ─── Internals ───

    fn can_restore_hidden_window(&self) -> bool {
        self.shell.has_tray() || self.lifecycle.policy().keeps_running_without_windows
    }

    /// Builds the window, attaches the navigation guard and the enabled
    /// plugins, and only then stores it. The window stays hidden until
    /// ready-to-show, so no user-visible event can race this wiring.
    fn create_main_window(&mut self, factory: &dyn WindowFactory) -> Result<(), AppError> {
        let lifecycle = &self.lifecycle;
        let settings = &self.settings;
        let plugins = &self.plugins;
        let hosted = &self.hosted;
        let interceptors = &self.interceptors;

        self.main_window.create(|| {
            let handle = lifecycle.create_main_window(factory, settings)?;
            let guard = NavigationGuard::attach(&handle, hosted.clone(), interceptors.clone());
            let enabled = settings.enabled_plugins();
            let attached = match plugins.load_enabled_plugins(&enabled, &handle) {
                Ok(attached) => attached,
                Err(e) => {
                    // The slot stays empty, so the native window must not outlive this call.
                    handle.destroy();
                    return Err(e.into());
                }
            };
            debug!(
                event = "plugins.loaded",
                enabled = enabled.len(),
                attached = attached
            );
            Ok(MainWindow::new(handle, guard))
        })?;
        Ok(())
    }
}
