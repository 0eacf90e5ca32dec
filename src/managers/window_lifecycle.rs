//! Window Lifecycle Manager for Tunedeck.
//!
//! Builds the main window from persisted geometry, persists move and resize
//! events, and decides whether a close request hides or destroys the window.
//!
//! Status transitions of a single window instance:
//! `Created -> Visible <-> Hidden -> Destroyed`. `Created` moves to `Hidden`
//! instead of `Visible` when the app-visible preference is off.

use tracing::{debug, info, warn};

use crate::host::{WindowFactory, WindowHandle};
use crate::managers::navigation_guard::{HostedOrigin, NavigationGuard};
use crate::platform::PlatformPolicy;
use crate::services::settings_store::SettingsStore;
use crate::types::errors::WindowError;
use crate::types::window::{
    CloseDecision, WindowId, WindowOptions, WindowPosition, WindowSize, WindowStatus,
};

/// Smallest size the main window may be resized to.
pub const MIN_WINDOW_SIZE: WindowSize = WindowSize {
    width: 325,
    height: 425,
};

/// The live main window: native handle, lifecycle status and the navigation
/// guard attached to its content.
pub struct MainWindow {
    handle: WindowHandle,
    status: WindowStatus,
    guard: NavigationGuard,
}

impl MainWindow {
    pub fn new(handle: WindowHandle, guard: NavigationGuard) -> Self {
        Self {
            handle,
            status: WindowStatus::Created,
            guard,
        }
    }

    pub fn handle(&self) -> &WindowHandle {
        &self.handle
    }

    pub fn id(&self) -> WindowId {
        self.handle.id()
    }

    pub fn status(&self) -> WindowStatus {
        self.status
    }

    pub fn is_visible(&self) -> bool {
        self.status == WindowStatus::Visible
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub fn guard_mut(&mut self) -> &mut NavigationGuard {
        &mut self.guard
    }

    fn transition(&mut self, to: WindowStatus) -> Result<(), WindowError> {
        if self.status == WindowStatus::Destroyed && to != WindowStatus::Destroyed {
            return Err(WindowError::InvalidTransition(format!(
                "window {} is destroyed, cannot move to {:?}",
                self.id(),
                to
            )));
        }
        debug!(
            event = "window.transition",
            window_id = %self.id(),
            from = ?self.status,
            to = ?to
        );
        self.status = to;
        Ok(())
    }
}

/// Creates the main window and applies geometry and close transitions.
pub struct WindowLifecycleManager {
    title: String,
    hosted: HostedOrigin,
    policy: PlatformPolicy,
}

impl WindowLifecycleManager {
    pub fn new(title: &str, hosted: HostedOrigin, policy: PlatformPolicy) -> Self {
        Self {
            title: title.to_string(),
            hosted,
            policy,
        }
    }

    pub fn policy(&self) -> PlatformPolicy {
        self.policy
    }

    /// URL the next window loads: the persisted URL when it is on the hosted
    /// origin, the entry URL otherwise.
    pub fn initial_url(&self, settings: &SettingsStore) -> String {
        let persisted = settings.url();
        if self.hosted.matches(persisted) {
            persisted.to_string()
        } else {
            self.hosted.entry_url().to_string()
        }
    }

    /// Builds the main window hidden, at the persisted size and position,
    /// maximizes it if it was maximized, and starts loading its content.
    pub fn create_main_window(
        &self,
        factory: &dyn WindowFactory,
        settings: &SettingsStore,
    ) -> Result<WindowHandle, WindowError> {
        let state = settings.window_state();
        let options = WindowOptions {
            title: self.title.clone(),
            size: state.size,
            position: state.position,
            min_size: MIN_WINDOW_SIZE,
            visible: false,
        };

        let handle = factory.build(&options)?;
        if state.maximized {
            handle.maximize();
        }

        let url = self.initial_url(settings);
        info!(
            event = "window.created",
            window_id = %handle.id(),
            width = state.size.width,
            height = state.size.height,
            maximized = state.maximized,
            url = %url
        );
        handle.load_url(&url);
        Ok(handle)
    }

    /// Moved: overwrites the persisted position.
    pub fn on_moved(&self, settings: &mut SettingsStore, position: WindowPosition) {
        if let Err(e) = settings.set_window_position(position) {
            warn!(event = "window.persist_position_failed", error = %e);
        }
    }

    /// Resized: always records `maximized`; records the size only when not
    /// maximized so a maximize never overwrites the restorable size.
    pub fn on_resized(&self, settings: &mut SettingsStore, size: WindowSize, maximized: bool) {
        if let Err(e) = settings.set_window_maximized(maximized) {
            warn!(event = "window.persist_maximized_failed", error = %e);
        }
        if maximized {
            return;
        }
        if let Err(e) = settings.set_window_size(size) {
            warn!(event = "window.persist_size_failed", error = %e);
        }
    }

    /// Close requested: hides the window when the platform convention or the
    /// tray keeps the app running, unless a force-quit was raised.
    pub fn on_close_requested(
        &self,
        window: &mut MainWindow,
        tray_enabled: bool,
        force_quit: bool,
    ) -> Result<CloseDecision, WindowError> {
        let hide_policy = self.policy.hide_on_close || tray_enabled;
        if hide_policy && !force_quit {
            self.hide(window)?;
            return Ok(CloseDecision::Hide);
        }
        info!(
            event = "window.close_allowed",
            window_id = %window.id(),
            force_quit = force_quit
        );
        Ok(CloseDecision::Destroy)
    }

    /// Ready to show: shows a freshly created window iff `app_visible`.
    /// Later ready signals (page reloads) do nothing.
    pub fn on_ready_to_show(
        &self,
        window: &mut MainWindow,
        app_visible: bool,
    ) -> Result<(), WindowError> {
        if window.status != WindowStatus::Created {
            return Ok(());
        }
        if app_visible {
            self.show(window)
        } else {
            window.transition(WindowStatus::Hidden)
        }
    }

    pub fn show(&self, window: &mut MainWindow) -> Result<(), WindowError> {
        window.transition(WindowStatus::Visible)?;
        window.handle.show();
        Ok(())
    }

    pub fn hide(&self, window: &mut MainWindow) -> Result<(), WindowError> {
        window.transition(WindowStatus::Hidden)?;
        window.handle.hide();
        Ok(())
    }

    /// The native window is gone.
    pub fn on_destroyed(&self, window: &mut MainWindow) {
        let _ = window.transition(WindowStatus::Destroyed);
    }
}
