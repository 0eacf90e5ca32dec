//! Native host for Tunedeck using `wry` + `tao`.
//!
//! Architecture:
//! - The main window is built by [`WryFactory`] whenever the core asks for
//!   one (ready, or activate after the window was destroyed).
//! - `with_initialization_script(URL_WATCH_JS)` reports in-page navigations
//!   over IPC so the core can persist the current URL.
//! - The bundled error page is served via the `tunedeck://` custom protocol.
//! - Load failures are detected by probing the URL with `reqwest` on a worker
//!   thread, since the webview offers no portable failure callback.
//! - Navigations to an intercepted origin are cancelled once and replayed
//!   with the rewritten request headers.
//! - Popups stay in the main webview only for hosted or intercepted origins;
//!   everything else opens in the system browser.
//! - There is no tray, so Ctrl/Cmd+Q in the page is the user-initiated quit.
//! - Worker threads talk back to the event loop only through
//!   [`EventLoopProxy`]; all core state stays on the event loop thread.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tao::dpi::{LogicalPosition, LogicalSize};
use tao::event::{Event, StartCause, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy, EventLoopWindowTarget};
use tao::window::{Window, WindowBuilder};
use tracing::{debug, error, info, warn};
use wry::http::header::{HeaderMap, HeaderName, HeaderValue};
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use crate::app::App;
use crate::host::{NativeWindow, Shell, WindowFactory, WindowHandle};
use crate::managers::navigation_guard::InterceptorTable;
use crate::platform::{self, PlatformPolicy};
use crate::plugins::builtin_registry;
use crate::services::connectivity;
use crate::services::settings_store::{SettingsStore, SettingsStoreTrait};
use crate::services::update_manager::UpdateManager;
use crate::types::errors::{AppError, WindowError};
use crate::types::navigation::{NewWindowRequest, NewWindowRoute, WindowFeatures};
use crate::types::update::{Notice, UpdateInfo};
use crate::types::window::{CloseDecision, WindowId, WindowOptions, WindowPosition, WindowSize};

const ERROR_PAGE_HTML: &str = include_str!("../../resources/error.html");

// WebView2 maps custom protocols onto http://<scheme>.localhost.
#[cfg(target_os = "windows")]
const ERROR_PAGE_URL: &str = "http://tunedeck.localhost/error";
#[cfg(not(target_os = "windows"))]
const ERROR_PAGE_URL: &str = "tunedeck://localhost/error";

const PROBE_TIMEOUT: Duration = Duration::from_secs(15);

/// Reports same-document navigations (history API and hash changes) and the
/// quit shortcut.
const HOST_JS: &str = r#"
(function(){
  if (window.__tunedeckHost) return;
  window.__tunedeckHost = true;
  var last = location.href;
  function report(){
    if (location.href === last) return;
    last = location.href;
    window.ipc.postMessage(JSON.stringify({cmd:'url_changed', url:last}));
  }
  ['pushState','replaceState'].forEach(function(name){
    var orig = history[name];
    history[name] = function(){ var r = orig.apply(this, arguments); report(); return r; };
  });
  window.addEventListener('popstate', report);
  window.addEventListener('hashchange', report);
  window.addEventListener('keydown', function(e){
    if ((e.ctrlKey || e.metaKey) && !e.shiftKey && !e.altKey && (e.key === 'q' || e.key === 'Q')) {
      e.preventDefault();
      window.ipc.postMessage(JSON.stringify({cmd:'quit'}));
    }
  }, true);
})();
"#;

#[derive(Debug)]
pub enum UserEvent {
    PageLoaded(String),
    UrlChanged(String),
    /// Navigation to an intercepted origin was cancelled and awaits replay.
    InterceptedNavigation(String),
    OpenWindow(String),
    LoadFailed(String),
    UpdateAvailable(UpdateInfo),
    QuitRequested,
}

/// Concrete window shared between the core (as a [`WindowHandle`]) and the
/// event loop, which needs the tao window id and script replays.
type CurrentWindow = Rc<RefCell<Option<Rc<WryWindow>>>>;

pub struct WryWindow {
    id: WindowId,
    window: Window,
    webview: WebView,
    scripts: RefCell<Vec<String>>,
    proxy: EventLoopProxy<UserEvent>,
}

impl WryWindow {
    fn tao_id(&self) -> tao::window::WindowId {
        self.window.id()
    }

    fn logical_size(&self, size: tao::dpi::PhysicalSize<u32>) -> WindowSize {
        let logical: LogicalSize<u32> = size.to_logical(self.window.scale_factor());
        WindowSize::new(logical.width, logical.height)
    }

    fn logical_position(&self, position: tao::dpi::PhysicalPosition<i32>) -> WindowPosition {
        let logical: LogicalPosition<i32> = position.to_logical(self.window.scale_factor());
        WindowPosition::new(logical.x, logical.y)
    }

    /// Re-runs every injected script after a full page load.
    fn replay_scripts(&self) {
        for script in self.scripts.borrow().iter() {
            self.evaluate(script);
        }
    }

    fn evaluate(&self, script: &str) {
        if let Err(e) = self.webview.evaluate_script(script) {
            warn!(event = "webview.script_failed", window_id = %self.id, error = %e);
        }
    }

    fn spawn_probe(&self, url: &str) {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return;
        }
        let url = url.to_string();
        let proxy = self.proxy.clone();
        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    warn!(event = "connectivity.runtime_failed", error = %e);
                    return;
                }
            };
            if let Err(e) = runtime.block_on(connectivity::probe(&url, PROBE_TIMEOUT)) {
                debug!(event = "connectivity.probe_failed", url = %url, error = %e);
                let _ = proxy.send_event(UserEvent::LoadFailed(url));
            }
        });
    }
}

impl NativeWindow for WryWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn maximize(&self) {
        self.window.set_maximized(true);
    }

    fn show(&self) {
        self.window.set_visible(true);
        self.window.set_focus();
    }

    fn hide(&self) {
        self.window.set_visible(false);
    }

    fn is_visible(&self) -> bool {
        self.window.is_visible()
    }

    fn load_url(&self, url: &str) {
        if let Err(e) = self.webview.load_url(url) {
            warn!(event = "webview.load_failed", url = %url, error = %e);
            return;
        }
        self.spawn_probe(url);
    }

    fn load_url_with_headers(&self, url: &str, headers: &[(String, String)]) {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    map.insert(name, value);
                }
                _ => warn!(event = "webview.header_skipped", header = %name),
            }
        }
        if let Err(e) = self.webview.load_url_with_headers(url, map) {
            warn!(event = "webview.load_failed", url = %url, error = %e);
        }
    }

    fn load_error_page(&self) {
        if let Err(e) = self.webview.load_url(ERROR_PAGE_URL) {
            error!(event = "webview.error_page_failed", error = %e);
        }
    }

    fn inject_script(&self, script: &str) {
        self.scripts.borrow_mut().push(script.to_string());
        self.evaluate(script);
    }

    fn destroy(&self) {
        self.window.set_visible(false);
    }
}

/// Builds the main window inside the running event loop.
struct WryFactory<'a> {
    target: &'a EventLoopWindowTarget<UserEvent>,
    proxy: EventLoopProxy<UserEvent>,
    current: CurrentWindow,
    interceptors: InterceptorTable,
    pending: Arc<Mutex<HashSet<String>>>,
}

impl WryFactory<'_> {
    fn build_webview(&self, window: &Window) -> Result<WebView, String> {
        let ipc_proxy = self.proxy.clone();
        let load_proxy = self.proxy.clone();
        let nav_proxy = self.proxy.clone();
        let nw_proxy = self.proxy.clone();
        let interceptors = self.interceptors.clone();
        let pending = self.pending.clone();

        let builder = WebViewBuilder::new()
            .with_custom_protocol("tunedeck".into(), move |_wv_id, request| {
                let (status, body) = match request.uri().path() {
                    "/error" | "/" => (200, ERROR_PAGE_HTML),
                    _ => (404, "Not found"),
                };
                wry::http::Response::builder()
                    .status(status)
                    .header("Content-Type", "text/html; charset=utf-8")
                    .body(body.as_bytes().to_vec().into())
                    .unwrap_or_else(|_| wry::http::Response::new(Vec::new().into()))
            })
            .with_initialization_script(HOST_JS)
            .with_ipc_handler(move |msg: wry::http::Request<String>| {
                let Ok(value) = serde_json::from_str::<serde_json::Value>(msg.body()) else {
                    return;
                };
                match value["cmd"].as_str() {
                    Some("url_changed") => {
                        if let Some(url) = value["url"].as_str() {
                            let _ = ipc_proxy.send_event(UserEvent::UrlChanged(url.to_string()));
                        }
                    }
                    Some("quit") => {
                        let _ = ipc_proxy.send_event(UserEvent::QuitRequested);
                    }
                    _ => {}
                }
            })
            .with_on_page_load_handler(move |event, url| {
                if let PageLoadEvent::Finished = event {
                    let _ = load_proxy.send_event(UserEvent::PageLoaded(url));
                }
            })
            .with_navigation_handler(move |url: String| -> bool {
                if interceptors.lookup(&url).is_none() {
                    return true;
                }
                let mut replaying = match pending.lock() {
                    Ok(set) => set,
                    Err(poisoned) => poisoned.into_inner(),
                };
                if replaying.remove(&url) {
                    return true;
                }
                let _ = nav_proxy.send_event(UserEvent::InterceptedNavigation(url));
                false
            })
            .with_new_window_req_handler(move |url, _features| {
                if url.starts_with("http://") || url.starts_with("https://") {
                    let _ = nw_proxy.send_event(UserEvent::OpenWindow(url));
                }
                wry::NewWindowResponse::Deny
            })
            .with_devtools(cfg!(debug_assertions));

        #[cfg(target_os = "linux")]
        {
            use tao::platform::unix::WindowExtUnix;
            use wry::WebViewBuilderExtUnix;
            let vbox = window
                .default_vbox()
                .ok_or_else(|| "window has no GTK container".to_string())?;
            builder.build_gtk(vbox).map_err(|e| e.to_string())
        }

        #[cfg(not(target_os = "linux"))]
        {
            builder.build(window).map_err(|e| e.to_string())
        }
    }
}

impl WindowFactory for WryFactory<'_> {
    fn build(&self, options: &WindowOptions) -> Result<WindowHandle, WindowError> {
        let mut builder = WindowBuilder::new()
            .with_title(&options.title)
            .with_inner_size(LogicalSize::new(
                options.size.width as f64,
                options.size.height as f64,
            ))
            .with_min_inner_size(LogicalSize::new(
                options.min_size.width as f64,
                options.min_size.height as f64,
            ))
            .with_visible(options.visible);
        if let Some(position) = options.position {
            builder = builder.with_position(LogicalPosition::new(position.x as f64, position.y as f64));
        }

        let window = builder
            .build(self.target)
            .map_err(|e| WindowError::CreationFailed(e.to_string()))?;
        let webview = self
            .build_webview(&window)
            .map_err(WindowError::CreationFailed)?;

        let wry_window = Rc::new(WryWindow {
            id: WindowId::new(),
            window,
            webview,
            scripts: RefCell::new(Vec::new()),
            proxy: self.proxy.clone(),
        });
        *self.current.borrow_mut() = Some(wry_window.clone());
        Ok(wry_window as WindowHandle)
    }
}

/// Process-level collaborators. Native menus, tray icons and login items are
/// outside this host; those calls are logged and no tray is reported.
struct WryShell {
    proxy: EventLoopProxy<UserEvent>,
    current: CurrentWindow,
    quit_requested: Rc<Cell<bool>>,
}

impl Shell for WryShell {
    fn set_application_menu(&mut self, window: &WindowHandle) {
        debug!(event = "shell.menu_set", window_id = %window.id());
    }

    fn set_up_tray(&mut self, window: &WindowHandle) {
        debug!(event = "shell.tray_unavailable", window_id = %window.id());
    }

    fn has_tray(&self) -> bool {
        false
    }

    fn set_login_item(&mut self, open_at_login: bool) {
        debug!(event = "shell.login_item", open_at_login = open_at_login);
    }

    fn unregister_all_shortcuts(&mut self) {
        debug!(event = "shell.shortcuts_unregistered");
    }

    fn quit(&mut self) {
        self.quit_requested.set(true);
    }

    fn show_message(&mut self, _parent: Option<&WindowHandle>, notice: &Notice) {
        let text = format!("{}\n\n{}\n\n{}", notice.title, notice.message, notice.detail);
        let Some(window) = self.current.borrow().clone() else {
            info!(event = "shell.notice", title = %notice.title, detail = %notice.detail);
            return;
        };
        match serde_json::to_string(&text) {
            Ok(literal) => window.evaluate(&format!("alert({})", literal)),
            Err(e) => warn!(event = "shell.notice_failed", error = %e),
        }
    }

    fn request_update_check(&mut self) {
        let proxy = self.proxy.clone();
        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    warn!(event = "update.runtime_failed", error = %e);
                    return;
                }
            };
            let manager = UpdateManager::new();
            match runtime.block_on(manager.check_for_updates()) {
                Ok(Some(info)) => {
                    let _ = proxy.send_event(UserEvent::UpdateAvailable(info));
                }
                Ok(None) => debug!(event = "update.up_to_date"),
                Err(e) => warn!(event = "update.check_failed", error = %e),
            }
        });
    }
}

fn is_current(current: &CurrentWindow, id: tao::window::WindowId) -> bool {
    current
        .borrow()
        .as_ref()
        .map(|w| w.tao_id() == id)
        .unwrap_or(false)
}

fn current_window(current: &CurrentWindow) -> Option<Rc<WryWindow>> {
    current.borrow().clone()
}

/// Tears down the main window once the core decided to destroy it.
fn close_main_window(app: &mut App, current: &CurrentWindow) {
    app.on_window_closed();
    // Dropping the last reference closes the tao window.
    if let Some(window) = current.borrow_mut().take() {
        window.destroy();
    }
    app.on_window_all_closed();
}

fn handle_close_requested(app: &mut App, current: &CurrentWindow) {
    match app.on_close_requested() {
        Ok(CloseDecision::Destroy) => close_main_window(app, current),
        Ok(CloseDecision::Hide) => {}
        Err(e) => error!(event = "window.close_failed", error = %e),
    }
}

/// Loads `url` in the main webview, replaying it through the header rewrite
/// when its origin is intercepted.
fn load_in_main_window(
    app: &App,
    window: &WryWindow,
    pending: &Arc<Mutex<HashSet<String>>>,
    url: &str,
) {
    let headers = app.request_headers(url);
    if headers.is_empty() {
        window.load_url(url);
        return;
    }
    match pending.lock() {
        Ok(mut set) => {
            set.insert(url.to_string());
        }
        Err(poisoned) => {
            poisoned.into_inner().insert(url.to_string());
        }
    }
    window.load_url_with_headers(url, &headers);
}

fn handle_user_event(
    app: &mut App,
    current: &CurrentWindow,
    pending: &Arc<Mutex<HashSet<String>>>,
    user_event: UserEvent,
) {
    match user_event {
        UserEvent::PageLoaded(url) => {
            debug!(event = "webview.page_loaded", url = %url);
            if let Some(window) = current_window(current) {
                window.replay_scripts();
            }
            if let Err(e) = app.on_ready_to_show() {
                warn!(event = "window.ready_to_show_failed", error = %e);
            }
        }
        UserEvent::UrlChanged(url) => {
            app.on_navigated_in_page(&url);
        }
        UserEvent::InterceptedNavigation(url) => {
            app.on_will_navigate(&url);
            if let Some(window) = current_window(current) {
                load_in_main_window(app, &window, pending, &url);
            }
        }
        UserEvent::OpenWindow(url) => {
            let request = NewWindowRequest {
                url: url.clone(),
                features: WindowFeatures::default(),
            };
            let Some(features) = app.on_new_window(&request) else {
                return;
            };
            let route = app.route_new_window(&url).unwrap_or(NewWindowRoute::External);
            debug!(
                event = "webview.new_window",
                url = %url,
                affinity = ?features.affinity,
                privilege = ?features.privilege,
                route = ?route
            );
            match route {
                NewWindowRoute::MainWindow => {
                    if let Some(window) = current_window(current) {
                        load_in_main_window(app, &window, pending, &url);
                    }
                }
                NewWindowRoute::External => open_externally(&url),
            }
        }
        UserEvent::LoadFailed(url) => {
            app.on_load_failed(&url);
        }
        UserEvent::UpdateAvailable(info) => app.on_update_available(&info),
        UserEvent::QuitRequested => app.on_quit_requested(),
    }
}

fn open_externally(url: &str) {
    match open::that(url) {
        Ok(()) => info!(event = "webview.opened_externally", url = %url),
        Err(e) => warn!(event = "webview.open_external_failed", url = %url, error = %e),
    }
}

/// A failed window creation leaves the slot empty; the host drops its
/// reference too so the native window closes.
fn discard_orphaned_window(app: &App, current: &CurrentWindow) {
    if app.main_window().is_none() {
        current.borrow_mut().take();
    }
}

/// Runs the application until quit.
pub fn run() -> Result<(), AppError> {
    let mut settings = SettingsStore::new(None);
    if let Err(e) = settings.load() {
        warn!(event = "settings.load_failed", error = %e);
    }

    let event_loop: EventLoop<UserEvent> = EventLoopBuilder::with_user_event().build();
    let proxy = event_loop.create_proxy();
    let current: CurrentWindow = Rc::new(RefCell::new(None));
    let quit_requested = Rc::new(Cell::new(false));
    let pending = Arc::new(Mutex::new(HashSet::new()));
    let interceptors = InterceptorTable::auth_providers();

    let shell = WryShell {
        proxy: proxy.clone(),
        current: current.clone(),
        quit_requested: quit_requested.clone(),
    };
    let mut app = App::new(settings, Box::new(shell), PlatformPolicy::current())?
        .with_plugins(builtin_registry())
        .with_interceptors(interceptors.clone())
        .with_dev_build(platform::is_dev_build());

    event_loop.run(move |event, target, control_flow| {
        *control_flow = ControlFlow::Wait;

        let factory = WryFactory {
            target,
            proxy: proxy.clone(),
            current: current.clone(),
            interceptors: interceptors.clone(),
            pending: pending.clone(),
        };

        match event {
            Event::NewEvents(StartCause::Init) => {
                if let Err(e) = app.on_ready(&factory) {
                    error!(event = "app.ready_failed", error = %e);
                    discard_orphaned_window(&app, &current);
                    *control_flow = ControlFlow::Exit;
                    return;
                }
            }

            Event::Reopen { .. } => {
                if let Err(e) = app.on_activate(&factory) {
                    error!(event = "app.activate_failed", error = %e);
                    discard_orphaned_window(&app, &current);
                }
            }

            Event::LoopDestroyed => {
                if !app.is_force_quit() {
                    app.on_before_quit();
                }
            }

            Event::WindowEvent {
                window_id, event, ..
            } if is_current(&current, window_id) => match event {
                WindowEvent::Moved(position) => {
                    if let Some(window) = current_window(&current) {
                        app.on_window_moved(window.logical_position(position));
                    }
                }
                WindowEvent::Resized(size) => {
                    if let Some(window) = current_window(&current) {
                        let maximized = window.window.is_maximized();
                        app.on_window_resized(window.logical_size(size), maximized);
                    }
                }
                WindowEvent::CloseRequested => handle_close_requested(&mut app, &current),
                _ => {}
            },

            Event::UserEvent(user_event) => {
                handle_user_event(&mut app, &current, &pending, user_event)
            }

            _ => {}
        }

        if quit_requested.get() {
            app.on_before_quit();
            if current.borrow().is_some() {
                handle_close_requested(&mut app, &current);
            }
            info!(event = "app.exit");
            *control_flow = ControlFlow::Exit;
        }
    })
}
