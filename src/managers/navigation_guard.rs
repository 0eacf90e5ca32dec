//! Navigation Guard for Tunedeck.
//!
//! Watches the main window's content: falls back to the static error page on
//! load failure, persists in-page navigations that stay on the hosted origin,
//! arms per-origin header rewrites for authentication providers and pins
//! opened windows to the main window's affinity group.

use std::collections::HashSet;

use tracing::{debug, info, warn};
use url::{Host, Origin, Url};

use crate::host::WindowHandle;
use crate::services::settings_store::SettingsStore;
use crate::types::errors::NavigationError;
use crate::types::navigation::{
    HeaderRewrite, NewWindowRequest, NewWindowRoute, Privilege, WindowFeatures,
    MAIN_WINDOW_AFFINITY,
};
use crate::types::window::WindowId;

/// Browser identity presented to authentication providers whose client checks
/// reject the embedded webview's default user agent.
pub const AUTH_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:115.0) Gecko/20100101 Firefox/115.0";

/// Parses `url` and returns its tuple origin.
pub fn origin_of(url: &str) -> Result<Origin, NavigationError> {
    let parsed = Url::parse(url).map_err(|e| NavigationError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return Err(NavigationError::OpaqueOrigin(url.to_string()));
    }
    Ok(origin)
}

/// Origin of the hosted web application plus its entry URL.
#[derive(Debug, Clone)]
pub struct HostedOrigin {
    origin: Origin,
    entry_url: String,
}

impl HostedOrigin {
    pub fn parse(entry_url: &str) -> Result<Self, NavigationError> {
        Ok(Self {
            origin: origin_of(entry_url)?,
            entry_url: entry_url.to_string(),
        })
    }

    pub fn entry_url(&self) -> &str {
        &self.entry_url
    }

    /// True when `url` parses and shares the hosted origin exactly
    /// (scheme, host and port).
    pub fn matches(&self, url: &str) -> bool {
        origin_of(url).map(|o| o == self.origin).unwrap_or(false)
    }
}

/// Declarative table of request-header rewrites keyed by destination origin.
#[derive(Debug, Clone, Default)]
pub struct InterceptorTable {
    entries: Vec<(Origin, Vec<HeaderRewrite>)>,
}

impl InterceptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The authentication providers known to reject the default identity.
    pub fn auth_providers() -> Self {
        let google = Origin::Tuple(
            "https".to_string(),
            Host::Domain("accounts.google.com".to_string()),
            443,
        );
        Self {
            entries: vec![(
                google,
                vec![HeaderRewrite {
                    header: "User-Agent".to_string(),
                    value: AUTH_USER_AGENT.to_string(),
                }],
            )],
        }
    }

    /// Adds a rewrite of `header` to `value` for requests to `origin_url`'s origin.
    pub fn with_rewrite(
        mut self,
        origin_url: &str,
        header: &str,
        value: &str,
    ) -> Result<Self, NavigationError> {
        let origin = origin_of(origin_url)?;
        let rewrite = HeaderRewrite {
            header: header.to_string(),
            value: value.to_string(),
        };
        match self.entries.iter_mut().find(|(o, _)| *o == origin) {
            Some((_, rewrites)) => {
                rewrites.retain(|r| !r.header.eq_ignore_ascii_case(header));
                rewrites.push(rewrite);
            }
            None => self.entries.push((origin, vec![rewrite])),
        }
        Ok(self)
    }

    /// Rewrites registered for `url`'s origin, if any.
    pub fn lookup(&self, url: &str) -> Option<&[HeaderRewrite]> {
        let origin = origin_of(url).ok()?;
        self.entries
            .iter()
            .find(|(o, _)| *o == origin)
            .map(|(_, rewrites)| rewrites.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-window navigation state. Created when a window is built and dropped
/// with it.
#[derive(Debug)]
pub struct NavigationGuard {
    window_id: WindowId,
    hosted: HostedOrigin,
    interceptors: InterceptorTable,
    armed: HashSet<String>,
    showing_error_page: bool,
}

impl NavigationGuard {
    /// Attaches a guard to `window`'s content.
    pub fn attach(window: &WindowHandle, hosted: HostedOrigin, interceptors: InterceptorTable) -> Self {
        debug!(
            event = "navigation.guard_attached",
            window_id = %window.id(),
            interceptors = interceptors.len()
        );
        Self {
            window_id: window.id(),
            hosted,
            interceptors,
            armed: HashSet::new(),
            showing_error_page: false,
        }
    }

    /// Load failure: shows the static error page once. The failed URL is
    /// never retried, and a failure while the error page is up is ignored.
    ///
    /// Returns true if the error page was loaded.
    pub fn on_load_failed(&mut self, window: &WindowHandle, failed_url: &str) -> bool {
        if self.showing_error_page {
            debug!(
                event = "navigation.load_failure_ignored",
                window_id = %self.window_id,
                url = failed_url
            );
            return false;
        }
        warn!(
            event = "navigation.load_failed",
            window_id = %self.window_id,
            url = failed_url,
            message = "Falling back to the static error page"
        );
        window.load_error_page();
        self.showing_error_page = true;
        true
    }

    /// In-page navigation: persists `url` when it stays on the hosted origin.
    ///
    /// Returns true if the URL was persisted.
    pub fn on_navigated_in_page(&mut self, url: &str, settings: &mut SettingsStore) -> bool {
        if !self.hosted.matches(url) {
            debug!(event = "navigation.foreign_url_ignored", url = url);
            return false;
        }
        self.showing_error_page = false;
        if let Err(e) = settings.set_url(url) {
            warn!(event = "navigation.persist_failed", url = url, error = %e);
            return false;
        }
        true
    }

    /// Outgoing navigation: arms the header rewrite for the target's origin
    /// when one is registered. Returns true if the target is intercepted.
    pub fn on_will_navigate(&mut self, url: &str) -> bool {
        if self.interceptors.lookup(url).is_none() {
            return false;
        }
        let Ok(origin) = origin_of(url) else {
            return false;
        };
        if self.armed.insert(origin.ascii_serialization()) {
            info!(
                event = "navigation.rewrite_armed",
                window_id = %self.window_id,
                origin = %origin.ascii_serialization()
            );
        }
        true
    }

    /// Header overrides for a request to `url`. Empty unless `url`'s origin
    /// has been armed by a navigation to it.
    pub fn request_headers(&self, url: &str) -> Vec<(String, String)> {
        if !self.is_armed(url) {
            return Vec::new();
        }
        self.interceptors
            .lookup(url)
            .map(|rewrites| {
                rewrites
                    .iter()
                    .map(|r| (r.header.clone(), r.value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_armed(&self, url: &str) -> bool {
        origin_of(url)
            .map(|o| self.armed.contains(&o.ascii_serialization()))
            .unwrap_or(false)
    }

    /// New-window request: joins the main window's affinity group and keeps a
    /// caller-specified privilege, defaulting to reduced privilege otherwise.
    pub fn on_new_window(&mut self, request: &NewWindowRequest) -> WindowFeatures {
        self.on_will_navigate(&request.url);
        let features = WindowFeatures {
            affinity: Some(MAIN_WINDOW_AFFINITY.to_string()),
            privilege: request.features.privilege.or(Some(Privilege::Reduced)),
        };
        debug!(
            event = "navigation.new_window",
            window_id = %self.window_id,
            url = %request.url,
            privilege = ?features.privilege
        );
        features
    }

    /// Popups to the hosted origin or an intercepted origin stay in the main
    /// window; anything else leaves the app.
    pub fn route_new_window(&self, url: &str) -> NewWindowRoute {
        if self.hosted.matches(url) || self.interceptors.lookup(url).is_some() {
            NewWindowRoute::MainWindow
        } else {
            NewWindowRoute::External
        }
    }

    pub fn is_showing_error_page(&self) -> bool {
        self.showing_error_page
    }
}
