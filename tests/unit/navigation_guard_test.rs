//! Unit tests for the NavigationGuard: single error-page fallback, origin
//! scoped URL persistence, header-rewrite arming and new-window features.

use tunedeck::host::recording::{RecordingFactory, WindowCall};
use tunedeck::host::{WindowFactory, WindowHandle};
use tunedeck::managers::navigation_guard::{
    HostedOrigin, InterceptorTable, NavigationGuard, AUTH_USER_AGENT,
};
use tunedeck::services::settings_store::SettingsStore;
use tunedeck::types::errors::NavigationError;
use tunedeck::types::navigation::{
    NewWindowRequest, NewWindowRoute, Privilege, WindowFeatures, MAIN_WINDOW_AFFINITY,
};
use tunedeck::types::settings::{AppSettings, DEFAULT_URL};
use tunedeck::types::window::{WindowOptions, WindowSize};

const SIGN_IN: &str = "https://accounts.google.com/ServiceLogin?continue=music";

fn window(factory: &RecordingFactory) -> WindowHandle {
    let options = WindowOptions {
        title: "Tunedeck".to_string(),
        size: WindowSize::default(),
        position: None,
        min_size: WindowSize::new(325, 425),
        visible: false,
    };
    factory.build(&options).unwrap()
}

fn guard(handle: &WindowHandle) -> NavigationGuard {
    NavigationGuard::attach(
        handle,
        HostedOrigin::parse(DEFAULT_URL).unwrap(),
        InterceptorTable::auth_providers(),
    )
}

#[test]
fn test_load_failure_shows_error_page_without_retry() {
    let factory = RecordingFactory::new();
    let handle = window(&factory);
    let mut guard = guard(&handle);

    assert!(guard.on_load_failed(&handle, DEFAULT_URL));

    let native = factory.last_window().unwrap();
    assert_eq!(native.count(&WindowCall::LoadErrorPage), 1);
    assert!(native.loaded_urls().is_empty());
    assert!(guard.is_showing_error_page());
}

#[test]
fn test_failure_while_error_page_is_up_is_ignored() {
    let factory = RecordingFactory::new();
    let handle = window(&factory);
    let mut guard = guard(&handle);

    guard.on_load_failed(&handle, DEFAULT_URL);
    assert!(!guard.on_load_failed(&handle, "tunedeck://localhost/error"));

    assert_eq!(
        factory.last_window().unwrap().count(&WindowCall::LoadErrorPage),
        1
    );
}

#[test]
fn test_hosted_navigation_clears_error_state() {
    let factory = RecordingFactory::new();
    let handle = window(&factory);
    let mut guard = guard(&handle);
    let mut settings = SettingsStore::in_memory(AppSettings::default());

    guard.on_load_failed(&handle, DEFAULT_URL);
    guard.on_navigated_in_page("https://music.youtube.com/explore", &mut settings);

    assert!(!guard.is_showing_error_page());
    assert!(guard.on_load_failed(&handle, "https://music.youtube.com/explore"));
}

#[test]
fn test_in_page_navigation_persisted_only_on_hosted_origin() {
    let factory = RecordingFactory::new();
    let handle = window(&factory);
    let mut guard = guard(&handle);
    let mut settings = SettingsStore::in_memory(AppSettings::default());

    assert!(guard.on_navigated_in_page("https://music.youtube.com/library", &mut settings));
    assert!(!guard.on_navigated_in_page("https://www.youtube.com/watch?v=x", &mut settings));
    assert!(!guard.on_navigated_in_page("http://music.youtube.com/home", &mut settings));
    assert!(!guard.on_navigated_in_page("https://music.youtube.com:8443/", &mut settings));
    assert!(!guard.on_navigated_in_page("not a url", &mut settings));

    assert_eq!(settings.url(), "https://music.youtube.com/library");
}

#[test]
fn test_rewrite_applies_only_after_navigation_arms_it() {
    let factory = RecordingFactory::new();
    let handle = window(&factory);
    let mut guard = guard(&handle);

    assert!(guard.request_headers(SIGN_IN).is_empty());

    assert!(guard.on_will_navigate(SIGN_IN));

    assert_eq!(
        guard.request_headers("https://accounts.google.com/signin/v2"),
        vec![("User-Agent".to_string(), AUTH_USER_AGENT.to_string())]
    );
    assert!(guard.request_headers(DEFAULT_URL).is_empty());
}

#[test]
fn test_navigation_to_unregistered_origin_arms_nothing() {
    let factory = RecordingFactory::new();
    let handle = window(&factory);
    let mut guard = guard(&handle);

    assert!(!guard.on_will_navigate("https://www.google.com/search?q=x"));
    assert!(!guard.is_armed("https://www.google.com/"));
    assert!(!guard.is_armed(SIGN_IN));
}

#[test]
fn test_arming_is_per_window() {
    let factory = RecordingFactory::new();
    let first = window(&factory);
    let second = window(&factory);
    let mut first_guard = guard(&first);
    let second_guard = guard(&second);

    first_guard.on_will_navigate(SIGN_IN);

    assert!(first_guard.is_armed(SIGN_IN));
    assert!(!second_guard.is_armed(SIGN_IN));
}

#[test]
fn test_new_window_joins_main_affinity_with_reduced_privilege() {
    let factory = RecordingFactory::new();
    let handle = window(&factory);
    let mut guard = guard(&handle);

    let features = guard.on_new_window(&NewWindowRequest {
        url: "https://music.youtube.com/watch?v=abc".to_string(),
        features: WindowFeatures::default(),
    });

    assert_eq!(features.affinity.as_deref(), Some(MAIN_WINDOW_AFFINITY));
    assert_eq!(features.privilege, Some(Privilege::Reduced));
}

#[test]
fn test_new_window_keeps_requested_privilege_and_arms_rewrite() {
    let factory = RecordingFactory::new();
    let handle = window(&factory);
    let mut guard = guard(&handle);

    let features = guard.on_new_window(&NewWindowRequest {
        url: SIGN_IN.to_string(),
        features: WindowFeatures {
            affinity: Some("popup".to_string()),
            privilege: Some(Privilege::Full),
        },
    });

    assert_eq!(features.affinity.as_deref(), Some(MAIN_WINDOW_AFFINITY));
    assert_eq!(features.privilege, Some(Privilege::Full));
    assert!(guard.is_armed(SIGN_IN));
}

#[test]
fn test_interceptor_table_replaces_same_header() {
    let table = InterceptorTable::new()
        .with_rewrite("https://login.example.com", "User-Agent", "one")
        .unwrap()
        .with_rewrite("https://login.example.com/path", "user-agent", "two")
        .unwrap();

    let rewrites = table.lookup("https://login.example.com/other").unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(rewrites.len(), 1);
    assert_eq!(rewrites[0].value, "two");
}

#[test]
fn test_interceptor_table_rejects_opaque_origins() {
    let result = InterceptorTable::new().with_rewrite("data:text/plain,hi", "User-Agent", "x");
    assert!(matches!(result, Err(NavigationError::OpaqueOrigin(_))));

    let result = InterceptorTable::new().with_rewrite("::", "User-Agent", "x");
    assert!(matches!(result, Err(NavigationError::InvalidUrl { .. })));
}

#[test]
fn test_external_popups_leave_the_main_window_alone() {
    let factory = RecordingFactory::new();
    let handle = window(&factory);
    let guard = guard(&handle);

    assert_eq!(
        guard.route_new_window("https://music.youtube.com/channel/x"),
        NewWindowRoute::MainWindow
    );
    assert_eq!(guard.route_new_window(SIGN_IN), NewWindowRoute::MainWindow);
    assert_eq!(
        guard.route_new_window("https://www.youtube.com/watch?v=abc"),
        NewWindowRoute::External
    );
    assert_eq!(
        guard.route_new_window("https://bandcamp.com/"),
        NewWindowRoute::External
    );
}
