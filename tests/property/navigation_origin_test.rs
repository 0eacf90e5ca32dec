//! Property-based tests for origin scoping in the navigation guard.
//!
//! Only URLs sharing the hosted scheme, host and port are persisted, and
//! header rewrites never leak to origins other than the armed one.

use proptest::prelude::*;
use tunedeck::host::recording::RecordingFactory;
use tunedeck::host::{WindowFactory, WindowHandle};
use tunedeck::managers::navigation_guard::{HostedOrigin, InterceptorTable, NavigationGuard};
use tunedeck::services::settings_store::SettingsStore;
use tunedeck::types::settings::{AppSettings, DEFAULT_URL};
use tunedeck::types::window::{WindowOptions, WindowSize};

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

fn arb_path() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z0-9]{1,8}", 0..4).prop_map(|parts| format!("/{}", parts.join("/")))
}

fn arb_host() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("music.youtube.com".to_string()),
        Just("www.youtube.com".to_string()),
        Just("accounts.google.com".to_string()),
        "[a-z]{3,10}\\.example\\.com",
    ]
}

proptest! {
    /// Any path on the hosted origin is persisted verbatim.
    #[test]
    fn hosted_paths_are_persisted(path in arb_path(), query in "[a-z]{0,6}") {
        let factory = RecordingFactory::new();
        let handle = window(&factory);
        let mut guard = NavigationGuard::attach(
            &handle,
            HostedOrigin::parse(DEFAULT_URL).unwrap(),
            InterceptorTable::new(),
        );
        let mut settings = SettingsStore::in_memory(AppSettings::default());
        let url = if query.is_empty() {
            format!("https://music.youtube.com{}", path)
        } else {
            format!("https://music.youtube.com{}?q={}", path, query)
        };

        prop_assert!(guard.on_navigated_in_page(&url, &mut settings));
        prop_assert_eq!(settings.url(), url.as_str());
    }

    /// A URL is persisted iff its scheme, host and port all match.
    #[test]
    fn persistence_requires_exact_origin(
        https in any::<bool>(),
        host in arb_host(),
        port in prop::option::of(1u16..10000),
        path in arb_path(),
    ) {
        let factory = RecordingFactory::new();
        let handle = window(&factory);
        let mut guard = NavigationGuard::attach(
            &handle,
            HostedOrigin::parse(DEFAULT_URL).unwrap(),
            InterceptorTable::new(),
        );
        let mut settings = SettingsStore::in_memory(AppSettings::default());
        let scheme = if https { "https" } else { "http" };
        let authority = match port {
            Some(p) => format!("{}:{}", host, p),
            None => host.clone(),
        };
        let url = format!("{}://{}{}", scheme, authority, path);

        let effective_port = port.unwrap_or(if https { 443 } else { 80 });
        let same_origin = https && host == "music.youtube.com" && effective_port == 443;

        prop_assert_eq!(guard.on_navigated_in_page(&url, &mut settings), same_origin);
        if !same_origin {
            prop_assert_eq!(settings.url(), DEFAULT_URL);
        }
    }

    /// Arming one origin never produces headers for another.
    #[test]
    fn rewrites_stay_on_armed_origin(host in arb_host(), path in arb_path()) {
        let factory = RecordingFactory::new();
        let handle = window(&factory);
        let mut guard = NavigationGuard::attach(
            &handle,
            HostedOrigin::parse(DEFAULT_URL).unwrap(),
            InterceptorTable::auth_providers(),
        );
        guard.on_will_navigate("https://accounts.google.com/ServiceLogin");

        let url = format!("https://{}{}", host, path);
        let headers = guard.request_headers(&url);

        prop_assert_eq!(!headers.is_empty(), host == "accounts.google.com");
    }
}
