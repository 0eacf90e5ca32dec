use tunedeck::types::errors::*;

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::IoError("disk full".to_string()).to_string(),
        "Settings I/O error: disk full"
    );
    assert_eq!(
        SettingsError::SerializationError("bad json".to_string()).to_string(),
        "Settings serialization error: bad json"
    );
    assert_eq!(
        SettingsError::InvalidKey("options.nope".to_string()).to_string(),
        "Invalid settings key: options.nope"
    );
    assert_eq!(
        SettingsError::InvalidValue("0x0".to_string()).to_string(),
        "Invalid settings value: 0x0"
    );
}

// === WindowError Tests ===

#[test]
fn window_error_display_variants() {
    assert_eq!(
        WindowError::CreationFailed("no display".to_string()).to_string(),
        "Window creation failed: no display"
    );
    assert_eq!(
        WindowError::AlreadyExists("w-1".to_string()).to_string(),
        "Main window already exists: w-1"
    );
    assert_eq!(
        WindowError::InvalidTransition("destroyed".to_string()).to_string(),
        "Invalid window transition: destroyed"
    );
}

// === PluginError Tests ===

#[test]
fn plugin_error_display() {
    let err = PluginError::AttachFailed {
        id: "navigation".to_string(),
        reason: "script rejected".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Plugin 'navigation' failed to attach: script rejected"
    );
}

// === NavigationError Tests ===

#[test]
fn navigation_error_display_variants() {
    let err = NavigationError::InvalidUrl {
        url: "::".to_string(),
        reason: "relative URL without a base".to_string(),
    };
    assert_eq!(err.to_string(), "Invalid URL '::': relative URL without a base");
    assert_eq!(
        NavigationError::OpaqueOrigin("data:,x".to_string()).to_string(),
        "URL has no origin: data:,x"
    );
    let err = NavigationError::Unreachable {
        url: "https://music.youtube.com".to_string(),
        reason: "connection refused".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Unreachable URL 'https://music.youtube.com': connection refused"
    );
}

// === UpdateError Tests ===

#[test]
fn update_error_display_variants() {
    assert_eq!(
        UpdateError::NetworkError("timeout".to_string()).to_string(),
        "Update network error: timeout"
    );
    assert_eq!(
        UpdateError::ParseError("missing tag_name".to_string()).to_string(),
        "Update parse error: missing tag_name"
    );
}

// === AppError Tests ===

#[test]
fn app_error_is_transparent_over_sources() {
    let err: AppError = WindowError::CreationFailed("no display".to_string()).into();
    assert_eq!(err.to_string(), "Window creation failed: no display");

    let err: AppError = SettingsError::InvalidKey("k".to_string()).into();
    assert!(matches!(err, AppError::Settings(SettingsError::InvalidKey(_))));
}

#[test]
fn all_errors_implement_error_trait() {
    let errors: Vec<Box<dyn std::error::Error>> = vec![
        Box::new(SettingsError::IoError("x".to_string())),
        Box::new(WindowError::CreationFailed("x".to_string())),
        Box::new(PluginError::AttachFailed {
            id: "x".to_string(),
            reason: "y".to_string(),
        }),
        Box::new(NavigationError::OpaqueOrigin("x".to_string())),
        Box::new(UpdateError::ParseError("x".to_string())),
    ];
    for err in &errors {
        assert!(err.source().is_none());
        assert!(!err.to_string().is_empty());
    }
}
