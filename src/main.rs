//! Tunedeck: a desktop shell for a music streaming web app.
//!
//! Entry point: hosts the app in a native `tao` + `wry` window.
//! When built without the `gui` feature, walks the lifecycle headlessly
//! against the recording host.

#[cfg(feature = "gui")]
fn main() {
    tunedeck::logging::init_logging();
    if let Err(e) = tunedeck::ui::webview_app::run() {
        eprintln!("tunedeck: {}", e);
        tracing::error!(event = "app.run_failed", error = %e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "gui"))]
fn main() {
    tunedeck::logging::init_logging();

    println!();
    println!("Tunedeck v{} (headless)", env!("CARGO_PKG_VERSION"));
    println!();

    if let Err(e) = headless_walkthrough() {
        eprintln!("tunedeck: {}", e);
        tracing::error!(event = "app.run_failed", error = %e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "gui"))]
fn headless_walkthrough() -> Result<(), tunedeck::types::errors::AppError> {
    use tunedeck::app::App;
    use tunedeck::host::recording::{RecordingFactory, RecordingShell};
    use tunedeck::platform::PlatformPolicy;
    use tunedeck::plugins::builtin_registry;
    use tunedeck::services::settings_store::SettingsStore;
    use tunedeck::types::settings::AppSettings;
    use tunedeck::types::window::{WindowPosition, WindowSize};

    let factory = RecordingFactory::new();
    let shell = RecordingShell::new();
    let settings = SettingsStore::in_memory(AppSettings::default());

    let mut app = App::new(settings, Box::new(shell.clone()), PlatformPolicy::current())?
        .with_plugins(builtin_registry())
        .with_dev_build(true);

    app.on_ready(&factory)?;
    app.on_ready_to_show()?;
    println!("  ready:        window built and shown");

    app.on_window_moved(WindowPosition::new(40, 40));
    app.on_window_resized(WindowSize::new(1280, 720), false);
    app.on_window_resized(WindowSize::new(1920, 1080), true);
    let state = app.settings().window_state();
    println!(
        "  geometry:     {}x{} at {:?}, maximized={}",
        state.size.width, state.size.height, state.position, state.maximized
    );

    app.on_navigated_in_page("https://music.youtube.com/library");
    app.on_navigated_in_page("https://example.com/elsewhere");
    println!("  persisted url: {}", app.settings().url());

    app.on_before_quit();
    let decision = app.on_close_requested()?;
    app.on_window_closed();
    app.on_window_all_closed();
    println!("  quit:         close {:?}, shell calls {}", decision, shell.calls().len());
    println!();
    Ok(())
}
