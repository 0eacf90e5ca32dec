use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Set to any value to emit JSON log lines instead of human-readable ones.
pub const LOG_JSON_ENV_VAR: &str = "TUNEDECK_LOG_JSON";

/// Initialize logging to stderr.
///
/// `RUST_LOG` overrides the default `tunedeck=info` directive. Calling this
/// more than once is harmless; later calls are ignored.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tunedeck=info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = if std::env::var_os(LOG_JSON_ENV_VAR).is_some() {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!(event = "logging.already_initialized", error = %e);
    }
}
