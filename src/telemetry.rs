use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset. The driver's own debug output
/// is kept out of the default stream.
const DEFAULT_FILTER: &str = "info,mongodb=warn";

/// Initialise structured logging.
/// Emits one JSON object per line on stdout. `log` records from actix-web
/// and the access log middleware are bridged into the same subscriber.
pub fn init_telemetry() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let formatting_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .json()
        .with_current_span(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(formatting_layer)
        .init();
}
