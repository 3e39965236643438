use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Console logging on stderr so stdout stays clean for the step output.
/// `RUST_LOG` overrides the default `sales_analytics=warn`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sales_analytics=warn"));

    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    // First subscriber wins.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
