//! Logging and tracing utilities

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_directive`. Output goes to stderr so that
/// anything printed to stdout stays machine-readable. Calling this twice is
/// harmless; the second call is ignored.
pub fn init_tracing(default_directive: &str) {
    let _ = tracing_subscriber::registry()
        .with(build_filter(default_directive))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

fn build_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}
