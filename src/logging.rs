//! Optional tracing bootstrap for embedders without their own subscriber.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing output to stderr.
///
/// Logging is disabled by default. Set the `TAILVIEW_LOG` env var to an
/// `EnvFilter` directive (e.g. `tailview=debug`) to enable it. Does nothing
/// when the var is unset or when a global subscriber is already installed,
/// so hosts that configure their own tracing are unaffected.
pub fn init() {
    let Ok(directive) = std::env::var("TAILVIEW_LOG") else {
        return;
    };

    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
