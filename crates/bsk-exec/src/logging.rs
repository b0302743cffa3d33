//! Opt-in logging setup.
//!
//! The library only emits `tracing` events; nothing is printed unless the
//! hosting build script installs a subscriber. `init` wires up the usual
//! one: human-readable output on stderr, filtered by `BSK_LOG` (falling
//! back to `RUST_LOG`, then to `warn`). stdout stays free for the build
//! script's own output.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const ENV_FILTER_VAR: &str = "BSK_LOG";

/// Install the default subscriber. Safe to call more than once; later
/// calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_env(ENV_FILTER_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
