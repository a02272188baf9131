//! Logging setup.
//!
//! Library code only emits `tracing` events; installing a subscriber is left to
//! binaries (or to `Plate::init_logging`).

use tracing_subscriber::EnvFilter;

/// Default directive used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,pancake=debug,pancake_ui=debug";

/// Install a fmt subscriber, honouring `RUST_LOG` and falling back to
/// [`DEFAULT_FILTER`].
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter);
}

/// Install a fmt subscriber with an explicit filter directive such as
/// `"warn,pancake_ui=trace"`.
pub fn init_with_filter(directive: &str) {
    install(EnvFilter::new(directive));
}

fn install(filter: EnvFilter) {
    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
