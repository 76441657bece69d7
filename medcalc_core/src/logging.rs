//! Tracing setup for the medcalc binary and tests.
//!
//! Logs go to stderr so stdout stays clean for results and JSON.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log at `default_level` unless `RUST_LOG` is set. The CLI passes `warn`,
/// or `debug` with `--verbose`.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Debug-level logs captured by the test harness
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
