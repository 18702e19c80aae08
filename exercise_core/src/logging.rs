//! Tracing setup shared by `extrack` and `extrack-server`.
//!
//! Events are written to stderr. `extrack` prints its results as JSON on
//! stdout and that stream must not carry log lines.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the subscriber at INFO unless `RUST_LOG` says otherwise
pub fn init() {
    init_with_level("info")
}

/// Install the subscriber with `default_level` as the fallback filter
///
/// `RUST_LOG` takes precedence, so `RUST_LOG=exercise_core=debug` shows
/// store and query activity without touching the binaries' flags.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Route debug events into the test harness output
///
/// Safe to call from every test; only the first call installs anything.
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_init_test_is_idempotent() {
        super::init_test();
        super::init_test();
        tracing::debug!(store = "memory", "subscriber installed once");
    }
}
