//! Logging configuration for olist-ask.
//!
//! Diagnostics go to stderr through `tracing`; the question/answer report is
//! written separately by [`crate::report`].

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set.
///
/// Kept at `warn` so the console report is not interleaved with info lines.
pub const DEFAULT_FILTER: &str = "warn";

/// Builds the filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initializes logging to stderr.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}
