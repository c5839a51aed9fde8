//! Logging setup
//!
//! Logs always go to stderr; the predictor's stdout carries only its result.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Setup logging with the specified level.
///
/// `RUST_LOG` takes precedence when set. Repeated calls are ignored.
pub fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .with(filter)
        .try_init()
        .ok();
}
