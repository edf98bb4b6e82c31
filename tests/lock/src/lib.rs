//! Shared support for the lock tests and fixture binaries.
//!
//! Anything both a binary and an in-process test depend on lives here, so
//! the cross-process checks and the in-process expectations cannot drift.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod scenario;
pub mod workspace;

/// Install the stderr log subscriber used by every fixture binary.
///
/// Filtered by `RUST_LOG`, defaulting to `warn` so stdout-only consumers see
/// nothing unless asked. Stdout stays reserved for machine-readable output.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    // A second call (tests sharing a process) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
