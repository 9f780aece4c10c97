//! Logging Setup
//!
//! Initializes the `tracing` subscriber that writes human-readable progress
//! and diagnostic lines to standard output. The filter honors `RUST_LOG`
//! and defaults to `info` for the relay itself.

use tracing_subscriber::EnvFilter;

/// Default filter directive when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVES: &str = "cashtag_relay=info,info";

/// Initialize stdout logging.
///
/// Call once at startup before any other work.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
