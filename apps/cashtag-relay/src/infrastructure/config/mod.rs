//! Relay Configuration
//!
//! Configuration types loaded from environment variables.

mod settings;

pub use settings::{
    ConfigError, Credentials, RelayConfig, StreamSettings, DEFAULT_TRACKED_AUTHORS,
};
