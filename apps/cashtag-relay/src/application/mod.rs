//! Application layer - Use cases and port definitions.
//!
//! - `ports`: Interfaces for the remote rule store and the notifier
//! - `sync`: Rule synchronization by full replacement
//! - `transform`: Pure record-to-notification pipeline
//! - `services`: Relay orchestration between the consumer and the notifier

pub mod ports;
pub mod services;
pub mod sync;
pub mod transform;
