//! Infrastructure layer - Adapters and external integrations.
//!
//! - `config`: Environment-driven configuration
//! - `telemetry`: Logging setup
//! - `twitter`: Rule-management client and filtered-stream consumer
//! - `telegram`: Chat delivery adapter

pub mod config;
pub mod telegram;
pub mod telemetry;
pub mod twitter;
