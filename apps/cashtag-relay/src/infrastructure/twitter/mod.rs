//! Twitter API v2 Adapters
//!
//! Clients for the filtered-stream API:
//!
//! - `rules`: Rule-management client (fetch, batched delete, batched create)
//! - `stream`: Long-lived streaming consumer with reconnect handling
//! - `messages`: Wire types for both endpoints
//! - `backoff`: Fixed-delay retry pacing

pub mod backoff;
pub mod messages;
pub mod rules;
pub mod stream;

pub use backoff::RetryConfig;
pub use rules::RuleClient;
pub use stream::{StreamConsumer, StreamConsumerConfig, StreamError};
