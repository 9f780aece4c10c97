//! Port Interfaces
//!
//! Defines the interfaces (ports) for external systems following the
//! Hexagonal Architecture pattern. These are the contracts that
//! infrastructure adapters must implement.
//!
//! ## Driven Ports (Outbound)
//!
//! - `RuleStore`: Remote rule-management endpoint
//! - `Notifier`: Chat delivery transport

use async_trait::async_trait;

use crate::domain::notification::Notification;
use crate::domain::record::StreamRecord;
use crate::domain::rules::Rule;

// =============================================================================
// Rule Store
// =============================================================================

/// One rule as reported by the remote store, with its assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRule {
    /// Remote identity, assigned by the store on creation.
    pub id: String,
    /// Server-side filter predicate.
    pub match_expression: String,
    /// Label echoed on matching records.
    pub label: String,
}

/// Errors from the remote rule store.
#[derive(Debug, thiserror::Error)]
pub enum RuleStoreError {
    /// The store answered with a non-success status.
    #[error("rule endpoint returned HTTP {status}: {detail}")]
    Endpoint {
        /// HTTP status code.
        status: u16,
        /// Response body surfaced as error detail.
        detail: String,
    },

    /// The request never completed.
    #[error("rule request failed: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("rule response decode failed: {0}")]
    Decode(String),
}

/// Remote rule-management endpoint.
///
/// The remote rule set is third-party-owned global state; it is only ever
/// accessed through fetch, batched delete, and batched create. No caching,
/// no local diffing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Fetch all currently stored rules.
    async fn fetch(&self) -> Result<Vec<ActiveRule>, RuleStoreError>;

    /// Delete the rules with the given ids in one batched request.
    async fn delete(&self, ids: &[String]) -> Result<(), RuleStoreError>;

    /// Create the given rules in one batched request, returning them with
    /// their assigned ids.
    async fn create(&self, rules: &[Rule]) -> Result<Vec<ActiveRule>, RuleStoreError>;
}

// =============================================================================
// Notifier
// =============================================================================

/// Errors from the delivery transport.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The delivery endpoint answered with a non-success status.
    #[error("delivery endpoint returned HTTP {status}: {detail}")]
    Endpoint {
        /// HTTP status code.
        status: u16,
        /// Response body surfaced as error detail.
        detail: String,
    },

    /// The request never completed.
    #[error("delivery request failed: {0}")]
    Transport(String),
}

/// Chat delivery transport.
///
/// A failed send is logged by the caller and the next record proceeds
/// independently; the relay never retries delivery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one formatted notification.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

// =============================================================================
// Stream Events
// =============================================================================

/// Events emitted by the stream consumer.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// Streaming connection established.
    Connected,
    /// Connection dropped; the consumer will reconnect.
    Disconnected,
    /// Reconnecting after a drop.
    Reconnecting {
        /// Reconnection cycle number within this run.
        attempt: u32,
    },
    /// One decoded stream record, in arrival order.
    Record(StreamRecord),
}
