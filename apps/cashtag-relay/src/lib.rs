#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Cashtag Relay - Stream-to-Chat Notifier
//!
//! Subscribes to a filtered stream of posts from a fixed set of tracked
//! authors, extracts cashtag mentions from each post, and forwards a
//! formatted notification to a Telegram chat.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Core relay types
//!   - `rules`: Declarative filter rules and the desired rule set
//!   - `record`: Decoded stream records
//!   - `notification`: Outbound notification payloads
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: Interfaces for the rule store and the notifier
//!   - `sync`: Rule synchronization by full replacement
//!   - `transform`: Pure record-to-notification pipeline
//!   - `services`: Relay orchestration between consumer and notifier
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `twitter`: Rule-management client and filtered-stream consumer
//!   - `telegram`: Chat delivery adapter
//!   - `config`: Environment-driven configuration
//!   - `telemetry`: Logging setup
//!
//! # Data Flow
//!
//! ```text
//! rule sync ──► filtered stream ──► transformer ──► notifier ──► chat
//!      ▲                                                 │
//!      └──────────── restart after terminal failure ◄────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Core relay types with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::notification::{ChatTarget, Notification, RenderMode};
pub use domain::record::StreamRecord;
pub use domain::rules::{DesiredRuleSet, Rule};

// Application
pub use application::ports::{
    ActiveRule, Notifier, NotifyError, RuleStore, RuleStoreError, StreamEvent,
};
pub use application::services::RelayService;
pub use application::sync::RuleSynchronizer;
pub use application::transform::Transformer;

// Infrastructure
pub use infrastructure::config::{ConfigError, Credentials, RelayConfig, StreamSettings};
pub use infrastructure::telegram::TelegramNotifier;
pub use infrastructure::telemetry;
pub use infrastructure::twitter::{
    RetryConfig, RuleClient, StreamConsumer, StreamConsumerConfig, StreamError,
};
