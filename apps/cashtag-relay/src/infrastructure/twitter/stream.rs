//! Filtered Stream Consumer
//!
//! Maintains the long-lived streaming HTTP connection and decodes its
//! newline-delimited JSON records. The consumer is a small state machine:
//!
//! - **Connecting**: open the streaming request. HTTP 429 backs off with a
//!   fixed delay for a bounded number of attempts; any other non-success
//!   status is fatal and propagated to the caller.
//! - **Streaming**: read lines, skip blank keep-alives, decode each
//!   non-blank line and emit it in arrival order.
//! - Any decode error or connection drop returns to Connecting after a
//!   fixed cool-down, forever. Drops are the normal failure mode of an
//!   indefinite streaming connection, never a fatal error.
//! - **Failed**: terminal for one `run` invocation; the supervisor decides
//!   whether to re-synchronize rules and run again.

use futures_util::TryStreamExt;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;

use super::backoff::{RetryConfig, RetryPolicy};
use super::messages::StreamLine;
use crate::application::ports::StreamEvent;

use std::time::Duration;

/// Path of the streaming endpoint under the API base.
const STREAM_PATH: &str = "/2/tweets/search/stream";

// =============================================================================
// Error Type
// =============================================================================

/// Errors that can occur in the stream consumer.
///
/// Only the variants surfaced from [`StreamConsumer::run`] are terminal;
/// read-side failures are handled internally by reconnecting.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The endpoint answered with a non-retryable status.
    #[error("stream endpoint returned HTTP {status}: {detail}")]
    Endpoint {
        /// HTTP status code.
        status: u16,
        /// Response body surfaced as error detail.
        detail: String,
    },

    /// Rate limiting persisted through the whole attempt budget.
    #[error("rate limited: gave up after {attempts} connection attempts")]
    RateLimitExhausted {
        /// Connection attempts made.
        attempts: u32,
    },

    /// The connection request never completed.
    #[error("stream request failed: {0}")]
    Transport(String),

    /// The connection dropped while streaming.
    #[error("stream closed: {0}")]
    Disconnected(String),

    /// A line failed to decode as a stream record.
    #[error("record decode failed: {0}")]
    Decode(String),

    /// The event channel closed while the consumer was still running.
    #[error("event channel closed")]
    ChannelClosed,
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the stream consumer.
#[derive(Debug, Clone)]
pub struct StreamConsumerConfig {
    /// Streaming endpoint URL.
    pub url: String,
    /// Bearer token for the streaming endpoint.
    pub bearer_token: String,
    /// Cool-down before reconnecting after a drop.
    pub cooldown: Duration,
    /// Pacing for rate-limited connection attempts.
    pub retry: RetryConfig,
}

impl StreamConsumerConfig {
    /// Create a configuration against `base_url`.
    #[must_use]
    pub fn new(base_url: &str, bearer_token: String) -> Self {
        Self {
            url: format!("{base_url}{STREAM_PATH}"),
            bearer_token,
            cooldown: Duration::from_secs(10),
            retry: RetryConfig::default(),
        }
    }
}

// =============================================================================
// Stream Consumer
// =============================================================================

/// Long-lived filtered-stream consumer.
///
/// Emits [`StreamEvent`]s over a bounded channel; the single receiver drains
/// them sequentially, which preserves stream order end to end.
pub struct StreamConsumer {
    config: StreamConsumerConfig,
    http: reqwest::Client,
    events: mpsc::Sender<StreamEvent>,
    cancel: CancellationToken,
}

impl StreamConsumer {
    /// Create a new consumer.
    #[must_use]
    pub const fn new(
        config: StreamConsumerConfig,
        http: reqwest::Client,
        events: mpsc::Sender<StreamEvent>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            http,
            events,
            cancel,
        }
    }

    /// Run the consumer until cancelled or a terminal error occurs.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Endpoint`], [`StreamError::Transport`], or
    /// [`StreamError::RateLimitExhausted`] from the connection phase, or
    /// [`StreamError::ChannelClosed`] if the receiver went away.
    pub async fn run(&self) -> Result<(), StreamError> {
        let mut reconnects: u32 = 0;

        loop {
            if self.cancel.is_cancelled() {
                tracing::info!("stream consumer cancelled");
                return Ok(());
            }

            let Some(response) = self.connect().await? else {
                // Cancelled while backing off.
                return Ok(());
            };

            tracing::info!("stream started");
            let _ = self.events.send(StreamEvent::Connected).await;

            match self.read_lines(response).await {
                Ok(()) => return Ok(()),
                Err(e @ StreamError::ChannelClosed) => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        cooldown_secs = self.config.cooldown.as_secs(),
                        "stream dropped; will reconnect"
                    );
                    let _ = self.events.send(StreamEvent::Disconnected).await;

                    if !self.sleep_or_cancel(self.config.cooldown).await {
                        return Ok(());
                    }

                    reconnects += 1;
                    let _ = self
                        .events
                        .send(StreamEvent::Reconnecting {
                            attempt: reconnects,
                        })
                        .await;
                }
            }
        }
    }

    /// Open the streaming request, pacing rate-limited attempts.
    ///
    /// Returns `Ok(None)` when cancelled during a backoff delay.
    async fn connect(&self) -> Result<Option<reqwest::Response>, StreamError> {
        let mut retry = RetryPolicy::new(self.config.retry.clone());

        loop {
            tracing::info!(url = %self.config.url, "connecting to filtered stream");

            let response = self
                .http
                .get(&self.config.url)
                .bearer_auth(&self.config.bearer_token)
                .send()
                .await
                .map_err(|e| StreamError::Transport(e.to_string()))?;

            let status = response.status();

            if status.is_success() {
                return Ok(Some(response));
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if let Some(delay) = retry.next_delay() {
                    tracing::warn!(
                        attempt = retry.attempt_count(),
                        delay_secs = delay.as_secs(),
                        "stream rate limited; backing off"
                    );
                    if !self.sleep_or_cancel(delay).await {
                        return Ok(None);
                    }
                    continue;
                }
                return Err(StreamError::RateLimitExhausted {
                    attempts: retry.attempt_count(),
                });
            }

            let detail = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                // A revoked credential must be visible, not silently retried.
                tracing::error!(status = status.as_u16(), detail = %detail, "stream authentication rejected");
            }
            return Err(StreamError::Endpoint {
                status: status.as_u16(),
                detail,
            });
        }
    }

    /// Read the response body line by line until the connection drops.
    ///
    /// Blank lines are keep-alives and are skipped. Returns `Ok(())` only
    /// when cancelled; every other exit is an error the caller turns into a
    /// reconnect.
    async fn read_lines(&self, response: reqwest::Response) -> Result<(), StreamError> {
        let body = response
            .bytes_stream()
            .map_err(std::io::Error::other);
        let mut lines = StreamReader::new(body).lines();

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => {
                    tracing::info!("stream consumer cancelled while streaming");
                    return Ok(());
                }
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            // Keep-alive.
                            continue;
                        }

                        let decoded: StreamLine = serde_json::from_str(&line)
                            .map_err(|e| StreamError::Decode(e.to_string()))?;

                        self.events
                            .send(StreamEvent::Record(decoded.into()))
                            .await
                            .map_err(|_| StreamError::ChannelClosed)?;
                    }
                    Ok(None) => {
                        return Err(StreamError::Disconnected(
                            "server closed the connection".to_string(),
                        ));
                    }
                    Err(e) => {
                        return Err(StreamError::Disconnected(e.to_string()));
                    }
                },
            }
        }
    }

    /// Sleep unless cancelled first; `false` when cancelled.
    async fn sleep_or_cancel(&self, delay: Duration) -> bool {
        tokio::select! {
            () = self.cancel.cancelled() => false,
            () = tokio::time::sleep(delay) => true,
        }
    }
}
