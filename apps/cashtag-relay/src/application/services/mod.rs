//! Application Services
//!
//! `RelayService` drains stream events sequentially: each record goes
//! through the transformer and any non-empty output is handed to the
//! notifier. Because there is exactly one producer and one consumer, stream
//! order is preserved and records are processed one at a time.

use tokio::sync::mpsc;

use crate::application::ports::{Notifier, StreamEvent};
use crate::application::transform::Transformer;
use crate::domain::record::StreamRecord;

/// Sequential record pipeline between the stream consumer and the notifier.
#[derive(Debug)]
pub struct RelayService<N> {
    transformer: Transformer,
    notifier: N,
}

impl<N: Notifier> RelayService<N> {
    /// Create a relay over `transformer` and `notifier`.
    pub const fn new(transformer: Transformer, notifier: N) -> Self {
        Self {
            transformer,
            notifier,
        }
    }

    /// Drain `events` until the channel closes (consumer finished or was
    /// cancelled).
    pub async fn run(&self, mut events: mpsc::Receiver<StreamEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                StreamEvent::Connected => tracing::info!("stream connected"),
                StreamEvent::Disconnected => tracing::warn!("stream disconnected"),
                StreamEvent::Reconnecting { attempt } => {
                    tracing::info!(attempt, "stream reconnecting");
                }
                StreamEvent::Record(record) => self.handle_record(&record).await,
            }
        }
    }

    /// Transform one record and deliver the result, if any.
    ///
    /// A delivery failure is logged and does not affect subsequent records.
    async fn handle_record(&self, record: &StreamRecord) {
        let Some(notification) = self.transformer.transform(record) else {
            tracing::debug!(id = %record.id, "record discarded: no cashtags");
            return;
        };

        match self.notifier.send(&notification).await {
            Ok(()) => tracing::info!(
                id = %record.id,
                author = record.author().unwrap_or_default(),
                "notification delivered"
            ),
            Err(e) => tracing::warn!(
                id = %record.id,
                error = %e,
                "notification delivery failed"
            ),
        }
    }
}
