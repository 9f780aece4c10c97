//! Relay Pipeline Integration Tests
//!
//! Drives records through the public transformer-plus-relay surface with an
//! in-memory notifier, checking the delivered message bodies end to end.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use cashtag_relay::{
    ChatTarget, Notification, Notifier, NotifyError, RelayService, RenderMode, StreamEvent,
    StreamRecord, Transformer,
};

/// Capturing notifier; optionally fails the first `fail_first` sends.
#[derive(Clone, Default)]
struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
    fail_first: Arc<Mutex<usize>>,
}

impl RecordingNotifier {
    fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    fn failing(count: usize) -> Self {
        Self {
            sent: Arc::default(),
            fail_first: Arc::new(Mutex::new(count)),
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        {
            let mut remaining = self.fail_first.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(NotifyError::Endpoint {
                    status: 502,
                    detail: "upstream unavailable".to_string(),
                });
            }
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

fn record(id: &str, text: &str, author: &str) -> StreamRecord {
    StreamRecord {
        id: id.to_string(),
        text: text.to_string(),
        matched_labels: vec![author.to_string()],
    }
}

async fn run_pipeline(notifier: RecordingNotifier, records: Vec<StreamRecord>) {
    let relay = RelayService::new(Transformer::new(ChatTarget::new("-100555")), notifier);

    let (tx, rx) = mpsc::channel(16);
    tx.send(StreamEvent::Connected).await.unwrap();
    for r in records {
        tx.send(StreamEvent::Record(r)).await.unwrap();
    }
    drop(tx);

    relay.run(rx).await;
}

#[tokio::test]
async fn cashtag_record_is_delivered_with_linked_header() {
    let notifier = RecordingNotifier::default();
    run_pipeline(
        notifier.clone(),
        vec![record("1450000000000000000", "$TSLA mooning", "garyblack00")],
    )
    .await;

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);

    let n = &sent[0];
    assert_eq!(n.chat_target.as_str(), "-100555");
    assert_eq!(n.render_mode, RenderMode::RichLinked);
    assert!(n.suppress_link_preview);

    let header = n.body.lines().next().unwrap();
    assert!(header.starts_with("*[@garyblack00]"));
    assert!(header.contains("https://twitter.com/garyblack00/status/1450000000000000000"));
    assert!(header.contains("[$TSLA](https://finance.yahoo.com/quote/tsla)"));
    assert!(n.body.contains("[$TSLA](https://twitter.com/search?q=%24tsla) mooning"));
}

#[tokio::test]
async fn quiet_records_never_reach_the_notifier() {
    let notifier = RecordingNotifier::default();
    run_pipeline(
        notifier.clone(),
        vec![
            record("1", "just vibes today", "garyblack00"),
            record("2", "price target $420", "garyblack00"),
            record("3", "$NVDA breakout", "Beth_Kindig"),
        ],
    )
    .await;

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("Beth\\_Kindig"));
}

#[tokio::test]
async fn delivery_failures_skip_only_the_failed_record() {
    let notifier = RecordingNotifier::failing(1);
    run_pipeline(
        notifier.clone(),
        vec![
            record("1", "$AAPL earnings", "a"),
            record("2", "$MSFT guidance", "a"),
            record("3", "$GOOG split", "a"),
        ],
    )
    .await;

    let sent = notifier.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].body.contains("/status/2"));
    assert!(sent[1].body.contains("/status/3"));
}

#[tokio::test]
async fn markup_in_the_post_survives_as_literal_text() {
    let notifier = RecordingNotifier::default();
    run_pipeline(
        notifier.clone(),
        vec![record(
            "5",
            "$AMC *not advice* [see thread] &amp; more",
            "trader_one",
        )],
    )
    .await;

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    let body = &sent[0].body;
    assert!(body.contains(r"\*not advice\*"));
    assert!(body.contains(r"\[see thread\]"));
    // Entity decodes first, then the literal ampersand passes through.
    assert!(body.contains("& more"));
    assert!(body.contains("trader\\_one"));
}
