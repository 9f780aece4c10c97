//! Telegram Delivery Adapter
//!
//! Implements the [`Notifier`] port against the Telegram Bot API
//! `sendMessage` method. `RichLinked` notifications are sent with
//! `parse_mode=MarkdownV2`; `PlainEscaped` bodies go out without a parse
//! mode so the transport renders them literally. The relay never retries a
//! failed delivery.

use async_trait::async_trait;
use serde::Serialize;

use crate::application::ports::{Notifier, NotifyError};
use crate::domain::notification::{Notification, RenderMode};

/// `sendMessage` request payload.
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
    disable_web_page_preview: bool,
}

impl<'a> SendMessageRequest<'a> {
    fn from_notification(notification: &'a Notification) -> Self {
        Self {
            chat_id: notification.chat_target.as_str(),
            text: &notification.body,
            parse_mode: match notification.render_mode {
                RenderMode::RichLinked => Some("MarkdownV2"),
                RenderMode::PlainEscaped => None,
            },
            disable_web_page_preview: notification.suppress_link_preview,
        }
    }
}

/// Telegram Bot API notifier.
///
/// The endpoint URL embeds the bot token; the struct deliberately has no
/// `Debug` derive so the token cannot leak into logs.
#[derive(Clone)]
pub struct TelegramNotifier {
    http: reqwest::Client,
    endpoint: String,
}

impl TelegramNotifier {
    /// Create a notifier against `base_url` using `bot_token`.
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str, bot_token: &str) -> Self {
        Self {
            http,
            endpoint: format!("{base_url}/bot{bot_token}/sendMessage"),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let payload = SendMessageRequest::from_notification(notification);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Endpoint {
                status: status.as_u16(),
                detail: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::domain::notification::ChatTarget;

    fn notification(render_mode: RenderMode) -> Notification {
        Notification {
            chat_target: ChatTarget::new("-100123"),
            body: "*hello*".to_string(),
            render_mode,
            suppress_link_preview: true,
        }
    }

    #[test]
    fn rich_linked_payload_shape() {
        let n = notification(RenderMode::RichLinked);
        let json = serde_json::to_value(SendMessageRequest::from_notification(&n)).unwrap();
        assert_eq!(json["chat_id"], "-100123");
        assert_eq!(json["parse_mode"], "MarkdownV2");
        assert_eq!(json["disable_web_page_preview"], true);
    }

    #[test]
    fn plain_escaped_payload_omits_parse_mode() {
        let n = notification(RenderMode::PlainEscaped);
        let json = serde_json::to_value(SendMessageRequest::from_notification(&n)).unwrap();
        assert!(json.get("parse_mode").is_none());
    }

    #[tokio::test]
    async fn send_posts_to_bot_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTOKEN/sendMessage"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": "-100123",
                "parse_mode": "MarkdownV2",
                "disable_web_page_preview": true,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = TelegramNotifier::new(reqwest::Client::new(), &server.uri(), "TOKEN");
        notifier
            .send(&notification(RenderMode::RichLinked))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delivery_error_surfaces_status_and_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429).set_body_string(r#"{"ok":false,"error_code":429}"#),
            )
            .mount(&server)
            .await;

        let notifier = TelegramNotifier::new(reqwest::Client::new(), &server.uri(), "TOKEN");
        let err = notifier
            .send(&notification(RenderMode::RichLinked))
            .await
            .unwrap_err();

        match err {
            NotifyError::Endpoint { status, detail } => {
                assert_eq!(status, 429);
                assert!(detail.contains("error_code"));
            }
            NotifyError::Transport(_) => panic!("expected endpoint error"),
        }
    }
}
