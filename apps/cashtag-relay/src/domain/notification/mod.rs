//! Notification Types
//!
//! Outbound notification payloads handed to the delivery transport. A
//! notification is created by the transformer and consumed immediately by
//! the notifier; there is no queue and no retry buffer.

/// Opaque identifier of the destination chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTarget(String);

impl ChatTarget {
    /// Wrap a chat identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as sent to the delivery endpoint.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// How the delivery transport should interpret the notification body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Body is literal text, already escaped; render without markup.
    PlainEscaped,
    /// Body carries rich markup with injected hyperlinks.
    RichLinked,
}

/// One formatted outbound notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Destination chat.
    pub chat_target: ChatTarget,
    /// Fully formatted message body.
    pub body: String,
    /// Rendering instruction for the transport.
    pub render_mode: RenderMode,
    /// Suppress link-preview unfurling of injected hyperlinks.
    pub suppress_link_preview: bool,
}
