//! Message Transformer
//!
//! Pure pipeline that turns one stream record into at most one outbound
//! notification. Records whose body carries no cashtag are discarded; this
//! is the primary filter that keeps output to actionable financial mentions
//! even though the rule set matches on author identity alone.
//!
//! The pipeline stages run in a fixed order:
//!
//! 1. Decode HTML entities in the post body
//! 2. Extract the set of distinct cashtags (case-insensitive, uppercased)
//! 3. Escape author and body for MarkdownV2
//! 4. Linkify cashtag occurrences in the escaped body
//! 5. Compose the header line and final body
//!
//! Escaping always happens before link injection; reversing the order would
//! escape the injected markup itself.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::notification::{ChatTarget, Notification, RenderMode};
use crate::domain::record::StreamRecord;

/// Finance-quote page base; the slug is the lowercased symbol.
const QUOTE_URL_BASE: &str = "https://finance.yahoo.com/quote";

/// Cashtag search page base; `%24` is the url-encoded `$` sigil.
const SEARCH_URL_BASE: &str = "https://twitter.com/search?q=%24";

/// Post permalink base.
const POST_URL_BASE: &str = "https://twitter.com";

/// Characters with special meaning in Telegram MarkdownV2.
const MARKDOWN_SPECIAL: &[char] = &[
    '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Compiled cashtag pattern: a `$` sigil followed by 1-6 alphabetic
/// characters. Initialized once process-wide, immutable thereafter.
#[allow(clippy::expect_used)]
fn cashtag_re() -> &'static Regex {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\$[A-Za-z]{1,6}").expect("static cashtag pattern is valid")
    });
    &RE
}

/// Backslash-escape every MarkdownV2-special character so the text renders
/// literally.
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if MARKDOWN_SPECIAL.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Extract the set of distinct cashtag symbols from `text`, uppercased.
///
/// Symbols differing only by case collapse to one entry.
#[must_use]
pub fn extract_tickers(text: &str) -> BTreeSet<String> {
    cashtag_re()
        .find_iter(text)
        .map(|m| m.as_str()[1..].to_uppercase())
        .collect()
}

/// Replace every cashtag occurrence from `tickers` in the already-escaped
/// body with a search hyperlink, preserving the original case of the match.
fn linkify_cashtags(escaped_body: &str, tickers: &BTreeSet<String>) -> String {
    cashtag_re()
        .replace_all(escaped_body, |caps: &regex::Captures<'_>| {
            let occurrence = &caps[0];
            let symbol = occurrence[1..].to_uppercase();
            if tickers.contains(&symbol) {
                format!("[{occurrence}]({SEARCH_URL_BASE}{})", symbol.to_lowercase())
            } else {
                occurrence.to_string()
            }
        })
        .into_owned()
}

/// Record-to-notification transformer bound to one destination chat.
#[derive(Debug, Clone)]
pub struct Transformer {
    chat: ChatTarget,
}

impl Transformer {
    /// Create a transformer targeting `chat`.
    #[must_use]
    pub const fn new(chat: ChatTarget) -> Self {
        Self { chat }
    }

    /// Transform one record into a notification, or `None` when the record
    /// carries no cashtag or no matched label.
    #[must_use]
    pub fn transform(&self, record: &StreamRecord) -> Option<Notification> {
        let text = html_escape::decode_html_entities(&record.text);

        let tickers = extract_tickers(&text);
        if tickers.is_empty() {
            return None;
        }

        // The rule API guarantees at least one label, but an unattributable
        // record is discarded rather than credited to nobody.
        let author = record.author().filter(|a| !a.is_empty())?;

        let escaped_author = escape_markdown(author);
        let escaped_body = escape_markdown(&text);
        let linked_body = linkify_cashtags(&escaped_body, &tickers);

        let post_url = format!("{POST_URL_BASE}/{author}/status/{}", record.id);
        let quote_links = tickers
            .iter()
            .map(|symbol| format!("[${symbol}]({QUOTE_URL_BASE}/{})", symbol.to_lowercase()))
            .collect::<Vec<_>>()
            .join(" ");

        let body = format!("*[@{escaped_author}]({post_url}) on {quote_links}*\n\n{linked_body}");

        Some(Notification {
            chat_target: self.chat.clone(),
            body,
            render_mode: RenderMode::RichLinked,
            suppress_link_preview: true,
        })
    }
}
