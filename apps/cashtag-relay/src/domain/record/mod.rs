//! Stream Record Types
//!
//! Canonical internal representation of one decoded line from the filtered
//! stream. Records are ephemeral: created on decode, discarded after
//! transformation.

/// One decoded post from the filtered stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    /// Post id assigned by the upstream platform.
    pub id: String,
    /// Raw post body, possibly HTML-entity-escaped.
    pub text: String,
    /// Labels of the rules this record matched, in match order.
    ///
    /// The rule API guarantees at least one entry; an empty list makes the
    /// record non-actionable.
    pub matched_labels: Vec<String>,
}

impl StreamRecord {
    /// Attributed author: the label of the first matched rule.
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.matched_labels.first().map(String::as_str)
    }
}
