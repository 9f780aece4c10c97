//! Twitter API v2 Wire Types
//!
//! Request and response shapes for the rule-management endpoint and the
//! filtered-stream endpoint. These map directly to the JSON schemas; the
//! canonical internal types live in the domain layer.
//!
//! # References
//!
//! - [Filtered stream](https://developer.twitter.com/en/docs/twitter-api/tweets/filtered-stream)

use serde::{Deserialize, Serialize};

use crate::domain::record::StreamRecord;

// =============================================================================
// Rule Management
// =============================================================================

/// One rule as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRule {
    /// Remote rule id.
    pub id: String,
    /// Filter predicate.
    pub value: String,
    /// Label echoed on matching records.
    pub tag: String,
}

/// Response to `GET /2/tweets/search/stream/rules` and to rule mutations.
///
/// The `data` array is absent entirely when no rules exist.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleListResponse {
    /// Stored rules, if any.
    #[serde(default)]
    pub data: Option<Vec<RemoteRule>>,
}

impl RuleListResponse {
    /// The stored rules, treating an absent array as empty.
    #[must_use]
    pub fn into_rules(self) -> Vec<RemoteRule> {
        self.data.unwrap_or_default()
    }
}

/// One rule to create.
#[derive(Debug, Clone, Serialize)]
pub struct RuleEntry {
    /// Filter predicate.
    pub value: String,
    /// Label echoed on matching records.
    pub tag: String,
}

/// Batched create request: `POST /2/tweets/search/stream/rules`.
#[derive(Debug, Serialize)]
pub struct AddRulesRequest {
    /// Rules to create.
    pub add: Vec<RuleEntry>,
}

/// Batched delete request: `POST /2/tweets/search/stream/rules`.
#[derive(Debug, Serialize)]
pub struct DeleteRulesRequest {
    /// Ids to delete.
    pub delete: DeleteIds,
}

/// Id list inside a batched delete request.
#[derive(Debug, Serialize)]
pub struct DeleteIds {
    /// Remote rule ids.
    pub ids: Vec<String>,
}

// =============================================================================
// Filtered Stream
// =============================================================================

/// One newline-delimited line from the filtered stream.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamLine {
    /// The post itself.
    pub data: PostData,
    /// Rules this post matched, in match order.
    #[serde(default)]
    pub matching_rules: Vec<MatchingRule>,
}

/// Post payload inside a stream line.
#[derive(Debug, Clone, Deserialize)]
pub struct PostData {
    /// Post id.
    pub id: String,
    /// Post body, possibly HTML-entity-escaped.
    pub text: String,
}

/// One matched rule reference inside a stream line.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingRule {
    /// Remote rule id.
    #[serde(default)]
    pub id: String,
    /// Rule label.
    pub tag: String,
}

impl From<StreamLine> for StreamRecord {
    fn from(line: StreamLine) -> Self {
        Self {
            id: line.data.id,
            text: line.data.text,
            matched_labels: line.matching_rules.into_iter().map(|r| r.tag).collect(),
        }
    }
}
