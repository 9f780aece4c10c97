//! Filter Rule Types
//!
//! Declarative rules for the remote filtered-stream rule set. A rule pairs a
//! server-side match expression (e.g. `from:garyblack00`) with an opaque
//! label echoed back on every matching record. The label doubles as the
//! author credit in outbound notifications, so labels must be unique within
//! a rule set.
//!
//! Rules exist only during startup reconciliation; remote rule ids are never
//! persisted across runs.

/// One desired server-side filter rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Server-side filter predicate, e.g. `from:garyblack00`.
    pub match_expression: String,
    /// Opaque label echoed on every matching record.
    pub label: String,
}

impl Rule {
    /// Create a rule from an explicit expression and label.
    #[must_use]
    pub fn new(match_expression: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            match_expression: match_expression.into(),
            label: label.into(),
        }
    }

    /// Create a rule matching all posts authored by `handle`, labeled with
    /// the handle itself.
    #[must_use]
    pub fn author(handle: &str) -> Self {
        Self {
            match_expression: format!("from:{handle}"),
            label: handle.to_string(),
        }
    }
}

/// Ordered set of desired rules with unique labels.
///
/// Duplicate labels collapse to the first occurrence so that the label can
/// round-trip unambiguously as the attributed author.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredRuleSet {
    rules: Vec<Rule>,
}

impl DesiredRuleSet {
    /// Build a rule set from an ordered list of author handles.
    #[must_use]
    pub fn from_authors<I, S>(handles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for handle in handles {
            set.push(Rule::author(handle.as_ref()));
        }
        set
    }

    /// Append a rule, dropping it if its label is already present.
    pub fn push(&mut self, rule: Rule) {
        if self.rules.iter().any(|r| r.label == rule.label) {
            return;
        }
        self.rules.push(rule);
    }

    /// The rules in insertion order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set contains no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_rule_shape() {
        let rule = Rule::author("garyblack00");
        assert_eq!(rule.match_expression, "from:garyblack00");
        assert_eq!(rule.label, "garyblack00");
    }

    #[test]
    fn duplicate_labels_collapse_to_first() {
        let set = DesiredRuleSet::from_authors(["alpha", "beta", "alpha"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.rules()[0].label, "alpha");
        assert_eq!(set.rules()[1].label, "beta");
    }

    #[test]
    fn push_preserves_insertion_order() {
        let mut set = DesiredRuleSet::default();
        set.push(Rule::author("one"));
        set.push(Rule::new("from:two has:links", "two"));
        let labels: Vec<_> = set.rules().iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["one", "two"]);
    }

    #[test]
    fn empty_set() {
        let set = DesiredRuleSet::from_authors(Vec::<String>::new());
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }
}
