//! Rule Synchronization
//!
//! Reconciles the desired rule set against the remote store by full
//! replacement: fetch everything, delete everything, recreate everything.
//! The policy trades efficiency for simplicity and idempotence; repeated
//! runs converge to the same rule set regardless of prior state, which
//! matters because the supervisor re-invokes synchronization after stream
//! failures.

use crate::application::ports::{ActiveRule, RuleStore, RuleStoreError};
use crate::domain::rules::DesiredRuleSet;

/// Full-replacement rule synchronizer over a [`RuleStore`] port.
#[derive(Debug)]
pub struct RuleSynchronizer<S> {
    store: S,
}

impl<S: RuleStore> RuleSynchronizer<S> {
    /// Create a synchronizer over `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Replace whatever rules exist remotely with `desired`.
    ///
    /// Any step failing is fatal for this phase; there is no partial
    /// rollback and no incremental diffing.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuleStoreError`] from fetch, delete, or create.
    pub async fn synchronize(
        &self,
        desired: &DesiredRuleSet,
    ) -> Result<Vec<ActiveRule>, RuleStoreError> {
        let existing = self.store.fetch().await?;

        if existing.is_empty() {
            tracing::debug!("no existing stream rules to delete");
        } else {
            let ids: Vec<String> = existing.iter().map(|rule| rule.id.clone()).collect();
            self.store.delete(&ids).await?;
            tracing::info!(deleted = ids.len(), "cleared existing stream rules");
        }

        if desired.is_empty() {
            tracing::warn!("desired rule set is empty; nothing to create");
            return Ok(Vec::new());
        }

        let active = self.store.create(desired.rules()).await?;
        tracing::info!(active = active.len(), "stream rules synchronized");
        Ok(active)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::application::ports::MockRuleStore;
    use crate::domain::rules::Rule;

    fn desired(labels: &[&str]) -> DesiredRuleSet {
        DesiredRuleSet::from_authors(labels.iter().copied())
    }

    #[tokio::test]
    async fn empty_fetch_skips_delete() {
        let mut store = MockRuleStore::new();
        store.expect_fetch().times(1).returning(|| Ok(vec![]));
        store.expect_delete().times(0);
        store.expect_create().times(1).returning(|rules| {
            Ok(rules
                .iter()
                .enumerate()
                .map(|(i, r)| ActiveRule {
                    id: i.to_string(),
                    match_expression: r.match_expression.clone(),
                    label: r.label.clone(),
                })
                .collect())
        });

        let active = RuleSynchronizer::new(store)
            .synchronize(&desired(&["a", "b"]))
            .await
            .unwrap();
        assert_eq!(active.len(), 2);
    }

    #[tokio::test]
    async fn existing_rules_are_deleted_by_id() {
        let mut store = MockRuleStore::new();
        store.expect_fetch().times(1).returning(|| {
            Ok(vec![
                ActiveRule {
                    id: "10".to_string(),
                    match_expression: "from:old".to_string(),
                    label: "old".to_string(),
                },
                ActiveRule {
                    id: "11".to_string(),
                    match_expression: "from:older".to_string(),
                    label: "older".to_string(),
                },
            ])
        });
        store
            .expect_delete()
            .times(1)
            .withf(|ids| ids.len() == 2 && ids[0] == "10" && ids[1] == "11")
            .returning(|_| Ok(()));
        store.expect_create().times(1).returning(|_| Ok(vec![]));

        RuleSynchronizer::new(store)
            .synchronize(&desired(&["new"]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn empty_desired_set_clears_without_creating() {
        let mut store = MockRuleStore::new();
        store.expect_fetch().times(1).returning(|| {
            Ok(vec![ActiveRule {
                id: "10".to_string(),
                match_expression: "from:old".to_string(),
                label: "old".to_string(),
            }])
        });
        store.expect_delete().times(1).returning(|_| Ok(()));
        store.expect_create().times(0);

        let active = RuleSynchronizer::new(store)
            .synchronize(&desired(&[]))
            .await
            .unwrap();
        assert!(active.is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_is_fatal_before_any_mutation() {
        let mut store = MockRuleStore::new();
        store.expect_fetch().times(1).returning(|| {
            Err(RuleStoreError::Endpoint {
                status: 500,
                detail: "boom".to_string(),
            })
        });
        store.expect_delete().times(0);
        store.expect_create().times(0);

        let err = RuleSynchronizer::new(store)
            .synchronize(&desired(&["a"]))
            .await
            .unwrap_err();
        assert!(matches!(err, RuleStoreError::Endpoint { status: 500, .. }));
    }

    /// Stateful in-memory store for idempotence checks.
    #[derive(Default)]
    struct FakeStore {
        rules: Mutex<Vec<ActiveRule>>,
        next_id: Mutex<u64>,
    }

    #[async_trait]
    impl RuleStore for FakeStore {
        async fn fetch(&self) -> Result<Vec<ActiveRule>, RuleStoreError> {
            Ok(self.rules.lock().unwrap().clone())
        }

        async fn delete(&self, ids: &[String]) -> Result<(), RuleStoreError> {
            self.rules
                .lock()
                .unwrap()
                .retain(|r| !ids.contains(&r.id));
            Ok(())
        }

        async fn create(&self, rules: &[Rule]) -> Result<Vec<ActiveRule>, RuleStoreError> {
            let mut stored = self.rules.lock().unwrap();
            let mut next_id = self.next_id.lock().unwrap();
            let mut created = Vec::with_capacity(rules.len());
            for rule in rules {
                if stored.iter().any(|r| r.label == rule.label) {
                    return Err(RuleStoreError::Endpoint {
                        status: 400,
                        detail: format!("duplicate rule label {}", rule.label),
                    });
                }
                *next_id += 1;
                let active = ActiveRule {
                    id: next_id.to_string(),
                    match_expression: rule.match_expression.clone(),
                    label: rule.label.clone(),
                };
                stored.push(active.clone());
                created.push(active);
            }
            Ok(created)
        }
    }

    #[tokio::test]
    async fn repeated_synchronization_is_idempotent() {
        let store = FakeStore::default();
        // Seed unrelated pre-existing state.
        store
            .create(&[Rule::author("stale"), Rule::author("staler")])
            .await
            .unwrap();

        let synchronizer = RuleSynchronizer::new(store);
        let want = desired(&["alpha", "beta"]);

        let first = synchronizer.synchronize(&want).await.unwrap();
        let second = synchronizer.synchronize(&want).await.unwrap();

        let shape =
            |rules: &[ActiveRule]| -> Vec<(String, String)> {
                rules
                    .iter()
                    .map(|r| (r.match_expression.clone(), r.label.clone()))
                    .collect()
            };
        assert_eq!(shape(&first), shape(&second));
        assert_eq!(
            shape(&first),
            vec![
                ("from:alpha".to_string(), "alpha".to_string()),
                ("from:beta".to_string(), "beta".to_string()),
            ]
        );
    }
}
