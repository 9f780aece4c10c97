//! Rule Management Client
//!
//! HTTP adapter for the rule-management endpoint, implementing the
//! [`RuleStore`] port. All three operations hit the same path: a `GET` to
//! fetch, a `POST` with a `delete` payload (expect 200), and a `POST` with
//! an `add` payload (expect 201). Any other status surfaces the response
//! body as the fatal error detail.

use async_trait::async_trait;
use reqwest::StatusCode;

use super::messages::{
    AddRulesRequest, DeleteIds, DeleteRulesRequest, RemoteRule, RuleEntry, RuleListResponse,
};
use crate::application::ports::{ActiveRule, RuleStore, RuleStoreError};
use crate::domain::rules::Rule;

/// Path of the rule-management endpoint under the API base.
const RULES_PATH: &str = "/2/tweets/search/stream/rules";

/// HTTP client for the rule-management endpoint.
#[derive(Debug, Clone)]
pub struct RuleClient {
    http: reqwest::Client,
    endpoint: String,
    bearer_token: String,
}

impl RuleClient {
    /// Create a client against `base_url`.
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str, bearer_token: String) -> Self {
        Self {
            http,
            endpoint: format!("{base_url}{RULES_PATH}"),
            bearer_token,
        }
    }

    /// Surface a non-success response as an endpoint error with its body.
    async fn endpoint_error(response: reqwest::Response) -> RuleStoreError {
        let status = response.status().as_u16();
        let detail = response.text().await.unwrap_or_default();
        RuleStoreError::Endpoint { status, detail }
    }
}

impl From<RemoteRule> for ActiveRule {
    fn from(rule: RemoteRule) -> Self {
        Self {
            id: rule.id,
            match_expression: rule.value,
            label: rule.tag,
        }
    }
}

#[async_trait]
impl RuleStore for RuleClient {
    async fn fetch(&self) -> Result<Vec<ActiveRule>, RuleStoreError> {
        let response = self
            .http
            .get(&self.endpoint)
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .map_err(|e| RuleStoreError::Transport(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(Self::endpoint_error(response).await);
        }

        let body: RuleListResponse = response
            .json()
            .await
            .map_err(|e| RuleStoreError::Decode(e.to_string()))?;

        Ok(body.into_rules().into_iter().map(Into::into).collect())
    }

    async fn delete(&self, ids: &[String]) -> Result<(), RuleStoreError> {
        let payload = DeleteRulesRequest {
            delete: DeleteIds { ids: ids.to_vec() },
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.bearer_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RuleStoreError::Transport(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(Self::endpoint_error(response).await);
        }

        Ok(())
    }

    async fn create(&self, rules: &[Rule]) -> Result<Vec<ActiveRule>, RuleStoreError> {
        let payload = AddRulesRequest {
            add: rules
                .iter()
                .map(|rule| RuleEntry {
                    value: rule.match_expression.clone(),
                    tag: rule.label.clone(),
                })
                .collect(),
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.bearer_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RuleStoreError::Transport(e.to_string()))?;

        if response.status() != StatusCode::CREATED {
            return Err(Self::endpoint_error(response).await);
        }

        let body: RuleListResponse = response
            .json()
            .await
            .map_err(|e| RuleStoreError::Decode(e.to_string()))?;

        Ok(body.into_rules().into_iter().map(Into::into).collect())
    }
}
