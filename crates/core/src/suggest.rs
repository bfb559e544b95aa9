//! Search-as-you-type suggestions, passed through from Google's autocomplete.

use crate::retry::RetryPolicy;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::warn;

const SUGGEST_URL: &str = "https://suggestqueries.google.com/complete/search";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Returns the provider's raw autocomplete payload for `query`.
    async fn complete(&self, query: &str) -> Result<Value>;
}

pub struct GoogleSuggest {
    client: Client,
}

impl GoogleSuggest {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SuggestionProvider for GoogleSuggest {
    async fn complete(&self, query: &str) -> Result<Value> {
        // The firefox client answers with plain JSON: [query, [suggestions...]].
        let body = self
            .client
            .get(SUGGEST_URL)
            .query(&[("client", "firefox"), ("q", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body)
    }
}

/// Three attempts, each capped at five seconds.
pub fn suggest_retry_policy() -> RetryPolicy {
    RetryPolicy::default().with_timeout(Duration::from_secs(5))
}

/// Fetches suggestions for `query`, or `[query, []]` once retries run out.
pub async fn suggest(provider: &dyn SuggestionProvider, policy: &RetryPolicy, query: &str) -> Value {
    match policy.run("suggest", || provider.complete(query)).await {
        Ok(value) => value,
        Err(e) => {
            warn!(%query, error = %e, "Suggestions unavailable, returning empty list");
            json!([query, []])
        }
    }
}
