//! Web and video search providers used for enrichment.

use crate::resource::{VideoResult, WebResult};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Maximum number of results kept per provider.
pub const MAX_SEARCH_RESULTS: usize = 6;
/// Per-request timeout applied to every search call.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

const CUSTOM_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";
const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<WebResult>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoSearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<VideoResult>>;
}

/// Builds the HTTP client shared by the search providers.
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("learnpath/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Google Programmable Search (Custom Search JSON API).
///
/// Without both an API key and a search engine id the provider is disabled and
/// every search returns no results.
pub struct GoogleCustomSearch {
    client: Client,
    api_key: Option<String>,
    engine_id: Option<String>,
}

impl GoogleCustomSearch {
    pub fn new(client: Client, api_key: Option<String>, engine_id: Option<String>) -> Self {
        Self {
            client,
            api_key,
            engine_id,
        }
    }
}

#[async_trait]
impl WebSearchProvider for GoogleCustomSearch {
    async fn search(&self, query: &str) -> Result<Vec<WebResult>> {
        let (Some(key), Some(cx)) = (&self.api_key, &self.engine_id) else {
            debug!("Web search is not configured, skipping");
            return Ok(Vec::new());
        };

        let num = MAX_SEARCH_RESULTS.to_string();
        let body: Value = self
            .client
            .get(CUSTOM_SEARCH_URL)
            .query(&[
                ("key", key.as_str()),
                ("cx", cx.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(parse_custom_search(&body))
    }
}

/// Maps a Custom Search response body to web results.
pub fn parse_custom_search(body: &Value) -> Vec<WebResult> {
    let Some(items) = body.get("items").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let url = item.get("link")?.as_str()?;
            Some(WebResult {
                url: url.to_string(),
                title: str_field(item, "title"),
                snippet: str_field(item, "snippet"),
            })
        })
        .take(MAX_SEARCH_RESULTS)
        .collect()
}

/// YouTube Data API v3 video search.
pub struct YouTubeSearch {
    client: Client,
    api_key: Option<String>,
}

impl YouTubeSearch {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl VideoSearchProvider for YouTubeSearch {
    async fn search(&self, query: &str) -> Result<Vec<VideoResult>> {
        let Some(key) = &self.api_key else {
            debug!("Video search is not configured, skipping");
            return Ok(Vec::new());
        };

        let max_results = MAX_SEARCH_RESULTS.to_string();
        let body: Value = self
            .client
            .get(YOUTUBE_SEARCH_URL)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("q", query),
                ("key", key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(parse_youtube_search(&body))
    }
}

/// Maps a YouTube search response body to video results.
pub fn parse_youtube_search(body: &Value) -> Vec<VideoResult> {
    let Some(items) = body.get("items").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let video_id = item.get("id")?.get("videoId")?.as_str()?;
            let snippet = item.get("snippet");
            Some(VideoResult {
                url: format!("https://www.youtube.com/watch?v={video_id}"),
                title: snippet.map(|s| str_field(s, "title")).unwrap_or_default(),
                channel_title: snippet
                    .map(|s| str_field(s, "channelTitle"))
                    .unwrap_or_default(),
            })
        })
        .take(MAX_SEARCH_RESULTS)
        .collect()
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
