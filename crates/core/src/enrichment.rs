//! Enrichment Fetchers
//!
//! Three independent lookups attached to a generated resource: web articles,
//! videos and curated practice problems. Each fetcher absorbs its own failures
//! and returns an empty value instead, so a broken provider never affects the
//! other two or the resource itself.

use crate::defaults::normalize_problem_set;
use crate::llm_client::StructuredGenerator;
use crate::prompts::{CURATE_PROBLEMS, PromptLibrary};
use crate::resource::{ProblemSet, VideoResult, WebResult};
use crate::retry::RetryPolicy;
use crate::schema::generate_conforming;
use crate::search::{MAX_SEARCH_RESULTS, SEARCH_TIMEOUT, VideoSearchProvider, WebSearchProvider};
use std::time::Duration;
use tracing::{debug, warn};

/// The settled results of all three fetchers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    pub web_results: Vec<WebResult>,
    pub youtube_results: Vec<VideoResult>,
    pub problem_set: ProblemSet,
}

/// Borrowed handles to everything the fetchers need.
pub struct Enricher<'a> {
    pub web: &'a dyn WebSearchProvider,
    pub video: &'a dyn VideoSearchProvider,
    pub generator: &'a dyn StructuredGenerator,
    pub prompts: &'a PromptLibrary,
    pub search_timeout: Duration,
    pub problem_retry: RetryPolicy,
}

impl<'a> Enricher<'a> {
    pub fn new(
        web: &'a dyn WebSearchProvider,
        video: &'a dyn VideoSearchProvider,
        generator: &'a dyn StructuredGenerator,
        prompts: &'a PromptLibrary,
    ) -> Self {
        Self {
            web,
            video,
            generator,
            prompts,
            search_timeout: SEARCH_TIMEOUT,
            problem_retry: problem_retry_policy(),
        }
    }

    /// Runs all fetchers concurrently and waits for every one of them.
    pub async fn run(&self, web_query: &str, video_query: &str, topic: &str) -> Enrichment {
        let (web_results, youtube_results, problem_set) = tokio::join!(
            self.fetch_web_results(web_query),
            self.fetch_video_results(video_query),
            self.fetch_problem_set(topic),
        );

        debug!(
            web = web_results.len(),
            videos = youtube_results.len(),
            programming = problem_set.is_programming_topic,
            "Enrichment settled"
        );

        Enrichment {
            web_results,
            youtube_results,
            problem_set,
        }
    }

    pub async fn fetch_web_results(&self, query: &str) -> Vec<WebResult> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        match tokio::time::timeout(self.search_timeout, self.web.search(query)).await {
            Ok(Ok(mut results)) => {
                results.truncate(MAX_SEARCH_RESULTS);
                results
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Web search failed");
                Vec::new()
            }
            Err(_) => {
                warn!(timeout_ms = self.search_timeout.as_millis() as u64, "Web search timed out");
                Vec::new()
            }
        }
    }

    pub async fn fetch_video_results(&self, query: &str) -> Vec<VideoResult> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        match tokio::time::timeout(self.search_timeout, self.video.search(query)).await {
            Ok(Ok(mut results)) => {
                results.truncate(MAX_SEARCH_RESULTS);
                results
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Video search failed");
                Vec::new()
            }
            Err(_) => {
                warn!(timeout_ms = self.search_timeout.as_millis() as u64, "Video search timed out");
                Vec::new()
            }
        }
    }

    /// Asks the model to curate practice problems for `topic`.
    ///
    /// Any failure yields the empty, non-programming problem set.
    pub async fn fetch_problem_set(&self, topic: &str) -> ProblemSet {
        let prompt = match self.prompts.render(CURATE_PROBLEMS, topic, "") {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(error = %e, "Cannot render problem curation prompt");
                return ProblemSet::default();
            }
        };

        let curated = self
            .problem_retry
            .run("problem curation", || {
                generate_conforming::<ProblemSet>(self.generator, &prompt)
            })
            .await;

        match curated {
            Ok(set) => normalize_problem_set(set, topic),
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "Problem curation failed");
                ProblemSet::default()
            }
        }
    }
}

/// Retry budget for problem curation: two attempts, each capped at 30 seconds.
pub fn problem_retry_policy() -> RetryPolicy {
    RetryPolicy::new(2).with_timeout(Duration::from_secs(30))
}
