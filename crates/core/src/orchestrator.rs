//! Generation Orchestrator
//!
//! Turns a topic into a finished learning resource through three tiers:
//!
//! 1. **Primary**: the detailed prompt against the full schema.
//! 2. **Fallback**: a shorter prompt against the reduced schema.
//! 3. **Minimal**: a static resource built from the topic alone.
//!
//! Each model-backed tier runs under its own [`RetryPolicy`]. A generated
//! resource is then enriched with search results and practice problems and
//! postprocessed so that it always satisfies the published invariants. The
//! pipeline never fails: the worst case is the minimal tier.

use crate::defaults::{default_subtopics, minimal_resource, normalize_problem_set, pad_misconceptions};
use crate::enrichment::{Enricher, problem_retry_policy};
use crate::error::GenerationError;
use crate::html::repair_resource;
use crate::llm_client::StructuredGenerator;
use crate::prompts::{GENERATE_RESOURCE, GENERATE_RESOURCE_FALLBACK, PromptLibrary};
use crate::resource::{LearningResource, ReducedResource};
use crate::retry::RetryPolicy;
use crate::schema::generate_conforming;
use crate::search::{SEARCH_TIMEOUT, VideoSearchProvider, WebSearchProvider};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

const DEFAULT_DIFFICULTY: &str = "medium";

/// Which tier produced a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationTier {
    Primary,
    Fallback,
    Minimal,
}

impl GenerationTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationTier::Primary => "primary",
            GenerationTier::Fallback => "fallback",
            GenerationTier::Minimal => "minimal",
        }
    }
}

impl fmt::Display for GenerationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    pub tier: GenerationTier,
    pub resource: LearningResource,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateRequestError {
    #[error("Missing topic")]
    MissingTopic,
}

/// A validated generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    topic: String,
    difficulty: Vec<String>,
}

impl GenerateRequest {
    /// Trims the topic and rejects it when blank. Blank difficulty levels are
    /// dropped; none at all means `medium`.
    pub fn new(topic: &str, difficulty: Vec<String>) -> Result<Self, GenerateRequestError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(GenerateRequestError::MissingTopic);
        }

        let mut difficulty: Vec<String> = difficulty
            .into_iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        if difficulty.is_empty() {
            difficulty.push(DEFAULT_DIFFICULTY.to_string());
        }

        Ok(Self {
            topic: topic.to_string(),
            difficulty,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn difficulty(&self) -> &[String] {
        &self.difficulty
    }

    /// The difficulty levels as they appear in prompts, e.g. `easy, medium`.
    pub fn difficulty_label(&self) -> String {
        self.difficulty.join(", ")
    }
}

/// The contract the HTTP and CLI surfaces depend on.
#[async_trait]
pub trait ResourceService: Send + Sync {
    /// Produces a finished resource. Never fails; see [`GenerationTier`].
    async fn generate(&self, request: &GenerateRequest) -> GenerationOutcome;
}

/// Retry and timeout budgets for every stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrchestratorSettings {
    pub primary_retry: RetryPolicy,
    pub fallback_retry: RetryPolicy,
    pub problem_retry: RetryPolicy,
    pub search_timeout: Duration,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            primary_retry: RetryPolicy::default(),
            fallback_retry: RetryPolicy::default(),
            problem_retry: problem_retry_policy(),
            search_timeout: SEARCH_TIMEOUT,
        }
    }
}

pub struct Orchestrator {
    generator: Arc<dyn StructuredGenerator>,
    fallback_generator: Option<Arc<dyn StructuredGenerator>>,
    web: Arc<dyn WebSearchProvider>,
    video: Arc<dyn VideoSearchProvider>,
    prompts: Arc<PromptLibrary>,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    pub fn new(
        generator: Arc<dyn StructuredGenerator>,
        web: Arc<dyn WebSearchProvider>,
        video: Arc<dyn VideoSearchProvider>,
        prompts: Arc<PromptLibrary>,
    ) -> Self {
        Self {
            generator,
            fallback_generator: None,
            web,
            video,
            prompts,
            settings: OrchestratorSettings::default(),
        }
    }

    /// Uses a different generator (typically a cheaper model) for the fallback tier.
    pub fn with_fallback_generator(mut self, generator: Arc<dyn StructuredGenerator>) -> Self {
        self.fallback_generator = Some(generator);
        self
    }

    pub fn with_settings(mut self, settings: OrchestratorSettings) -> Self {
        self.settings = settings;
        self
    }

    async fn primary_attempt(&self, request: &GenerateRequest) -> Result<LearningResource, GenerationError> {
        let prompt = self
            .prompts
            .render(GENERATE_RESOURCE, request.topic(), &request.difficulty_label())?;
        self.settings
            .primary_retry
            .run("primary generation", || {
                generate_conforming::<LearningResource>(self.generator.as_ref(), &prompt)
            })
            .await
    }

    async fn fallback_attempt(&self, request: &GenerateRequest) -> Result<LearningResource, GenerationError> {
        let prompt = self.prompts.render(
            GENERATE_RESOURCE_FALLBACK,
            request.topic(),
            &request.difficulty_label(),
        )?;
        let generator = self
            .fallback_generator
            .as_deref()
            .unwrap_or(self.generator.as_ref());
        let reduced = self
            .settings
            .fallback_retry
            .run("fallback generation", || {
                generate_conforming::<ReducedResource>(generator, &prompt)
            })
            .await?;
        Ok(reduced.into())
    }

    async fn enrich(&self, resource: &mut LearningResource, topic: &str) {
        let web_query = non_blank_or(&resource.web_search_tagline, topic);
        let video_query = non_blank_or(&resource.youtube_search_tagline, topic);

        let enricher = Enricher {
            search_timeout: self.settings.search_timeout,
            problem_retry: self.settings.problem_retry,
            ..Enricher::new(
                self.web.as_ref(),
                self.video.as_ref(),
                self.generator.as_ref(),
                &self.prompts,
            )
        };
        let enrichment = enricher.run(web_query, video_query, topic).await;

        resource.web_results = enrichment.web_results;
        resource.youtube_results = enrichment.youtube_results;
        if enrichment.problem_set.is_programming_topic {
            resource.leetcode_problem = enrichment.problem_set;
        }
    }
}

#[async_trait]
impl ResourceService for Orchestrator {
    #[instrument(name = "generate", skip_all, fields(topic = %request.topic(), tier))]
    async fn generate(&self, request: &GenerateRequest) -> GenerationOutcome {
        let topic = request.topic();

        let generated = match self.primary_attempt(request).await {
            Ok(resource) => Some((GenerationTier::Primary, resource)),
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "Primary generation exhausted, trying fallback");
                match self.fallback_attempt(request).await {
                    Ok(resource) => Some((GenerationTier::Fallback, resource)),
                    Err(e) => {
                        error!(kind = e.kind(), error = %e, "Fallback generation exhausted");
                        None
                    }
                }
            }
        };

        let Some((tier, mut resource)) = generated else {
            tracing::Span::current().record("tier", GenerationTier::Minimal.as_str());
            info!("Returning minimal resource");
            return GenerationOutcome {
                tier: GenerationTier::Minimal,
                resource: minimal_resource(topic),
            };
        };
        tracing::Span::current().record("tier", tier.as_str());

        self.enrich(&mut resource, topic).await;
        postprocess(&mut resource, topic);

        info!(
            subtopics = resource.subtopics.len(),
            web = resource.web_results.len(),
            videos = resource.youtube_results.len(),
            "Resource generated"
        );
        GenerationOutcome { tier, resource }
    }
}

fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}

/// Final fix-ups applied to every generated resource, in order.
pub fn postprocess(resource: &mut LearningResource, topic: &str) {
    pad_misconceptions(&mut resource.common_misconceptions, topic);

    if resource.subtopics.is_empty() {
        resource.subtopics = default_subtopics(topic);
    }

    let problems = std::mem::take(&mut resource.leetcode_problem);
    resource.leetcode_problem = normalize_problem_set(problems, topic);

    resource.define.sort_by_key(|line| line.line_number);
    for subtopic in &mut resource.subtopics {
        subtopic.example_lines.sort_by_key(|line| line.line_number);
    }

    repair_resource(resource);
}
