//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the shared service
//! handles every handler needs.

use crate::config::Config;
use anyhow::Context;
use learnpath_core::{
    llm_client::{OpenAICompatibleGenerator, StructuredGenerator},
    orchestrator::{Orchestrator, OrchestratorSettings, ResourceService},
    prompts::PromptLibrary,
    retry::RetryPolicy,
    search::{GoogleCustomSearch, YouTubeSearch, http_client},
    suggest::{GoogleSuggest, SuggestionProvider, suggest_retry_policy},
};
use std::sync::Arc;
use tracing::info;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub resources: Arc<dyn ResourceService>,
    pub suggestions: Arc<dyn SuggestionProvider>,
    pub suggest_policy: RetryPolicy,
}

impl AppState {
    /// Wires the production clients described by `config`.
    ///
    /// Fails when the prompt templates cannot be loaded or the HTTP client
    /// cannot be built, so misconfiguration surfaces at startup.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let prompts = PromptLibrary::load(&config.prompts_path)
            .context("Failed to load prompt templates")?;

        let ai_config = config.ai_client_config();
        let primary = OpenAICompatibleGenerator::new(ai_config.clone(), config.chat_model.clone());
        info!(model = %primary.model(), "Using chat model");
        let generator: Arc<dyn StructuredGenerator> = Arc::new(primary);

        let http = http_client(config.search_timeout).context("Failed to build HTTP client")?;
        let web = Arc::new(GoogleCustomSearch::new(
            http.clone(),
            config.google_search_api_key.clone(),
            config.google_search_engine_id.clone(),
        ));
        let video = Arc::new(YouTubeSearch::new(http.clone(), config.youtube_api_key.clone()));

        let settings = OrchestratorSettings {
            search_timeout: config.search_timeout,
            ..OrchestratorSettings::default()
        };
        let mut orchestrator =
            Orchestrator::new(generator, web, video, Arc::new(prompts)).with_settings(settings);
        if config.fallback_model != config.chat_model {
            let fallback = OpenAICompatibleGenerator::new(ai_config, config.fallback_model.clone());
            info!(model = %fallback.model(), "Using a dedicated fallback model");
            orchestrator = orchestrator.with_fallback_generator(Arc::new(fallback));
        }

        Ok(Self {
            resources: Arc::new(orchestrator),
            suggestions: Arc::new(GoogleSuggest::new(http)),
            suggest_policy: suggest_retry_policy(),
        })
    }
}
