pub mod defaults;
pub mod enrichment;
pub mod error;
pub mod html;
pub mod llm_client;
pub mod orchestrator;
pub mod prompts;
pub mod resource;
pub mod retry;
pub mod schema;
pub mod search;
pub mod suggest;

#[cfg(test)]
mod test_support;
