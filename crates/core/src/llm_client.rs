use crate::error::GenerationError;
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat, ResponseFormatJsonSchema,
    },
};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// A single schema-constrained generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRequest {
    /// Identifier of the target schema, reported to the model.
    pub name: String,
    pub prompt: String,
    /// JSON Schema document the response must conform to.
    pub schema: Value,
}

/// A client for an AI completion service that returns structured objects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    /// Asks the model for a JSON object shaped by `request.schema`.
    ///
    /// Returns the raw object; conformance to the schema is checked by the caller.
    async fn generate_object(&self, request: &SchemaRequest) -> Result<Value, GenerationError>;
}

/// An implementation of `StructuredGenerator` for any OpenAI-compatible API.
pub struct OpenAICompatibleGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleGenerator {
    /// Creates a new generator for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `model` - The model identifier to use for chat completions (e.g., "gemini-2.0-flash").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl StructuredGenerator for OpenAICompatibleGenerator {
    async fn generate_object(&self, request: &SchemaRequest) -> Result<Value, GenerationError> {
        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(
                        "You are an expert educator. Respond only with a JSON object that \
                         matches the requested schema.",
                    )
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(request.prompt.as_str())
                    .build()?
                    .into(),
            ])
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: None,
                    name: request.name.clone(),
                    schema: Some(request.schema.clone()),
                    strict: Some(false),
                },
            })
            .build()?;

        debug!(model = %self.model, schema = %request.name, "Requesting structured generation");
        let response = self.client.chat().create(chat_request).await?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or(GenerationError::EmptyResponse)?;

        parse_json_content(content)
    }
}

/// Parses a model reply into JSON, tolerating a surrounding markdown code fence.
pub fn parse_json_content(content: &str) -> Result<Value, GenerationError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);

    Ok(serde_json::from_str(unfenced.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generator_reports_its_model() {
        let generator = OpenAICompatibleGenerator::new(OpenAIConfig::new(), "gemini-2.0-flash".into());
        assert_eq!(generator.model(), "gemini-2.0-flash");
    }

    #[test]
    fn test_parse_plain_json() {
        let value = parse_json_content(r#"{"topic": "Heaps"}"#).unwrap();
        assert_eq!(value, json!({"topic": "Heaps"}));
    }

    #[test]
    fn test_parse_fenced_json() {
        let value = parse_json_content("```json\n{\"topic\": \"Heaps\"}\n```").unwrap();
        assert_eq!(value["topic"], "Heaps");

        let value = parse_json_content("```\n[1, 2]\n```").unwrap();
        assert_eq!(value, json!([1, 2]));
    }

    #[test]
    fn test_parse_garbage_is_schema_mismatch() {
        let err = parse_json_content("Sure! Here is your plan.").unwrap_err();
        assert!(matches!(err, GenerationError::SchemaMismatch(_)));
    }

    #[test]
    fn test_parse_empty_is_empty_response() {
        assert!(matches!(
            parse_json_content("   "),
            Err(GenerationError::EmptyResponse)
        ));
    }
}
