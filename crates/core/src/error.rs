//! Classified failures for a single generation attempt.

use crate::prompts::PromptError;
use async_openai::error::OpenAIError;
use std::time::Duration;

/// Raised by the retry executor when an attempt loses its race against the timer.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("attempt timed out after {0:?}")]
pub struct TimedOut(pub Duration);

/// Why one attempt against the AI completion service failed.
///
/// Every variant is retryable within a tier and escalates to the next tier
/// once the retry budget is spent.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
    #[error("response does not conform to schema: {0}")]
    SchemaMismatch(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("model returned no content")]
    EmptyResponse,
    #[error("prompt error: {0}")]
    Prompt(String),
}

impl GenerationError {
    /// Short label used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Timeout(_) => "timeout",
            GenerationError::SchemaMismatch(_) => "schema_mismatch",
            GenerationError::Transport(_) => "transport",
            GenerationError::EmptyResponse => "empty_response",
            GenerationError::Prompt(_) => "prompt",
        }
    }
}

impl From<TimedOut> for GenerationError {
    fn from(err: TimedOut) -> Self {
        GenerationError::Timeout(err.0)
    }
}

impl From<OpenAIError> for GenerationError {
    fn from(err: OpenAIError) -> Self {
        GenerationError::Transport(err.to_string())
    }
}

impl From<PromptError> for GenerationError {
    fn from(err: PromptError) -> Self {
        GenerationError::Prompt(err.to_string())
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::SchemaMismatch(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_out_converts_to_timeout() {
        let err: GenerationError = TimedOut(Duration::from_secs(2)).into();
        assert!(matches!(err, GenerationError::Timeout(d) if d == Duration::from_secs(2)));
        assert_eq!(err.kind(), "timeout");
    }

    #[test]
    fn test_serde_error_is_schema_mismatch() {
        let serde_err = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let err: GenerationError = serde_err.into();
        assert_eq!(err.kind(), "schema_mismatch");
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            GenerationError::SchemaMismatch("missing field `topic`".into()).to_string(),
            "response does not conform to schema: missing field `topic`"
        );
        assert_eq!(
            GenerationError::EmptyResponse.to_string(),
            "model returned no content"
        );
    }
}
