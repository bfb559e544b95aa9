use async_openai::config::OpenAIConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1/";
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// The AI completion backends reachable through the OpenAI-compatible API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    Gemini,
}

impl Provider {
    fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAI => "gpt-4o",
            Provider::Gemini => "gemini-2.0-flash",
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub provider: Provider,
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub chat_model: String,
    /// Model used for the fallback tier; defaults to `chat_model`.
    pub fallback_model: String,
    pub google_search_api_key: Option<String>,
    pub google_search_engine_id: Option<String>,
    pub youtube_api_key: Option<String>,
    pub search_timeout: Duration,
    pub log_level: Level,
    pub prompts_path: PathBuf,
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let provider_str = std::env::var("AI_PROVIDER").unwrap_or_else(|_| "gemini".to_string());
        let provider = match provider_str.to_lowercase().as_str() {
            "gemini" => Provider::Gemini,
            "openai" => Provider::OpenAI,
            other => {
                return Err(ConfigError::InvalidValue(
                    "AI_PROVIDER".to_string(),
                    format!("'{}' is not one of 'gemini' or 'openai'", other),
                ));
            }
        };

        let openai_api_key = non_empty_var("OPENAI_API_KEY");
        let gemini_api_key = non_empty_var("GEMINI_API_KEY");

        let chat_model =
            non_empty_var("CHAT_MODEL").unwrap_or_else(|| provider.default_model().to_string());
        let fallback_model = non_empty_var("FALLBACK_MODEL").unwrap_or_else(|| chat_model.clone());

        let google_search_api_key = non_empty_var("GOOGLE_SEARCH_API_KEY");
        let google_search_engine_id = non_empty_var("GOOGLE_SEARCH_ENGINE_ID");
        let youtube_api_key = non_empty_var("YOUTUBE_API_KEY");

        let search_timeout = match non_empty_var("SEARCH_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "SEARCH_TIMEOUT_SECS".to_string(),
                        format!("'{}' is not a positive number of seconds", raw),
                    )
                })?,
            None => Duration::from_secs(15),
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let prompts_path = std::env::var("PROMPTS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./prompts"));

        match provider {
            Provider::OpenAI => {
                if openai_api_key.is_none() {
                    return Err(ConfigError::MissingVar(
                        "OPENAI_API_KEY must be set for 'openai' provider".to_string(),
                    ));
                }
            }
            Provider::Gemini => {
                if gemini_api_key.is_none() {
                    return Err(ConfigError::MissingVar(
                        "GEMINI_API_KEY must be set for 'gemini' provider".to_string(),
                    ));
                }
            }
        }

        Ok(Self {
            bind_address,
            provider,
            openai_api_key,
            gemini_api_key,
            chat_model,
            fallback_model,
            google_search_api_key,
            google_search_engine_id,
            youtube_api_key,
            search_timeout,
            log_level,
            prompts_path,
        })
    }

    /// Client configuration for the selected provider's OpenAI-compatible endpoint.
    pub fn ai_client_config(&self) -> OpenAIConfig {
        let (api_key, api_base) = match self.provider {
            Provider::OpenAI => (self.openai_api_key.as_deref(), OPENAI_API_BASE),
            Provider::Gemini => (self.gemini_api_key.as_deref(), GEMINI_API_BASE),
        };
        OpenAIConfig::new()
            .with_api_key(api_key.unwrap_or_default())
            .with_api_base(api_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tracing::Level;

    fn clear_env_vars() {
        unsafe {
            for var in [
                "BIND_ADDRESS",
                "AI_PROVIDER",
                "OPENAI_API_KEY",
                "GEMINI_API_KEY",
                "CHAT_MODEL",
                "FALLBACK_MODEL",
                "GOOGLE_SEARCH_API_KEY",
                "GOOGLE_SEARCH_ENGINE_ID",
                "YOUTUBE_API_KEY",
                "SEARCH_TIMEOUT_SECS",
                "RUST_LOG",
                "PROMPTS_PATH",
            ] {
                env::remove_var(var);
            }
        }
    }

    fn set_minimal_env_gemini() {
        unsafe {
            env::set_var("GEMINI_API_KEY", "test-gemini-key");
        }
    }

    #[test]
    fn test_config_error_display() {
        let missing_var = ConfigError::MissingVar("TEST_VAR".to_string());
        assert_eq!(
            format!("{}", missing_var),
            "Missing environment variable: TEST_VAR"
        );

        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env_minimal_gemini() {
        clear_env_vars();
        set_minimal_env_gemini();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
        assert_eq!(config.provider, Provider::Gemini);
        assert_eq!(config.gemini_api_key, Some("test-gemini-key".to_string()));
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.chat_model, "gemini-2.0-flash");
        assert_eq!(config.fallback_model, "gemini-2.0-flash");
        assert_eq!(config.google_search_api_key, None);
        assert_eq!(config.youtube_api_key, None);
        assert_eq!(config.search_timeout, Duration::from_secs(15));
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.prompts_path, PathBuf::from("./prompts"));
    }

    #[test]
    #[serial]
    fn test_config_from_env_openai_provider() {
        clear_env_vars();
        unsafe {
            env::set_var("AI_PROVIDER", "OpenAI");
            env::set_var("OPENAI_API_KEY", "test-openai-key");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.provider, Provider::OpenAI);
        assert_eq!(config.chat_model, "gpt-4o");
        assert_eq!(config.openai_api_key, Some("test-openai-key".to_string()));
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "127.0.0.1:8080");
            env::set_var("AI_PROVIDER", "gemini");
            env::set_var("GEMINI_API_KEY", "custom-gemini-key");
            env::set_var("CHAT_MODEL", "gemini-1.5-pro");
            env::set_var("FALLBACK_MODEL", "gemini-1.5-flash");
            env::set_var("GOOGLE_SEARCH_API_KEY", "search-key");
            env::set_var("GOOGLE_SEARCH_ENGINE_ID", "engine-id");
            env::set_var("YOUTUBE_API_KEY", "yt-key");
            env::set_var("SEARCH_TIMEOUT_SECS", "5");
            env::set_var("RUST_LOG", "debug");
            env::set_var("PROMPTS_PATH", "/custom/prompts");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.chat_model, "gemini-1.5-pro");
        assert_eq!(config.fallback_model, "gemini-1.5-flash");
        assert_eq!(config.google_search_api_key, Some("search-key".to_string()));
        assert_eq!(config.google_search_engine_id, Some("engine-id".to_string()));
        assert_eq!(config.youtube_api_key, Some("yt-key".to_string()));
        assert_eq!(config.search_timeout, Duration::from_secs(5));
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.prompts_path, PathBuf::from("/custom/prompts"));
    }

    #[test]
    #[serial]
    fn test_config_blank_keys_are_unset() {
        clear_env_vars();
        set_minimal_env_gemini();
        unsafe {
            env::set_var("YOUTUBE_API_KEY", "  ");
        }

        let config = Config::from_env().expect("Config should load successfully");
        assert_eq!(config.youtube_api_key, None);
    }

    #[test]
    #[serial]
    fn test_config_invalid_bind_address() {
        clear_env_vars();
        set_minimal_env_gemini();
        unsafe {
            env::set_var("BIND_ADDRESS", "not-a-valid-address");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "BIND_ADDRESS"),
            _ => panic!("Expected InvalidValue for BIND_ADDRESS"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_provider() {
        clear_env_vars();
        set_minimal_env_gemini();
        unsafe {
            env::set_var("AI_PROVIDER", "anthropic-compatible");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "AI_PROVIDER"),
            _ => panic!("Expected InvalidValue for AI_PROVIDER"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_search_timeout() {
        clear_env_vars();
        set_minimal_env_gemini();
        unsafe {
            env::set_var("SEARCH_TIMEOUT_SECS", "0");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "SEARCH_TIMEOUT_SECS"),
            _ => panic!("Expected InvalidValue for SEARCH_TIMEOUT_SECS"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        set_minimal_env_gemini();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
            _ => panic!("Expected InvalidValue for RUST_LOG"),
        }
    }

    #[test]
    #[serial]
    fn test_config_missing_gemini_key() {
        clear_env_vars();

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(msg) => {
                assert!(msg.contains("GEMINI_API_KEY"));
            }
            _ => panic!("Expected MissingVar for GEMINI_API_KEY"),
        }
    }

    #[test]
    #[serial]
    fn test_config_missing_openai_key() {
        clear_env_vars();
        unsafe {
            env::set_var("AI_PROVIDER", "openai");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(msg) => {
                assert!(msg.contains("OPENAI_API_KEY"));
            }
            _ => panic!("Expected MissingVar for OPENAI_API_KEY"),
        }
    }
}
