pub mod claude;
pub mod ollama;
pub mod openai;

use std::time::Duration;

use lexis_core::config::{LlmConfig, OllamaConfig};

use crate::provider::{LlmError, LlmProvider};

/// Model name used when no explicit model is configured.
pub fn default_model(llm_config: &LlmConfig, ollama_config: &OllamaConfig) -> String {
    match llm_config.provider.as_str() {
        "openai" => llm_config.openai_model.clone(),
        "anthropic" | "claude" => llm_config.anthropic_model.clone(),
        _ => ollama_config.model.clone(),
    }
}

fn http_client(timeout_secs: Option<u64>) -> Result<reqwest::Client, LlmError> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// Create the appropriate LLM provider based on config, talking to `model`.
pub fn create_provider(
    llm_config: &LlmConfig,
    ollama_config: &OllamaConfig,
    model: &str,
) -> Result<Box<dyn LlmProvider>, LlmError> {
    let client = http_client(llm_config.request_timeout_secs)?;
    let temperature = llm_config.temperature;

    match llm_config.provider.as_str() {
        "openai" => {
            let api_key = llm_config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            let base_url = llm_config
                .openai_base_url
                .as_deref()
                .unwrap_or("https://api.openai.com");
            Ok(Box::new(openai::OpenAiProvider::new(
                client,
                api_key.clone(),
                model.to_string(),
                base_url.to_string(),
                temperature,
            )))
        }
        "anthropic" | "claude" => {
            let api_key = llm_config
                .anthropic_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("ANTHROPIC_API_KEY not set".into()))?;
            Ok(Box::new(claude::ClaudeProvider::new(
                client,
                api_key.clone(),
                model.to_string(),
                temperature,
            )))
        }
        "ollama" => Ok(Box::new(ollama::OllamaProvider::new(
            client,
            ollama_config.url.clone(),
            model.to_string(),
            temperature,
        ))),
        other => Err(LlmError::NotConfigured(format!(
            "unknown LLM provider: '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_follows_provider() {
        let ollama = OllamaConfig::default();
        let mut llm = LlmConfig::default();
        assert_eq!(default_model(&llm, &ollama), "llama3.2");
        llm.provider = "openai".into();
        assert_eq!(default_model(&llm, &ollama), llm.openai_model);
    }

    #[test]
    fn missing_api_key_is_not_configured() {
        let llm = LlmConfig {
            provider: "anthropic".into(),
            anthropic_api_key: None,
            ..LlmConfig::default()
        };
        let err = create_provider(&llm, &OllamaConfig::default(), "x").err().unwrap();
        assert!(matches!(err, LlmError::NotConfigured(_)));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let llm = LlmConfig {
            provider: "gemini".into(),
            ..LlmConfig::default()
        };
        assert!(create_provider(&llm, &OllamaConfig::default(), "x").is_err());
    }

    #[test]
    fn ollama_provider_uses_requested_model() {
        let llm = LlmConfig {
            request_timeout_secs: Some(5),
            ..LlmConfig::default()
        };
        let provider = create_provider(&llm, &OllamaConfig::default(), "qwen2.5").unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.model(), "qwen2.5");
    }
}
