use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::provider::{GenerationRequest, LlmError, LlmProvider};

/// Fixed seed used together with temperature 0 for reproducible output.
const DETERMINISTIC_SEED: u64 = 42;

pub struct OllamaProvider {
    client: reqwest::Client,
    url: String,
    model: String,
    temperature: f32,
}

impl OllamaProvider {
    pub fn new(client: reqwest::Client, url: String, model: String, temperature: f32) -> Self {
        Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            model,
            temperature,
        }
    }

    fn options(&self, request: &GenerationRequest) -> serde_json::Value {
        let mut options = json!({
            "num_predict": request.max_length,
            "temperature": self.temperature,
        });
        if request.deterministic {
            options["temperature"] = json!(0.0);
            options["seed"] = json!(DETERMINISTIC_SEED);
        }
        options
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        let url = format!("{}/api/show", self.url);
        debug!("Ollama health check {} for {}", url, self.model);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "model": self.model }))
            .send()
            .await?;

        match response.status().as_u16() {
            200 => Ok(()),
            404 => Err(LlmError::NotConfigured(format!(
                "model '{}' is not available in Ollama",
                self.model
            ))),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(LlmError::ApiError { status, body })
            }
        }
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.url);

        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": request.prompt }],
            "stream": false,
            "options": self.options(request),
        });

        debug!("Ollama request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, body });
        }

        let resp: serde_json::Value = response.json().await?;
        let content = resp["message"]["content"]
            .as_str()
            .ok_or_else(|| LlmError::ParseError("missing message.content".into()))?
            .trim()
            .to_string();

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OllamaProvider {
        OllamaProvider::new(
            reqwest::Client::new(),
            "http://localhost:11434/".into(),
            "llama3.2".into(),
            0.7,
        )
    }

    #[test]
    fn trailing_slash_is_dropped() {
        assert_eq!(provider().url, "http://localhost:11434");
    }

    #[test]
    fn deterministic_requests_pin_temperature_and_seed() {
        let req = GenerationRequest::new("texto", 30, 200).deterministic(true);
        let options = provider().options(&req);
        assert_eq!(options["temperature"], json!(0.0));
        assert_eq!(options["seed"], json!(DETERMINISTIC_SEED));
        assert_eq!(options["num_predict"], json!(200));
    }

    #[test]
    fn sampling_requests_use_configured_temperature() {
        let req = GenerationRequest::new("texto", 30, 200);
        let options = provider().options(&req);
        assert!(options.get("seed").is_none());
        assert!((options["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }
}
