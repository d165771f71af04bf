use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::provider::{GenerationRequest, LlmError, LlmProvider};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

pub struct ClaudeProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
}

impl ClaudeProvider {
    pub fn new(client: reqwest::Client, api_key: String, model: String, temperature: f32) -> Self {
        Self {
            client,
            api_key,
            model,
            temperature,
        }
    }
}

#[async_trait]
impl LlmProvider for ClaudeProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let temperature = if request.deterministic {
            0.0
        } else {
            self.temperature
        };
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": request.prompt }],
            "temperature": temperature,
            "max_tokens": request.max_length,
        });

        debug!("Claude request to {}", MESSAGES_URL);

        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
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
        let content = resp["content"][0]["text"]
            .as_str()
            .ok_or_else(|| LlmError::ParseError("missing content[0].text".into()))?
            .trim()
            .to_string();

        Ok(content)
    }
}
