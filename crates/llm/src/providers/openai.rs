use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::provider::{GenerationRequest, LlmError, LlmProvider};

/// OpenAI chat completions, or any server speaking the same API.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
}

impl OpenAiProvider {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        model: String,
        base_url: String,
        temperature: f32,
    ) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            temperature,
        }
    }

    fn body(&self, request: &GenerationRequest) -> serde_json::Value {
        let mut body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": request.prompt }],
            "temperature": if request.deterministic { 0.0 } else { self.temperature },
            "max_tokens": request.max_length,
        });
        if request.deterministic {
            body["seed"] = json!(0);
        }
        body
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        debug!("OpenAI request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&self.body(request))
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, body });
        }

        let resp: serde_json::Value = response.json().await?;
        let content = resp["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| LlmError::ParseError("missing choices[0].message.content".into()))?
            .trim()
            .to_string();

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_caps_tokens_and_pins_temperature() {
        let provider = OpenAiProvider::new(
            reqwest::Client::new(),
            "sk-test".into(),
            "gpt-4o-mini".into(),
            "https://api.openai.com/".into(),
            0.7,
        );
        let req = GenerationRequest::new("resume", 100, 500).deterministic(true);
        let body = provider.body(&req);
        assert_eq!(body["max_tokens"], json!(500));
        assert_eq!(body["temperature"], json!(0.0));
        assert_eq!(body["messages"][0]["content"], json!("resume"));
        assert_eq!(provider.base_url, "https://api.openai.com");
    }
}
