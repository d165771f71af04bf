use async_trait::async_trait;
use lexis_core::LexisError;
use serde::{Deserialize, Serialize};

/// One text-generation request.
///
/// Lengths are in model tokens. HTTP backends can only enforce the upper
/// bound; `min_length` is forwarded where the backend has a knob for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_length: u32,
    pub min_length: u32,
    /// Disable sampling so repeated runs give the same output.
    pub deterministic: bool,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, min_length: u32, max_length: u32) -> Self {
        Self {
            prompt: prompt.into(),
            max_length,
            min_length,
            deterministic: false,
        }
    }

    pub fn deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }
}

/// Trait for text-generation backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Backend name for logs ("ollama", "openai", ...).
    fn name(&self) -> &str;

    /// Model this provider talks to.
    fn model(&self) -> &str;

    /// Check that the model is reachable before the first request.
    async fn health_check(&self) -> Result<(), LlmError> {
        Ok(())
    }

    /// Generate text for `request` and return it.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    HttpError(reqwest::Error),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("API error: {status}: {body}")]
    ApiError { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    ParseError(String),
    #[error("provider not configured: {0}")]
    NotConfigured(String),
    #[error("model is not loaded; call load() first")]
    NotLoaded,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout(e.to_string())
        } else {
            LlmError::HttpError(e)
        }
    }
}

impl From<LlmError> for LexisError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::NotLoaded => LexisError::ModelUnavailable(LlmError::NotLoaded.to_string()),
            other => LexisError::ModelInvocation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_loaded_maps_to_model_unavailable() {
        let err: LexisError = LlmError::NotLoaded.into();
        assert!(matches!(err, LexisError::ModelUnavailable(_)));
    }

    #[test]
    fn api_error_maps_to_model_invocation() {
        let err: LexisError = LlmError::ApiError {
            status: 500,
            body: "boom".into(),
        }
        .into();
        assert!(matches!(err, LexisError::ModelInvocation(msg) if msg.contains("boom")));
    }

    #[test]
    fn request_builder_defaults_to_sampling() {
        let req = GenerationRequest::new("resume", 30, 200);
        assert!(!req.deterministic);
        assert!(req.deterministic(true).deterministic);
    }
}
