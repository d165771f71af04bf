//! The summarization model as a scoped resource.
//!
//! A [`SummaryModel`] is created unloaded, loaded once (falling back to a
//! secondary model when the primary cannot be reached), used for every request
//! of a run and unloaded when the run ends.

use lexis_core::config::{LlmConfig, OllamaConfig};
use tracing::{debug, error, info, warn};

use crate::provider::{GenerationRequest, LlmError, LlmProvider};
use crate::providers::{create_provider, default_model};

/// Builds a provider for a model name.
pub type ProviderFactory =
    Box<dyn Fn(&str) -> Result<Box<dyn LlmProvider>, LlmError> + Send + Sync>;

pub struct SummaryModel {
    primary: String,
    fallback: Option<String>,
    factory: ProviderFactory,
    provider: Option<Box<dyn LlmProvider>>,
}

impl SummaryModel {
    pub fn new(primary: impl Into<String>, fallback: Option<String>, factory: ProviderFactory) -> Self {
        Self {
            primary: primary.into(),
            fallback,
            factory,
            provider: None,
        }
    }

    /// Model backed by the configured HTTP provider.
    pub fn from_config(llm_config: &LlmConfig, ollama_config: &OllamaConfig) -> Self {
        let primary = llm_config
            .model
            .clone()
            .unwrap_or_else(|| default_model(llm_config, ollama_config));
        let llm = llm_config.clone();
        let ollama = ollama_config.clone();
        Self::new(
            primary,
            llm_config.fallback_model.clone(),
            Box::new(move |model: &str| create_provider(&llm, &ollama, model)),
        )
    }

    pub fn is_loaded(&self) -> bool {
        self.provider.is_some()
    }

    /// Name of the loaded model, if any.
    pub fn loaded_model(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.model())
    }

    async fn try_load(&self, model: &str) -> Result<Box<dyn LlmProvider>, LlmError> {
        let provider = (self.factory)(model)?;
        provider.health_check().await?;
        Ok(provider)
    }

    /// Load the primary model, or the fallback model if that fails.
    /// Loading an already loaded model is a no-op.
    pub async fn load(&mut self) -> Result<(), LlmError> {
        if self.is_loaded() {
            return Ok(());
        }
        info!(model = %self.primary, "loading model");

        let provider = match self.try_load(&self.primary).await {
            Ok(provider) => provider,
            Err(e) => {
                error!(model = %self.primary, error = %e, "failed to load model");
                let Some(fallback) = self.fallback.clone() else {
                    return Err(e);
                };
                warn!(model = %fallback, "trying fallback model");
                self.try_load(&fallback).await?
            }
        };

        info!(provider = provider.name(), model = provider.model(), "model loaded");
        self.provider = Some(provider);
        Ok(())
    }

    /// Run one generation request against the loaded model.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let provider = self.provider.as_ref().ok_or(LlmError::NotLoaded)?;
        debug!(
            prompt_chars = request.prompt.chars().count(),
            min = request.min_length,
            max = request.max_length,
            deterministic = request.deterministic,
            "generating"
        );
        let text = provider.generate(request).await?;
        debug!(chars = text.chars().count(), "generated");
        Ok(text)
    }

    /// Release the model. Safe to call more than once.
    pub fn unload(&mut self) {
        if let Some(provider) = self.provider.take() {
            info!(model = provider.model(), "model unloaded");
        }
    }
}

impl Drop for SummaryModel {
    fn drop(&mut self) {
        if self.is_loaded() {
            warn!("model dropped while still loaded");
            self.unload();
        }
    }
}
