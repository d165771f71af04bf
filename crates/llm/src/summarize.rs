//! Length-bounded summarization of arbitrarily long text.
//!
//! Short texts are summarized in one request. Long texts are split into
//! word-boundary chunks, the first few chunks are summarized one by one, and
//! a final consolidation request merges the partial summaries.

use lexis_analysis::ChunkSplitter;
use lexis_core::config::SummaryConfig;
use serde::Serialize;
use tracing::info;

use crate::model::SummaryModel;
use crate::provider::{GenerationRequest, LlmError};

pub const CHUNK_PROMPT: &str = "resume o seguinte texto em português: ";
pub const CONSOLIDATION_PROMPT: &str = "faça um resumo consolidado em português: ";

/// Which strategy produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "path", rename_all = "snake_case")]
pub enum SummaryPath {
    Direct,
    MapReduce {
        chunks_total: usize,
        chunks_used: usize,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryOutcome {
    pub summary: String,
    pub path: SummaryPath,
    /// Number of model requests issued.
    pub requests: usize,
}

pub struct Summarizer {
    model: SummaryModel,
    config: SummaryConfig,
}

impl Summarizer {
    pub fn new(model: SummaryModel, config: SummaryConfig) -> Self {
        Self { model, config }
    }

    pub fn model(&self) -> &SummaryModel {
        &self.model
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Load the underlying model. See [`SummaryModel::load`].
    pub async fn load(&mut self) -> Result<(), LlmError> {
        self.model.load().await
    }

    fn request(&self, prompt: String, min_length: u32, max_length: u32) -> GenerationRequest {
        GenerationRequest::new(prompt, min_length, max_length).deterministic(self.config.deterministic)
    }

    pub async fn summarize(&self, text: &str) -> Result<String, LlmError> {
        Ok(self.summarize_detailed(text).await?.summary)
    }

    /// Summarize `text` and report how the summary was produced.
    ///
    /// Requests are issued strictly one after another. A failed request
    /// aborts the whole summary; nothing is retried here.
    pub async fn summarize_detailed(&self, text: &str) -> Result<SummaryOutcome, LlmError> {
        if !self.model.is_loaded() {
            return Err(LlmError::NotLoaded);
        }
        info!("generating summary");

        let outcome = if text.chars().count() > self.config.long_text_threshold {
            self.map_reduce(text).await?
        } else {
            self.direct(text).await?
        };

        info!(requests = outcome.requests, "summary generated");
        Ok(outcome)
    }

    async fn direct(&self, text: &str) -> Result<SummaryOutcome, LlmError> {
        let head: String = text.chars().take(self.config.direct_max_chars).collect();
        let request = self.request(
            format!("{CHUNK_PROMPT}{head}"),
            self.config.direct_min,
            self.config.max_summary_length,
        );
        let summary = self.model.generate(&request).await?;
        Ok(SummaryOutcome {
            summary,
            path: SummaryPath::Direct,
            requests: 1,
        })
    }

    async fn map_reduce(&self, text: &str) -> Result<SummaryOutcome, LlmError> {
        let splitter = ChunkSplitter::new(text, self.config.chunk_max_length);
        let chunks_total = splitter.clone().count();
        // A zero cap would consolidate nothing; at least one chunk is summarized.
        let chunks_used = chunks_total.min(self.config.max_chunks_for_summary.max(1));
        info!(chunks = chunks_total, used = chunks_used, "long text, summarizing in chunks");
        if chunks_used < chunks_total {
            info!(
                dropped = chunks_total - chunks_used,
                "chunks beyond max_chunks_for_summary are not summarized"
            );
        }

        let mut partials = Vec::with_capacity(chunks_used);
        for chunk in splitter.take(chunks_used) {
            info!("summarizing chunk {}/{}", chunk.index + 1, chunks_used);
            let request = self.request(
                format!("{CHUNK_PROMPT}{}", chunk.content),
                self.config.chunk_summary_min,
                self.config.chunk_summary_max,
            );
            partials.push(self.model.generate(&request).await?);
        }

        let combined = partials.join(" ");
        let request = self.request(
            format!("{CONSOLIDATION_PROMPT}{combined}"),
            self.config.consolidation_min,
            self.config.max_summary_length,
        );
        let summary = self.model.generate(&request).await?;

        Ok(SummaryOutcome {
            summary,
            path: SummaryPath::MapReduce {
                chunks_total,
                chunks_used,
            },
            requests: chunks_used + 1,
        })
    }

    /// Summarize and unload the model afterwards, whether or not the
    /// summary succeeded.
    pub async fn summarize_and_release(&mut self, text: &str) -> Result<SummaryOutcome, LlmError> {
        let result = self.summarize_detailed(text).await;
        self.model.unload();
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::model::tests::MockProvider;
    use crate::provider::LlmProvider;

    struct Recorder {
        calls: Arc<AtomicUsize>,
        requests: Arc<Mutex<Vec<GenerationRequest>>>,
    }

    impl Recorder {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn requests(&self) -> Vec<GenerationRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    fn model(fail_on_call: Option<usize>) -> (SummaryModel, Recorder) {
        let calls = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorder = Recorder {
            calls: Arc::clone(&calls),
            requests: Arc::clone(&requests),
        };
        let model = SummaryModel::new(
            "mock",
            None,
            Box::new(move |name: &str| {
                let mut provider = MockProvider::new(name);
                provider.calls = Arc::clone(&calls);
                provider.requests = Arc::clone(&requests);
                provider.fail_on_call = fail_on_call;
                Ok(Box::new(provider) as Box<dyn LlmProvider>)
            }),
        );
        (model, recorder)
    }

    async fn loaded(config: SummaryConfig, fail_on_call: Option<usize>) -> (Summarizer, Recorder) {
        let (model, recorder) = model(fail_on_call);
        let mut summarizer = Summarizer::new(model, config);
        summarizer.load().await.unwrap();
        (summarizer, recorder)
    }

    fn words(n_chars: usize) -> String {
        let mut text = String::new();
        while text.len() < n_chars {
            text.push_str("palavra ");
        }
        text.truncate(n_chars);
        text
    }

    #[tokio::test]
    async fn long_text_takes_map_reduce_path() {
        let (summarizer, recorder) = loaded(SummaryConfig::default(), None).await;
        let text = words(3500);

        let outcome = summarizer.summarize_detailed(&text).await.unwrap();

        let SummaryPath::MapReduce { chunks_used, .. } = outcome.path else {
            panic!("expected map-reduce, got {:?}", outcome.path);
        };
        assert!(chunks_used <= 5);
        assert_eq!(recorder.calls(), chunks_used + 1);
        assert_eq!(outcome.requests, chunks_used + 1);

        let requests = recorder.requests();
        let last = requests.last().unwrap();
        assert!(last.prompt.starts_with(CONSOLIDATION_PROMPT));
        assert_eq!((last.min_length, last.max_length), (100, 500));
        for chunk_req in &requests[..requests.len() - 1] {
            assert!(chunk_req.prompt.starts_with(CHUNK_PROMPT));
            assert_eq!((chunk_req.min_length, chunk_req.max_length), (30, 200));
        }
    }

    #[tokio::test]
    async fn chunk_count_is_capped() {
        let (summarizer, recorder) = loaded(SummaryConfig::default(), None).await;
        let text = words(20_000);

        let outcome = summarizer.summarize_detailed(&text).await.unwrap();

        assert_eq!(
            outcome.path,
            SummaryPath::MapReduce {
                chunks_total: ChunkSplitter::new(&text, 1000).count(),
                chunks_used: 5,
            }
        );
        assert_eq!(recorder.calls(), 6);
    }

    #[tokio::test]
    async fn zero_cap_still_summarizes_first_chunk() {
        let config = SummaryConfig {
            max_chunks_for_summary: 0,
            ..SummaryConfig::default()
        };
        let (summarizer, recorder) = loaded(config, None).await;

        let outcome = summarizer.summarize_detailed(&words(4000)).await.unwrap();

        assert_eq!(
            outcome.path,
            SummaryPath::MapReduce {
                chunks_total: 4,
                chunks_used: 1,
            }
        );
        let requests = recorder.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].prompt.starts_with(CHUNK_PROMPT));
        assert!(requests[0].prompt.len() > CHUNK_PROMPT.len());
        assert!(requests[1].prompt.len() > CONSOLIDATION_PROMPT.len());
    }

    #[tokio::test]
    async fn consolidation_joins_partials_with_spaces() {
        let config = SummaryConfig {
            max_chunks_for_summary: 2,
            ..SummaryConfig::default()
        };
        let (summarizer, recorder) = loaded(config, None).await;

        let summary = summarizer.summarize(&words(5000)).await.unwrap();

        assert_eq!(summary, "resumo 3");
        let last = recorder.requests().pop().unwrap();
        assert_eq!(last.prompt, format!("{CONSOLIDATION_PROMPT}resumo 1 resumo 2"));
    }

    #[tokio::test]
    async fn short_text_is_truncated_and_summarized_once() {
        let config = SummaryConfig {
            direct_max_chars: 10,
            ..SummaryConfig::default()
        };
        let (summarizer, recorder) = loaded(config, None).await;

        let outcome = summarizer
            .summarize_detailed("ação rápida e eficaz do governo")
            .await
            .unwrap();

        assert_eq!(outcome.path, SummaryPath::Direct);
        assert_eq!(recorder.calls(), 1);
        let req = &recorder.requests()[0];
        assert_eq!(req.prompt, format!("{CHUNK_PROMPT}ação rápid"));
        assert_eq!((req.min_length, req.max_length), (50, 500));
    }

    #[tokio::test]
    async fn exactly_threshold_length_stays_direct() {
        let (summarizer, recorder) = loaded(SummaryConfig::default(), None).await;
        let outcome = summarizer.summarize_detailed(&words(3000)).await.unwrap();
        assert_eq!(outcome.path, SummaryPath::Direct);
        assert_eq!(recorder.calls(), 1);
        assert_eq!(
            recorder.requests()[0].prompt.chars().count(),
            CHUNK_PROMPT.chars().count() + 2000
        );
    }

    #[tokio::test]
    async fn deterministic_flag_reaches_every_request() {
        let config = SummaryConfig {
            deterministic: true,
            ..SummaryConfig::default()
        };
        let (summarizer, recorder) = loaded(config, None).await;

        summarizer.summarize(&words(4000)).await.unwrap();

        assert!(recorder.calls() > 1);
        assert!(recorder.requests().iter().all(|r| r.deterministic));
    }

    #[tokio::test]
    async fn summarizing_unloaded_model_fails() {
        let (model, recorder) = model(None);
        let summarizer = Summarizer::new(model, SummaryConfig::default());
        let err = summarizer.summarize("texto curto").await.unwrap_err();
        assert!(matches!(err, LlmError::NotLoaded));
        assert_eq!(recorder.calls(), 0);
    }

    #[tokio::test]
    async fn failure_propagates_without_retry() {
        let (summarizer, recorder) = loaded(SummaryConfig::default(), Some(2)).await;

        let err = summarizer.summarize(&words(5000)).await.unwrap_err();

        assert!(matches!(err, LlmError::ApiError { status: 500, .. }));
        assert_eq!(recorder.calls(), 2);
    }

    #[tokio::test]
    async fn release_unloads_on_success_and_failure() {
        let (mut ok, _) = loaded(SummaryConfig::default(), None).await;
        let outcome = ok.summarize_and_release("texto curto").await.unwrap();
        assert_eq!(outcome.summary, "resumo 1");
        assert!(!ok.model().is_loaded());

        let (mut failing, recorder) = loaded(SummaryConfig::default(), Some(1)).await;
        assert!(failing.summarize_and_release("texto curto").await.is_err());
        assert_eq!(recorder.calls(), 1);
        assert!(!failing.model().is_loaded());
    }
}
