pub mod model;
pub mod provider;
pub mod providers;
pub mod summarize;

pub use model::{ProviderFactory, SummaryModel};
pub use provider::{GenerationRequest, LlmError, LlmProvider};
pub use providers::create_provider;
pub use summarize::{SummaryOutcome, SummaryPath, Summarizer};
