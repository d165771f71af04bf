pub mod chunker;
pub mod frequency;
pub mod normalize;
pub mod stats;
pub mod stopwords;
pub mod structure;
pub mod tokenize;

use std::path::PathBuf;

use thiserror::Error;

pub use chunker::{split_into_chunks, Chunk, ChunkSplitter};
pub use frequency::{FrequencyAnalyzer, FrequencyTable};
pub use normalize::normalize;
pub use stats::{analyze_document, DocumentStats};
pub use stopwords::StopwordSet;
pub use structure::{StructureDetector, StructureReport};
pub use tokenize::{tokenize, TokenizerOptions};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to load stopwords from {}: {reason}", path.display())]
    Stopwords { path: PathBuf, reason: String },
}

impl From<AnalysisError> for lexis_core::LexisError {
    fn from(e: AnalysisError) -> Self {
        lexis_core::LexisError::Config(e.to_string())
    }
}
