use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LexisError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid or corrupt document: {0}")]
    InvalidDocument(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Failed to extract page {page}: {reason}")]
    PageExtraction { page: usize, reason: String },

    #[error("Out of memory while processing document: {0}")]
    ResourceExhausted(String),

    #[error("Model not loaded: {0}")]
    ModelUnavailable(String),

    #[error("Model invocation failed: {0}")]
    ModelInvocation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LexisError {
    /// Short, user-facing hint for the CLI. `None` means the error message
    /// speaks for itself.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            LexisError::NotFound(_) => Some("check the path and try again"),
            LexisError::InvalidDocument(_) => {
                Some("the file could not be opened; it may be damaged or password protected")
            }
            LexisError::PageExtraction { .. } => {
                Some("the page was replaced by a placeholder; the rest of the document was analyzed")
            }
            LexisError::ResourceExhausted(_) => {
                Some("try splitting the document into smaller files")
            }
            LexisError::ModelUnavailable(_) => Some("the model must be loaded before summarizing"),
            LexisError::ModelInvocation(_) => {
                Some("analysis results are still valid; rerun with --no-summary to skip the model")
            }
            _ => None,
        }
    }
}
