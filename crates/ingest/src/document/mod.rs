mod content;
pub mod layout;
mod md;
mod pdf;
mod txt;

pub(crate) use pdf::image_format;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use lexis_core::{Document, FileType, LexisError, Page};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF could not be opened: {0}")]
    InvalidPdf(String),
    #[error("Out of memory: {0}")]
    ResourceExhausted(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExtractionError> for LexisError {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::NotFound(path) => LexisError::NotFound(path),
            ExtractionError::UnsupportedType(ext) => LexisError::UnsupportedType(ext),
            ExtractionError::InvalidPdf(reason) => LexisError::InvalidDocument(reason),
            ExtractionError::ResourceExhausted(reason) => LexisError::ResourceExhausted(reason),
            ExtractionError::Io(e) => LexisError::Io(e),
        }
    }
}

/// Resolve the file type of `path` from its extension.
pub fn detect_file_type(path: &Path) -> Result<FileType, ExtractionError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    FileType::from_extension(&ext).ok_or(ExtractionError::UnsupportedType(ext))
}

/// Read a whole file, reporting allocation failure as resource exhaustion
/// instead of aborting.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, ExtractionError> {
    let mut file = File::open(path)?;
    let len = usize::try_from(file.metadata()?.len()).map_err(|_| {
        ExtractionError::ResourceExhausted(format!("{} is too large", path.display()))
    })?;
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(len)
        .map_err(|e| ExtractionError::ResourceExhausted(format!("{}: {e}", path.display())))?;
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Extract pages from file bytes based on file type.
pub fn extract_pages(bytes: &[u8], file_type: FileType) -> Result<Vec<Page>, ExtractionError> {
    match file_type {
        FileType::Pdf => pdf::extract_pdf(bytes),
        FileType::Text => Ok(txt::extract_txt(bytes)),
        FileType::Markdown => Ok(md::extract_md(bytes)),
    }
}

/// Load a document from disk. Per-page failures are recovered inside the
/// extractors; only whole-document failures are returned.
pub fn load_document(path: &Path) -> Result<Document, ExtractionError> {
    if !path.exists() {
        return Err(ExtractionError::NotFound(path.to_path_buf()));
    }
    let file_type = detect_file_type(path)?;
    let bytes = read_bytes(path)?;
    let pages = extract_pages(&bytes, file_type)?;

    let doc = Document {
        path: path.to_path_buf(),
        file_type,
        file_size: bytes.len() as u64,
        pages,
    };

    let failed = doc.failed_pages().count();
    if failed > 0 {
        warn!(failed, total = doc.page_count(), "some pages could not be extracted");
    }
    info!(
        path = %path.display(),
        pages = doc.page_count(),
        chars = doc.full_text().chars().count(),
        "document loaded"
    );
    Ok(doc)
}
