use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::LexisError;

/// Text inserted in place of a page whose text could not be extracted.
pub fn page_placeholder(page_number: usize) -> String {
    format!("[page {page_number}: text could not be extracted]")
}

/// Input format of a loaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
}

impl FileType {
    /// Resolve a file type from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(FileType::Pdf),
            "txt" | "text" => Some(FileType::Text),
            "md" | "markdown" => Some(FileType::Markdown),
            _ => None,
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileType::Pdf => write!(f, "pdf"),
            FileType::Text => write!(f, "txt"),
            FileType::Markdown => write!(f, "md"),
        }
    }
}

/// A run of text with uniform styling, as reported by the layout backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
    pub font_size: f32,
    pub bold: bool,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, font_size: f32, bold: bool) -> Self {
        Self {
            text: text.into(),
            font_size,
            bold,
        }
    }
}

/// Encoding of an embedded image stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Jpeg2000,
    /// Uncompressed or Flate-compressed pixel data, exported as PNG.
    Raw,
    /// Encodings that are counted but never exported (CCITT fax, JBIG2).
    Unsupported,
}

impl ImageFormat {
    /// Extension of the exported file. `None` for images that are skipped.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            ImageFormat::Jpeg => Some("jpg"),
            ImageFormat::Jpeg2000 => Some("jp2"),
            ImageFormat::Raw => Some("png"),
            ImageFormat::Unsupported => None,
        }
    }
}

/// Metadata of one image embedded in a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInfo {
    /// 1-based page number.
    pub page_number: usize,
    /// 1-based position of the image on its page.
    pub index: usize,
    pub width: i64,
    pub height: i64,
    pub format: ImageFormat,
}

/// One page of an extracted document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    /// Plain text, or a placeholder when extraction failed.
    pub text: String,
    /// Styled spans in layout order. `None` when layout extraction failed
    /// for this page.
    pub spans: Option<Vec<TextSpan>>,
    pub images: Vec<ImageInfo>,
    /// Reason text extraction failed, if it did.
    pub error: Option<String>,
}

impl Page {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            spans: Some(Vec::new()),
            images: Vec::new(),
            error: None,
        }
    }

    /// A page whose text could not be read.
    pub fn failed(number: usize, reason: impl Into<String>) -> Self {
        Self {
            number,
            text: page_placeholder(number),
            spans: None,
            images: Vec::new(),
            error: Some(reason.into()),
        }
    }

    pub fn with_spans(mut self, spans: Vec<TextSpan>) -> Self {
        self.spans = Some(spans);
        self
    }
}

/// An extracted document: an ordered, immutable sequence of pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub path: PathBuf,
    pub file_type: FileType,
    pub file_size: u64,
    pub pages: Vec<Page>,
}

impl Document {
    /// All page texts joined in page order.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Pages whose text had to be replaced by a placeholder.
    pub fn failed_pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().filter(|p| p.error.is_some())
    }

    /// Per-page extraction failures, in page order.
    pub fn page_errors(&self) -> impl Iterator<Item = LexisError> + '_ {
        self.failed_pages().map(|p| LexisError::PageExtraction {
            page: p.number,
            reason: p.error.clone().unwrap_or_default(),
        })
    }

    /// Image metadata of every page, in page order.
    pub fn images(&self) -> impl Iterator<Item = &ImageInfo> {
        self.pages.iter().flat_map(|p| p.images.iter())
    }

    /// Images that will be written out on export.
    pub fn exportable_images(&self) -> usize {
        self.images().filter(|i| i.format.extension().is_some()).count()
    }
}
