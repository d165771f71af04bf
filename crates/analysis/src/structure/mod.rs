//! Heuristic structure detection: titles from styled spans, numbered section
//! headers from text, and keywords from word frequencies.
//!
//! Each heuristic is a pure function over plain inputs; [`StructureDetector`]
//! runs them over a [`Document`], skipping pages whose layout is unavailable.

mod keywords;
mod sections;
mod titles;

pub use keywords::{extract_keywords, Keyword};
pub use sections::{detect_sections, Section};
pub use titles::{detect_titles, Title, TitleRule};

use lexis_core::Document;
use serde::Serialize;
use tracing::{debug, warn};

use crate::frequency::FrequencyAnalyzer;
use crate::normalize::normalize_lines;

#[derive(Debug, Clone, Default, Serialize)]
pub struct StructureReport {
    pub titles: Vec<Title>,
    pub sections: Vec<Section>,
    pub keywords: Vec<Keyword>,
}

pub struct StructureDetector<'a> {
    analyzer: &'a FrequencyAnalyzer,
    title_rule: TitleRule,
}

impl<'a> StructureDetector<'a> {
    pub fn new(analyzer: &'a FrequencyAnalyzer, title_rule: TitleRule) -> Self {
        Self {
            analyzer,
            title_rule,
        }
    }

    /// Titles in page order, then span order. Pages without layout data are
    /// logged and skipped.
    pub fn detect_titles(&self, doc: &Document) -> Vec<Title> {
        let mut titles = Vec::new();
        for page in &doc.pages {
            match &page.spans {
                Some(spans) => titles.extend(detect_titles(page.number, spans, &self.title_rule)),
                None => warn!(
                    page = page.number,
                    reason = page.error.as_deref().unwrap_or("no layout data"),
                    "skipping page in title detection"
                ),
            }
        }
        debug!(count = titles.len(), "titles detected");
        titles
    }

    /// Section headers over the whole document. Failed pages contribute only
    /// their placeholder line, which never matches.
    pub fn detect_sections(&self, doc: &Document) -> Vec<Section> {
        let text = normalize_lines(&doc.full_text());
        let sections = detect_sections(&text);
        debug!(count = sections.len(), "sections detected");
        sections
    }

    pub fn extract_keywords(&self, doc: &Document, n: usize) -> Vec<Keyword> {
        extract_keywords(self.analyzer, &doc.full_text(), n)
    }

    pub fn detect(&self, doc: &Document, keyword_count: usize) -> StructureReport {
        StructureReport {
            titles: self.detect_titles(doc),
            sections: self.detect_sections(doc),
            keywords: self.extract_keywords(doc, keyword_count),
        }
    }
}
