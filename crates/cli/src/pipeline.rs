//! The analysis run, step by step: load, statistics, structure, images,
//! summary. Every step finishes before the next one starts.

use std::path::{Path, PathBuf};

use lexis_analysis::structure::TitleRule;
use lexis_analysis::{
    analyze_document, DocumentStats, FrequencyAnalyzer, StopwordSet, StructureDetector,
    StructureReport, TokenizerOptions,
};
use lexis_core::{Config, Document, FileType, LexisError};
use lexis_ingest::{default_output_dir, extract_images, load_document};
use lexis_llm::{Summarizer, SummaryModel, SummaryOutcome};
use tracing::info;

pub struct Analysis {
    pub document: Document,
    pub stats: DocumentStats,
    /// `None` when structure detection was skipped.
    pub structure: Option<StructureReport>,
}

#[derive(Debug, Clone)]
pub struct ImageExport {
    pub output_dir: PathBuf,
    pub paths: Vec<PathBuf>,
    /// Image objects found while loading, including skipped ones.
    pub found: usize,
}

pub fn build_analyzer(config: &Config) -> Result<FrequencyAnalyzer, LexisError> {
    let analysis = &config.analysis;
    let stopwords = StopwordSet::load_or_default(analysis.stopwords_path.as_deref())?;
    let options = TokenizerOptions {
        keep_numbers: analysis.keep_numbers,
        advanced_clean: analysis.advanced_clean,
        fold_accents: analysis.fold_accents,
    };
    Ok(FrequencyAnalyzer::new(stopwords, options).with_min_token_len(analysis.min_token_len))
}

/// Load `path` and compute statistics and, unless skipped, structure.
pub fn analyze(path: &Path, config: &Config) -> Result<Analysis, LexisError> {
    info!(file = %path.display(), "starting analysis");
    let document = load_document(path)?;
    let analyzer = build_analyzer(config)?;
    let analysis = &config.analysis;

    let stats = analyze_document(&document, &analyzer, analysis.word_count_mode, analysis.top_n);

    let structure = if analysis.skip_structure {
        info!("structure detection skipped");
        None
    } else {
        let rule = TitleRule {
            font_size_threshold: analysis.title_font_threshold,
            max_words: analysis.title_max_words,
        };
        let report = StructureDetector::new(&analyzer, rule).detect(&document, analysis.top_n);
        info!(
            titles = report.titles.len(),
            sections = report.sections.len(),
            "structure detected"
        );
        Some(report)
    };

    Ok(Analysis {
        document,
        stats,
        structure,
    })
}

/// Export embedded images of a PDF. Other formats have none.
pub fn export_images(doc: &Document, output_dir: Option<&Path>) -> Result<Option<ImageExport>, LexisError> {
    if doc.file_type != FileType::Pdf {
        return Ok(None);
    }
    let output_dir = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_dir(&doc.path));
    info!(dir = %output_dir.display(), "starting image extraction");

    let paths = extract_images(&doc.path, &output_dir)?;
    let found = doc.images().count();
    Ok(Some(ImageExport {
        output_dir,
        paths,
        found,
    }))
}

/// Load the model, summarize `text` and release the model again.
pub async fn summarize(text: &str, config: &Config) -> Result<SummaryOutcome, LexisError> {
    let model = SummaryModel::from_config(&config.llm, &config.ollama);
    let mut summarizer = Summarizer::new(model, config.summary.clone());
    summarizer.load().await?;
    Ok(summarizer.summarize_and_release(text).await?)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn analyzes_markdown_document() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "notas.md",
            "# Relatório Anual\n\n1. Introdução geral\n\nEste projeto de pesquisa avançou. \
             O projeto cresceu e a pesquisa continua.\n",
        );

        let analysis = analyze(&path, &Config::default()).unwrap();

        assert_eq!(analysis.stats.page_count, 1);
        assert_eq!(analysis.stats.file_name, "notas.md");
        assert!(analysis.stats.word_count > 0);
        assert!(analysis.stats.vocabulary_size <= analysis.stats.word_count);

        let structure = analysis.structure.unwrap();
        assert_eq!(structure.titles[0].text, "Relatório Anual");
        assert_eq!(structure.sections[0].number, "1.");
        assert_eq!(structure.sections[0].title, "Introdução geral");
        assert!(structure.keywords.iter().any(|k| k.word == "projeto"));
    }

    #[test]
    fn skip_structure_leaves_it_out() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "a.txt", "texto simples para contar");
        let mut config = Config::default();
        config.analysis.skip_structure = true;

        let analysis = analyze(&path, &config).unwrap();
        assert!(analysis.structure.is_none());
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = analyze(Path::new("sumiu.pdf"), &Config::default()).err().unwrap();
        assert!(matches!(err, LexisError::NotFound(_)));
        assert!(err.hint().is_some());
    }

    #[test]
    fn text_documents_have_no_images() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "a.txt", "texto");
        let doc = load_document(&path).unwrap();
        assert!(export_images(&doc, Some(tmp.path())).unwrap().is_none());
    }

    #[tokio::test]
    async fn unconfigured_provider_fails_to_load() {
        let mut config = Config::default();
        config.llm.provider = "openai".into();
        config.llm.openai_api_key = None;

        let err = summarize("texto", &config).await.unwrap_err();
        assert!(matches!(err, LexisError::ModelInvocation(_)));
    }
}
