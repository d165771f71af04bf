use std::path::PathBuf;

use clap::Parser;
use lexis_core::config::WordCountMode;
use lexis_core::Config;

/// Analyze a document: lexical statistics, structure, embedded images and a
/// model-generated summary.
#[derive(Parser, Debug)]
#[command(
    name = "lexis",
    version,
    about = "Document analysis and summarization",
    after_help = "Examples:\n  lexis relatorio.pdf\n  lexis relatorio.pdf --output-dir ./figuras\n  lexis relatorio.pdf --no-summary --verbose\n  lexis notas.md --report notas-report.md"
)]
pub struct CliArgs {
    /// Document to analyze (.pdf, .txt or .md)
    pub file: PathBuf,

    /// Directory for extracted images (default: imagens/<file stem>/)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Model name override (uses the provider default if not set)
    #[arg(short, long)]
    pub model: Option<String>,

    /// LLM provider: ollama, openai or anthropic
    #[arg(long)]
    pub provider: Option<String>,

    /// Skip summary generation (analysis only)
    #[arg(long)]
    pub no_summary: bool,

    /// Skip image extraction
    #[arg(long)]
    pub no_images: bool,

    /// Write a Markdown report to this path
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Debug-level logs
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write debug-level logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Keep digits when tokenizing
    #[arg(long)]
    pub keep_numbers: bool,

    /// Count accented and unaccented spellings as the same word
    #[arg(long)]
    pub fold_accents: bool,

    /// Number of most common words to report
    #[arg(long)]
    pub top_n: Option<usize>,

    /// How words are counted: tokens or native
    #[arg(long)]
    pub word_count_mode: Option<WordCountMode>,

    /// Skip title, section and keyword detection
    #[arg(long)]
    pub skip_structure: bool,

    /// Disable sampling so summaries are reproducible
    #[arg(long)]
    pub deterministic: bool,

    /// Minimum length of the final summary, on both the direct and the
    /// chunked path (model tokens)
    #[arg(long)]
    pub min_summary_length: Option<u32>,

    /// Maximum summary length (model tokens)
    #[arg(long)]
    pub max_summary_length: Option<u32>,

    /// Maximum number of chunks summarized for long documents (at least 1)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_chunks: Option<u64>,
}

impl CliArgs {
    /// Apply command-line overrides on top of the environment config.
    /// Flags only ever switch features on; unset options leave the config as is.
    pub fn apply_overrides(&self, config: &mut Config) {
        let analysis = &mut config.analysis;
        analysis.keep_numbers |= self.keep_numbers;
        analysis.fold_accents |= self.fold_accents;
        analysis.skip_structure |= self.skip_structure;
        if let Some(n) = self.top_n {
            analysis.top_n = n;
        }
        if let Some(mode) = self.word_count_mode {
            analysis.word_count_mode = mode;
        }

        let summary = &mut config.summary;
        summary.deterministic |= self.deterministic;
        if let Some(min) = self.min_summary_length {
            summary.direct_min = min;
            summary.consolidation_min = min;
        }
        if let Some(max) = self.max_summary_length {
            summary.max_summary_length = max;
        }
        if let Some(n) = self.max_chunks {
            summary.max_chunks_for_summary = usize::try_from(n).unwrap_or(usize::MAX);
        }

        if let Some(provider) = &self.provider {
            config.llm.provider = provider.clone();
        }
        if let Some(model) = &self.model {
            config.llm.model = Some(model.clone());
        }
    }
}
