use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Like [`profiled_env_usize`], but zero is rejected in favour of `default`.
fn profiled_env_nonzero(profile: &str, key: &str, default: usize) -> usize {
    match profiled_env_usize(profile, key, default) {
        0 => {
            tracing::warn!(key, default, "0 is not allowed, using the default");
            default
        }
        n => n,
    }
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_f32(profile: &str, key: &str, default: f32) -> f32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    match profiled_env_opt(profile, key) {
        Some(v) => matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub analysis: AnalysisConfig,
    pub summary: SummaryConfig,
    pub llm: LlmConfig,
    pub ollama: OllamaConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `LEXIS_PROFILE`. When set (e.g. `PROD`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("LEXIS_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            analysis: AnalysisConfig::from_env_profiled(p),
            summary: SummaryConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
            ollama: OllamaConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::debug!("Config loaded (profile: {}):", self.profile_label());
        tracing::debug!(
            "  analysis:  keep_numbers={}, top_n={}, word_count_mode={}, skip_structure={}",
            self.analysis.keep_numbers,
            self.analysis.top_n,
            self.analysis.word_count_mode,
            self.analysis.skip_structure
        );
        tracing::debug!(
            "  summary:   threshold={}, chunk_len={}, max_chunks={}, max_len={}, deterministic={}",
            self.summary.long_text_threshold,
            self.summary.chunk_max_length,
            self.summary.max_chunks_for_summary,
            self.summary.max_summary_length,
            self.summary.deterministic
        );
        tracing::debug!(
            "  llm:       provider={}, model={}, configured={}",
            self.llm.provider,
            self.llm.model.as_deref().unwrap_or("(provider default)"),
            self.llm.is_configured()
        );
        tracing::debug!("  ollama:    url={}", self.ollama.url);
    }
}

// ── Analysis ──────────────────────────────────────────────────

/// How `word_count` is computed for the statistics report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordCountMode {
    /// Count tokens produced by the tokenizer.
    Tokens,
    /// Count whitespace-separated words of the raw extracted text.
    Native,
}

impl FromStr for WordCountMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tokens" | "token" => Ok(WordCountMode::Tokens),
            "native" => Ok(WordCountMode::Native),
            other => Err(format!("unknown word count mode: '{other}'")),
        }
    }
}

impl std::fmt::Display for WordCountMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WordCountMode::Tokens => write!(f, "tokens"),
            WordCountMode::Native => write!(f, "native"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub keep_numbers: bool,
    pub top_n: usize,
    pub word_count_mode: WordCountMode,
    pub skip_structure: bool,
    /// Apply Unicode folding and de-hyphenation before tokenizing.
    pub advanced_clean: bool,
    /// Strip diacritics from tokens before counting.
    pub fold_accents: bool,
    /// Tokens shorter than this are dropped along with stopwords.
    pub min_token_len: usize,
    /// Optional newline-separated stopword file replacing the built-in list.
    pub stopwords_path: Option<PathBuf>,
    /// Spans with a font size strictly above this are title candidates.
    pub title_font_threshold: f32,
    pub title_max_words: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            keep_numbers: false,
            top_n: 10,
            word_count_mode: WordCountMode::Tokens,
            skip_structure: false,
            advanced_clean: true,
            fold_accents: false,
            min_token_len: 3,
            stopwords_path: None,
            title_font_threshold: 14.0,
            title_max_words: 15,
        }
    }
}

impl AnalysisConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            keep_numbers: profiled_env_bool(p, "KEEP_NUMBERS", d.keep_numbers),
            top_n: profiled_env_usize(p, "TOP_N", d.top_n),
            word_count_mode: profiled_env_opt(p, "WORD_COUNT_MODE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(d.word_count_mode),
            skip_structure: profiled_env_bool(p, "SKIP_STRUCTURE", d.skip_structure),
            advanced_clean: profiled_env_bool(p, "ADVANCED_CLEAN", d.advanced_clean),
            fold_accents: profiled_env_bool(p, "FOLD_ACCENTS", d.fold_accents),
            min_token_len: profiled_env_usize(p, "MIN_TOKEN_LEN", d.min_token_len),
            stopwords_path: profiled_env_opt(p, "STOPWORDS_PATH").map(PathBuf::from),
            title_font_threshold: profiled_env_f32(p, "TITLE_FONT_THRESHOLD", d.title_font_threshold),
            title_max_words: profiled_env_usize(p, "TITLE_MAX_WORDS", d.title_max_words),
        }
    }
}

// ── Summary ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Texts longer than this (in characters) take the map-reduce path.
    pub long_text_threshold: usize,
    pub chunk_max_length: usize,
    /// Chunks beyond this count are dropped from the map step. Never 0.
    pub max_chunks_for_summary: usize,
    /// Direct path input is truncated to this many characters.
    pub direct_max_chars: usize,
    pub chunk_summary_min: u32,
    pub chunk_summary_max: u32,
    pub consolidation_min: u32,
    pub direct_min: u32,
    pub max_summary_length: u32,
    pub deterministic: bool,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            long_text_threshold: 3000,
            chunk_max_length: 1000,
            max_chunks_for_summary: 5,
            direct_max_chars: 2000,
            chunk_summary_min: 30,
            chunk_summary_max: 200,
            consolidation_min: 100,
            direct_min: 50,
            max_summary_length: 500,
            deterministic: false,
        }
    }
}

impl SummaryConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            long_text_threshold: profiled_env_usize(p, "SUMMARY_LONG_TEXT_THRESHOLD", d.long_text_threshold),
            chunk_max_length: profiled_env_usize(p, "SUMMARY_CHUNK_MAX_LENGTH", d.chunk_max_length),
            max_chunks_for_summary: profiled_env_nonzero(p, "SUMMARY_MAX_CHUNKS", d.max_chunks_for_summary),
            direct_max_chars: profiled_env_usize(p, "SUMMARY_DIRECT_MAX_CHARS", d.direct_max_chars),
            chunk_summary_min: profiled_env_u32(p, "SUMMARY_CHUNK_MIN", d.chunk_summary_min),
            chunk_summary_max: profiled_env_u32(p, "SUMMARY_CHUNK_MAX", d.chunk_summary_max),
            consolidation_min: profiled_env_u32(p, "SUMMARY_CONSOLIDATION_MIN", d.consolidation_min),
            direct_min: profiled_env_u32(p, "SUMMARY_DIRECT_MIN", d.direct_min),
            max_summary_length: profiled_env_u32(p, "SUMMARY_MAX_LENGTH", d.max_summary_length),
            deterministic: profiled_env_bool(p, "SUMMARY_DETERMINISTIC", d.deterministic),
        }
    }
}

// ── LLM (OpenAI / Anthropic / Ollama) ─────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "openai", "anthropic", "ollama"
    pub provider: String,
    /// Model override; `None` uses the provider's configured default.
    pub model: Option<String>,
    /// Model tried when the primary model cannot be loaded.
    pub fallback_model: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub temperature: f32,
    /// Per-request timeout; `None` blocks until the backend answers.
    pub request_timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: None,
            fallback_model: None,
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_base_url: None,
            anthropic_api_key: None,
            anthropic_model: "claude-3-5-haiku-latest".to_string(),
            temperature: 0.7,
            request_timeout_secs: None,
        }
    }
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            provider: profiled_env_or(p, "LLM_PROVIDER", &d.provider),
            model: profiled_env_opt(p, "LLM_MODEL"),
            fallback_model: profiled_env_opt(p, "LLM_FALLBACK_MODEL"),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", &d.openai_model),
            openai_base_url: profiled_env_opt(p, "OPENAI_BASE_URL"),
            anthropic_api_key: profiled_env_opt(p, "ANTHROPIC_API_KEY"),
            anthropic_model: profiled_env_or(p, "ANTHROPIC_MODEL", &d.anthropic_model),
            temperature: profiled_env_f32(p, "LLM_TEMPERATURE", d.temperature),
            request_timeout_secs: profiled_env_opt(p, "LLM_TIMEOUT_SECS").and_then(|v| v.parse().ok()),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "openai" => self.openai_api_key.is_some(),
            "anthropic" | "claude" => self.anthropic_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
        }
    }
}

impl OllamaConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            url: profiled_env_or(p, "OLLAMA_URL", &d.url),
            model: profiled_env_or(p, "OLLAMA_MODEL", &d.model),
        }
    }
}
