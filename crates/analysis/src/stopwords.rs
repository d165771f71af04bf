//! Stopword resource. Built once at startup and shared read-only.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::normalize::remove_accents;
use crate::AnalysisError;

/// Portuguese stopword list (NLTK corpus).
const PORTUGUESE_STOPWORDS: &[&str] = &[
    "a", "à", "ao", "aos", "aquela", "aquelas", "aquele", "aqueles", "aquilo", "as", "às",
    "até", "com", "como", "da", "das", "de", "dela", "delas", "dele", "deles", "depois", "do",
    "dos", "e", "é", "ela", "elas", "ele", "eles", "em", "entre", "era", "eram", "éramos",
    "essa", "essas", "esse", "esses", "esta", "está", "estamos", "estão", "estar", "estas",
    "estava", "estavam", "estávamos", "este", "esteja", "estejam", "estejamos", "estes",
    "esteve", "estive", "estivemos", "estiver", "estivera", "estiveram", "estivéramos",
    "estiverem", "estivermos", "estivesse", "estivessem", "estivéssemos", "estou", "eu", "foi",
    "fomos", "for", "fora", "foram", "fôramos", "forem", "formos", "fosse", "fossem",
    "fôssemos", "fui", "há", "haja", "hajam", "hajamos", "hão", "havemos", "haver", "hei",
    "houve", "houvemos", "houver", "houvera", "houverá", "houveram", "houvéramos", "houverão",
    "houverei", "houverem", "houveremos", "houveria", "houveriam", "houveríamos", "houvermos",
    "houvesse", "houvessem", "houvéssemos", "isso", "isto", "já", "lhe", "lhes", "mais", "mas",
    "me", "mesmo", "meu", "meus", "minha", "minhas", "muito", "na", "não", "nas", "nem", "no",
    "nos", "nós", "nossa", "nossas", "nosso", "nossos", "num", "numa", "o", "os", "ou", "para",
    "pela", "pelas", "pelo", "pelos", "por", "qual", "quando", "que", "quem", "são", "se",
    "seja", "sejam", "sejamos", "sem", "ser", "será", "serão", "serei", "seremos", "seria",
    "seriam", "seríamos", "seu", "seus", "só", "somos", "sou", "sua", "suas", "também", "te",
    "tem", "tém", "temos", "tenha", "tenham", "tenhamos", "tenho", "terá", "terão", "terei",
    "teremos", "teria", "teriam", "teríamos", "teu", "teus", "teve", "tinha", "tinham",
    "tínhamos", "tive", "tivemos", "tiver", "tivera", "tiveram", "tivéramos", "tiverem",
    "tivermos", "tivesse", "tivessem", "tivéssemos", "tu", "tua", "tuas", "um", "uma", "você",
    "vocês", "vos",
];

/// An immutable set of lowercase stopwords. Cloning shares the underlying set.
#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: Arc<HashSet<String>>,
    language: String,
}

impl StopwordSet {
    /// The built-in Portuguese list.
    pub fn portuguese() -> Self {
        Self::from_words("portuguese", PORTUGUESE_STOPWORDS.iter().copied())
    }

    pub fn from_words<'a>(language: &str, words: impl IntoIterator<Item = &'a str>) -> Self {
        let words: HashSet<String> = words
            .into_iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        debug!(language, count = words.len(), "stopword set built");
        Self {
            words: Arc::new(words),
            language: language.to_string(),
        }
    }

    /// Load a newline-separated word list; `#` starts a comment line.
    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let content = std::fs::read_to_string(path).map_err(|e| AnalysisError::Stopwords {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let language = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "custom".to_string());
        let set = Self::from_words(
            &language,
            content.lines().filter(|l| !l.trim_start().starts_with('#')),
        );
        info!(path = %path.display(), count = set.len(), "loaded stopwords");
        Ok(set)
    }

    /// Load from `path` when given, otherwise fall back to the built-in list.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, AnalysisError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::portuguese()),
        }
    }

    /// The same list with diacritics stripped, for accent-folded tokens.
    pub fn folded(&self) -> Self {
        let words = self.words.iter().map(|w| remove_accents(w));
        Self {
            words: Arc::new(words.collect()),
            language: self.language.clone(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}
