// File: src/fallback/mod.rs
//! Pronunciation sources consulted for words missing from the dictionary.

pub mod espeak;
pub mod grapheme;
pub mod wiktextract;

use crate::error::LookupError;

/// Anything that can turn a word into a raw IPA string.
pub trait PronunciationSource {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    fn lookup(&self, word: &str) -> Result<String, LookupError>;
}

/// Closures are sources, which keeps test doubles to one line.
impl<F> PronunciationSource for F
where
    F: Fn(&str) -> Result<String, LookupError>,
{
    fn name(&self) -> &str {
        "closure"
    }

    fn lookup(&self, word: &str) -> Result<String, LookupError> {
        self(word)
    }
}

/// Never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl PronunciationSource for NoFallback {
    fn name(&self) -> &str {
        "none"
    }

    fn lookup(&self, word: &str) -> Result<String, LookupError> {
        Err(LookupError::NotFound(word.to_string()))
    }
}

/// Tries each source in order and returns the first non-empty result. When
/// every source fails, the last error is returned.
pub struct ChainSource {
    sources: Vec<Box<dyn PronunciationSource>>,
}

impl ChainSource {
    pub fn new(sources: Vec<Box<dyn PronunciationSource>>) -> Self {
        Self { sources }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl PronunciationSource for ChainSource {
    fn name(&self) -> &str {
        "chain"
    }

    fn lookup(&self, word: &str) -> Result<String, LookupError> {
        let mut last_error = LookupError::NotFound(word.to_string());
        for source in &self.sources {
            match source.lookup(word) {
                Ok(ipa) if !ipa.trim().is_empty() => {
                    tracing::debug!("{} answered for '{}'", source.name(), word);
                    return Ok(ipa);
                }
                Ok(_) => last_error = LookupError::NotFound(word.to_string()),
                Err(e) => {
                    tracing::debug!("{} failed for '{}': {}", source.name(), word, e);
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}
