// File: src/merger.rs
use crate::core::lexicon::Lexicon;
use crate::core::types::{Dataset, Source, WordEntry, VARIANT_SEPARATOR};
use crate::error::LookupError;
use crate::fallback::PronunciationSource;
use serde::{Deserialize, Serialize};

/// Which dictionary pronunciations end up in a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantPolicy {
    /// Every pronunciation, joined with ", ".
    #[default]
    All,
    First,
}

/// A word the fallback could not pronounce. Its record carries an empty ipa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupFailure {
    pub row: usize,
    pub word: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub entries: Dataset,
    pub failures: Vec<LookupFailure>,
}

/// Joins a word list against the lexicon, asking the fallback for the rest.
pub struct Merger<'a> {
    lexicon: &'a Lexicon,
    fallback: &'a dyn PronunciationSource,
    policy: VariantPolicy,
}

impl<'a> Merger<'a> {
    pub fn new(lexicon: &'a Lexicon, fallback: &'a dyn PronunciationSource) -> Self {
        Self {
            lexicon,
            fallback,
            policy: VariantPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: VariantPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Emits exactly one record per input word, in input order. Raw
    /// pronunciations are copied as found; normalization happens later.
    pub fn merge(&self, words: &[String]) -> MergeOutcome {
        let mut outcome = MergeOutcome {
            entries: Vec::with_capacity(words.len()),
            failures: Vec::new(),
        };
        for (row, word) in words.iter().enumerate() {
            let entry = match self.dictionary_ipa(word) {
                Some(ipa) => WordEntry::new(word.as_str(), ipa, Source::Dictionary),
                None => match self.generate(word) {
                    Ok(ipa) => WordEntry::new(word.as_str(), ipa, Source::Generated),
                    Err(e) => {
                        tracing::warn!("no pronunciation for '{}': {}", word, e);
                        outcome.failures.push(LookupFailure {
                            row,
                            word: word.clone(),
                            reason: e.to_string(),
                        });
                        WordEntry::new(word.as_str(), "", Source::Generated)
                    }
                },
            };
            outcome.entries.push(entry);
        }
        tracing::info!(
            "merged {} words ({} lookup failures)",
            outcome.entries.len(),
            outcome.failures.len()
        );
        outcome
    }

    fn dictionary_ipa(&self, word: &str) -> Option<String> {
        let entry = self.lexicon.get(word)?;
        let ipa = match self.policy {
            VariantPolicy::All => Some(entry.pronunciations.join(VARIANT_SEPARATOR)),
            VariantPolicy::First => entry.pronunciations.first().cloned(),
        };
        ipa.filter(|ipa| !ipa.is_empty())
    }

    fn generate(&self, word: &str) -> Result<String, LookupError> {
        let ipa = self.fallback.lookup(word)?;
        if ipa.trim().is_empty() {
            Err(LookupError::NotFound(word.to_string()))
        } else {
            tracing::debug!("{} generated '{}' for '{}'", self.fallback.name(), ipa, word);
            Ok(ipa)
        }
    }
}

#[cfg(test)]
#[path = "merger_test.rs"]
mod tests;
