// src/core/types.rs
use serde::{Deserialize, Serialize};

/// Where a record's pronunciation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// Found in the pronunciation dictionary.
    #[serde(rename = "cmu_dict")]
    Dictionary,
    /// Produced by a fallback collaborator (or attempted and failed).
    #[serde(rename = "generated")]
    Generated,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Dictionary => "cmu_dict",
            Source::Generated => "generated",
        }
    }
}

/// One row of the dataset. Serializes to the `word,ipa,source` CSV layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub ipa: String,
    pub source: Source,
}

impl WordEntry {
    pub fn new(word: impl Into<String>, ipa: impl Into<String>, source: Source) -> Self {
        Self {
            word: word.into(),
            ipa: ipa.into(),
            source,
        }
    }
}

/// A single literal rewrite. Rules are applied in table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationRule {
    pub pattern: String,
    pub replacement: String,
}

impl NormalizationRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.pattern == self.replacement
    }
}

/// Ordered records, keyed by `word` once the duplicates are filtered out.
pub type Dataset = Vec<WordEntry>;

/// Stress marks, primary then secondary.
pub const PRIMARY_STRESS: char = 'ˈ';
pub const SECONDARY_STRESS: char = 'ˌ';
pub const LENGTH_MARK: char = 'ː';

/// Separator between alternative pronunciations of one word.
pub const VARIANT_SEPARATOR: &str = ", ";

pub fn is_stress_mark(c: char) -> bool {
    c == PRIMARY_STRESS || c == SECONDARY_STRESS
}

/// Vowel symbols that can carry stress.
pub fn is_vowel(c: char) -> bool {
    matches!(
        c,
        'a' | 'e' | 'i' | 'o' | 'u' | 'æ' | 'ɑ' | 'ɒ' | 'ɔ' | 'ʊ' | 'ʌ' | 'ɪ' | 'ɛ' | 'ə' | 'ɜ'
    )
}

pub fn is_consonant(c: char) -> bool {
    matches!(
        c,
        'p' | 'b'
            | 't'
            | 'd'
            | 'k'
            | 'g'
            | 'ɡ'
            | 'f'
            | 'v'
            | 'θ'
            | 'ð'
            | 's'
            | 'z'
            | 'ʃ'
            | 'ʒ'
            | 'h'
            | 'm'
            | 'n'
            | 'ŋ'
            | 'l'
            | 'r'
            | 'w'
            | 'j'
    )
}
