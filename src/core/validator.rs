// File: src/core/validator.rs
use crate::core::types::{Dataset, Source, WordEntry};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Symbols a standardized transcription may contain, besides whitespace and
/// the variant separator.
pub const IPA_SYMBOLS: &str = "abdefhijklmnoprstuvwzæðŋɑɒɔəɛɜɡɪʃʊʌʒθˈˌː";

/// A non-fatal finding about one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    EmptyIpa { row: usize, word: String },
    DisallowedSymbols { row: usize, word: String, symbols: String },
    /// A later row repeats the key of `first_row`.
    DuplicateWord { row: usize, first_row: usize, word: String },
}

impl Anomaly {
    pub fn row(&self) -> usize {
        match *self {
            Anomaly::EmptyIpa { row, .. }
            | Anomaly::DisallowedSymbols { row, .. }
            | Anomaly::DuplicateWord { row, .. } => row,
        }
    }

    pub fn word(&self) -> &str {
        match self {
            Anomaly::EmptyIpa { word, .. }
            | Anomaly::DisallowedSymbols { word, .. }
            | Anomaly::DuplicateWord { word, .. } => word,
        }
    }
}

impl std::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Anomaly::EmptyIpa { row, word } => write!(f, "row {}: '{}' has no IPA", row, word),
            Anomaly::DisallowedSymbols { row, word, symbols } => {
                write!(f, "row {}: '{}' contains disallowed symbols {}", row, word, symbols)
            }
            Anomaly::DuplicateWord { row, first_row, word } => {
                write!(f, "row {}: '{}' duplicates row {}", row, word, first_row)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoverageStats {
    pub total: usize,
    pub dictionary: usize,
    pub generated: usize,
    pub with_ipa: usize,
    pub without_ipa: usize,
    pub dictionary_percent: f64,
    pub generated_percent: f64,
    /// Share of rows with a non-empty transcription.
    pub coverage_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub coverage: CoverageStats,
    pub anomalies: Vec<Anomaly>,
}

impl ValidationReport {
    /// Rows whose transcription is empty or contains disallowed symbols.
    pub fn malformed_rows(&self) -> HashSet<usize> {
        self.anomalies
            .iter()
            .filter(|a| !matches!(a, Anomaly::DuplicateWord { .. }))
            .map(Anomaly::row)
            .collect()
    }
}

/// Scans a dataset for coverage and formatting problems. Never modifies it.
#[derive(Debug, Clone)]
pub struct Validator {
    allowed: HashSet<char>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            allowed: IPA_SYMBOLS.chars().collect(),
        }
    }

    /// Accepts `extra` symbols in addition to the standard set.
    pub fn with_extra_symbols(extra: &str) -> Self {
        let mut validator = Self::new();
        validator.allowed.extend(extra.chars().filter(|c| !c.is_whitespace()));
        validator
    }

    fn is_allowed(&self, c: char) -> bool {
        c.is_whitespace() || c == ',' || self.allowed.contains(&c)
    }

    pub fn validate(&self, dataset: &[WordEntry]) -> ValidationReport {
        let mut coverage = CoverageStats {
            total: dataset.len(),
            ..Default::default()
        };
        let mut anomalies = Vec::new();
        let mut first_seen: HashMap<&str, usize> = HashMap::new();

        for (row, entry) in dataset.iter().enumerate() {
            match entry.source {
                Source::Dictionary => coverage.dictionary += 1,
                Source::Generated => coverage.generated += 1,
            }

            if let Some(&first_row) = first_seen.get(entry.word.as_str()) {
                anomalies.push(Anomaly::DuplicateWord {
                    row,
                    first_row,
                    word: entry.word.clone(),
                });
            } else {
                first_seen.insert(entry.word.as_str(), row);
            }

            if entry.ipa.trim().is_empty() {
                coverage.without_ipa += 1;
                anomalies.push(Anomaly::EmptyIpa {
                    row,
                    word: entry.word.clone(),
                });
                continue;
            }
            coverage.with_ipa += 1;

            let bad: BTreeSet<char> = entry.ipa.chars().filter(|&c| !self.is_allowed(c)).collect();
            if !bad.is_empty() {
                anomalies.push(Anomaly::DisallowedSymbols {
                    row,
                    word: entry.word.clone(),
                    symbols: bad.into_iter().collect(),
                });
            }
        }

        coverage.dictionary_percent = percent(coverage.dictionary, coverage.total);
        coverage.generated_percent = percent(coverage.generated, coverage.total);
        coverage.coverage_percent = percent(coverage.with_ipa, coverage.total);

        for anomaly in &anomalies {
            tracing::debug!("validation warning: {}", anomaly);
        }
        ValidationReport { coverage, anomalies }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// Drops malformed rows, then keeps only the first remaining row for each
/// word. This is the only place records are removed.
pub fn filter_malformed(dataset: &[WordEntry], report: &ValidationReport) -> Dataset {
    let malformed = report.malformed_rows();
    let mut seen: HashSet<&str> = HashSet::new();
    dataset
        .iter()
        .enumerate()
        .filter(|(row, entry)| !malformed.contains(row) && seen.insert(entry.word.as_str()))
        .map(|(_, entry)| entry.clone())
        .collect()
}

#[cfg(test)]
#[path = "validator_test.rs"]
mod tests;
