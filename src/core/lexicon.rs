// --- File: src/core/lexicon.rs
use crate::core::arpabet;
use crate::error::{ParseError, PipelineError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Index of an entry in the lexicon's entry store.
pub type WordId = usize;

/// Notation of the pronunciations in a dictionary file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DictionaryFormat {
    /// Decide per line: ARPAbet if every token is an ARPAbet phone.
    #[default]
    Auto,
    Ipa,
    Arpabet,
}

/// All pronunciations recorded for one headword, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub word: String,
    pub pronunciations: Vec<String>,
}

/// Counters from a dictionary load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub lines: u64,
    pub entries: usize,
    pub skipped: u64,
}

/// The pronunciation dictionary: word -> raw pronunciations.
///
/// Lookups try the word exactly as given, then its lowercase form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
    exact: HashMap<String, WordId>,
    folded: HashMap<String, WordId>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn find_word_id(&self, word: &str) -> Option<WordId> {
        self.exact
            .get(word)
            .or_else(|| self.folded.get(&word.to_lowercase()))
            .copied()
    }

    pub fn get(&self, word: &str) -> Option<&LexiconEntry> {
        self.find_word_id(word).map(|id| &self.entries[id])
    }

    /// Gets or creates the entry for a headword, returning its ID.
    pub fn get_or_create(&mut self, word: &str) -> WordId {
        if let Some(&id) = self.exact.get(word) {
            return id;
        }
        let id = self.entries.len();
        self.entries.push(LexiconEntry {
            word: word.to_string(),
            pronunciations: Vec::new(),
        });
        self.exact.insert(word.to_string(), id);
        self.folded.entry(word.to_lowercase()).or_insert(id);
        id
    }

    /// Records a pronunciation; repeats of an existing one are ignored.
    pub fn insert(&mut self, word: &str, pronunciation: &str) {
        let pronunciation = pronunciation.trim();
        if pronunciation.is_empty() {
            return;
        }
        let id = self.get_or_create(word);
        let entry = &mut self.entries[id];
        if !entry.pronunciations.iter().any(|p| p == pronunciation) {
            entry.pronunciations.push(pronunciation.to_string());
        }
    }

    pub fn from_path(path: &Path, format: DictionaryFormat) -> Result<(Self, LoadStats), PipelineError> {
        let file = File::open(path).map_err(|e| PipelineError::from_open(path, e))?;
        let (lexicon, stats) = Self::from_reader(file, format)?;
        tracing::info!(
            "loaded {} dictionary entries from {} ({} lines skipped)",
            stats.entries,
            path.display(),
            stats.skipped
        );
        Ok((lexicon, stats))
    }

    /// Parses a tab- or whitespace-delimited dictionary. Malformed lines are
    /// logged and skipped.
    pub fn from_reader<R: Read>(reader: R, format: DictionaryFormat) -> Result<(Self, LoadStats), PipelineError> {
        let mut lexicon = Self::new();
        let mut stats = LoadStats::default();
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let mut line_no: u64 = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;
            stats.lines = line_no;
            // Older CMU releases carry a few Latin-1 lines.
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("skipping dictionary line {}: {}", line_no, e);
                    stats.skipped += 1;
                    continue;
                }
            };
            match parse_line(line, line_no, format) {
                Ok(Some((word, pronunciations))) => {
                    for p in &pronunciations {
                        lexicon.insert(&word, p);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("skipping {}", e);
                    stats.skipped += 1;
                }
            }
        }
        stats.entries = lexicon.len();
        Ok((lexicon, stats))
    }
}

/// Strips a CMU variant marker: `READ(2)` -> `READ`.
fn headword(raw: &str) -> &str {
    match raw.rfind('(') {
        Some(open)
            if open > 0
                && raw.ends_with(')')
                && open + 1 < raw.len() - 1
                && raw[open + 1..raw.len() - 1].bytes().all(|b| b.is_ascii_digit()) =>
        {
            &raw[..open]
        }
        _ => raw,
    }
}

fn parse_line(
    line: &str,
    line_no: u64,
    format: DictionaryFormat,
) -> Result<Option<(String, Vec<String>)>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(";;;") {
        return Ok(None);
    }
    let (word, value) = match trimmed.split_once('\t') {
        Some(split) => split,
        None => trimmed
            .split_once(char::is_whitespace)
            .ok_or_else(|| ParseError::DictionaryLine {
                line: line_no,
                reason: format!("no pronunciation for '{}'", trimmed),
            })?,
    };
    let word = headword(word.trim());
    let value = value.trim();
    if word.is_empty() || value.is_empty() {
        return Err(ParseError::DictionaryLine {
            line: line_no,
            reason: "empty word or pronunciation".to_string(),
        });
    }

    let use_arpabet = match format {
        DictionaryFormat::Arpabet => true,
        DictionaryFormat::Ipa => false,
        DictionaryFormat::Auto => arpabet::looks_like_arpabet(value),
    };
    let pronunciations = if use_arpabet {
        vec![arpabet::to_ipa(value).map_err(|e| ParseError::DictionaryLine {
            line: line_no,
            reason: e.to_string(),
        })?]
    } else {
        value
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    };
    Ok(Some((word.to_string(), pronunciations)))
}

#[cfg(test)]
#[path = "lexicon_test.rs"]
mod tests;
