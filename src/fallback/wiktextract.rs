// File: src/fallback/wiktextract.rs
use crate::error::{LookupError, PipelineError};
use crate::fallback::PronunciationSource;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

const PREFERRED_TAGS: [&str; 2] = ["US", "General-American"];

#[derive(Debug, Deserialize)]
struct WiktextractLine {
    word: String,
    #[serde(default)]
    lang_code: Option<String>,
    #[serde(default)]
    sounds: Vec<Sound>,
}

#[derive(Debug, Deserialize)]
struct Sound {
    #[serde(default)]
    ipa: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

/// Pronunciations extracted from a wiktextract JSONL dump, one JSON object
/// per line. Only English entries are kept; a US-tagged pronunciation wins
/// over the first one listed.
#[derive(Debug, Clone, Default)]
pub struct WiktextractSource {
    pronunciations: HashMap<String, String>,
    skipped: u64,
}

impl WiktextractSource {
    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let file = File::open(path).map_err(|e| PipelineError::from_open(path, e))?;
        let source = Self::from_reader(file)?;
        tracing::info!(
            "loaded {} wiktextract pronunciations from {}",
            source.len(),
            path.display()
        );
        Ok(source)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PipelineError> {
        let mut pronunciations: HashMap<String, (String, bool)> = HashMap::new();
        let mut skipped = 0;
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let mut line_no: u64 = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;
            if buf.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            let entry: WiktextractLine = match serde_json::from_slice(&buf) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("skipping wiktextract line {}: {}", line_no, e);
                    skipped += 1;
                    continue;
                }
            };
            if entry.lang_code.as_deref().is_some_and(|code| code != "en") {
                continue;
            }
            let key = entry.word.to_lowercase();
            for sound in entry.sounds {
                let Some(ipa) = sound.ipa.filter(|ipa| !ipa.trim().is_empty()) else {
                    continue;
                };
                let preferred = sound.tags.iter().any(|t| PREFERRED_TAGS.contains(&t.as_str()));
                match pronunciations.get(&key) {
                    Some((_, true)) => {}
                    Some((_, false)) if !preferred => {}
                    _ => {
                        pronunciations.insert(key.clone(), (ipa, preferred));
                    }
                }
            }
        }
        Ok(Self {
            pronunciations: pronunciations
                .into_iter()
                .map(|(word, (ipa, _))| (word, ipa))
                .collect(),
            skipped,
        })
    }

    pub fn len(&self) -> usize {
        self.pronunciations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pronunciations.is_empty()
    }

    /// Lines that were not valid JSON (or not UTF-8).
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl PronunciationSource for WiktextractSource {
    fn name(&self) -> &str {
        "wiktextract"
    }

    fn lookup(&self, word: &str) -> Result<String, LookupError> {
        self.pronunciations
            .get(&word.to_lowercase())
            .cloned()
            .ok_or_else(|| LookupError::NotFound(word.to_string()))
    }
}
