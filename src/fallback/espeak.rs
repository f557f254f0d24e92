// File: src/fallback/espeak.rs
use crate::error::LookupError;
use crate::fallback::PronunciationSource;
use std::process::Command;

pub const DEFAULT_BINARY: &str = "espeak-ng";
pub const DEFAULT_VOICE: &str = "en-us";

/// Asks an espeak-ng executable for the IPA of a word.
#[derive(Debug, Clone)]
pub struct EspeakGenerator {
    binary: String,
    voice: String,
}

impl EspeakGenerator {
    pub fn new(binary: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            voice: voice.into(),
        }
    }

    /// espeak separates words and clauses with whitespace and newlines.
    fn clean_output(stdout: &[u8]) -> String {
        String::from_utf8_lossy(stdout)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    }
}

impl Default for EspeakGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY, DEFAULT_VOICE)
    }
}

impl PronunciationSource for EspeakGenerator {
    fn name(&self) -> &str {
        "espeak"
    }

    fn lookup(&self, word: &str) -> Result<String, LookupError> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Err(LookupError::NotFound(word));
        }
        let output = Command::new(&self.binary)
            .args(["-q", "--ipa", "-v", self.voice.as_str()])
            .arg(&word)
            .output()
            .map_err(|e| LookupError::Unavailable {
                source_name: self.binary.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(LookupError::Failed {
                source_name: self.binary.clone(),
                word,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let ipa = Self::clean_output(&output.stdout);
        if ipa.is_empty() {
            Err(LookupError::NotFound(word))
        } else {
            Ok(ipa)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_unavailable() {
        let espeak = EspeakGenerator::new("/nonexistent/espeak-ng-for-tests", "en-us");
        assert!(matches!(
            espeak.lookup("hello"),
            Err(LookupError::Unavailable { .. })
        ));
    }

    #[test]
    fn test_output_whitespace_is_removed() {
        assert_eq!(EspeakGenerator::clean_output(" həlˈoʊ\n".as_bytes()), "həlˈoʊ");
    }
}
