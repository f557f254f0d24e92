// File: src/config.rs

use crate::core::lexicon::DictionaryFormat;
use crate::core::normalizer::NormalizerOptions;
use crate::error::PipelineError;
use crate::fallback::espeak::{self, EspeakGenerator};
use crate::fallback::grapheme::GraphemeGenerator;
use crate::fallback::wiktextract::WiktextractSource;
use crate::fallback::{ChainSource, NoFallback, PronunciationSource};
use crate::merger::VariantPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const FULL_OUTPUT_NAME: &str = "final_words_with_ipa.csv";
pub const CORRECTED_OUTPUT_NAME: &str = "final_corrected_words_with_ipa.csv";
pub const REPORT_NAME: &str = "ipa_report.json";

fn default_espeak_binary() -> String {
    espeak::DEFAULT_BINARY.to_string()
}

fn default_espeak_voice() -> String {
    espeak::DEFAULT_VOICE.to_string()
}

/// Where pronunciations for out-of-dictionary words come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FallbackConfig {
    None,
    /// Spelling rules, always available.
    #[default]
    Rules,
    Espeak {
        #[serde(default = "default_espeak_binary")]
        binary: String,
        #[serde(default = "default_espeak_voice")]
        voice: String,
    },
    Wiktextract {
        path: PathBuf,
    },
    /// Try each source in order.
    Chain {
        sources: Vec<FallbackConfig>,
    },
}

impl FallbackConfig {
    /// Parses the CLI shorthand: `none`, `rules`, `espeak`,
    /// `wiktextract=<path>`, or a `+`-joined chain such as `espeak+rules`.
    pub fn parse(shorthand: &str) -> Option<Self> {
        if shorthand.contains('+') {
            let sources = shorthand.split('+').map(Self::parse).collect::<Option<Vec<_>>>()?;
            return Some(FallbackConfig::Chain { sources });
        }
        match shorthand {
            "none" => Some(FallbackConfig::None),
            "rules" => Some(FallbackConfig::Rules),
            "espeak" => Some(FallbackConfig::Espeak {
                binary: default_espeak_binary(),
                voice: default_espeak_voice(),
            }),
            _ => shorthand
                .strip_prefix("wiktextract=")
                .filter(|p| !p.is_empty())
                .map(|p| FallbackConfig::Wiktextract { path: PathBuf::from(p) }),
        }
    }

    pub fn build(&self) -> Result<Box<dyn PronunciationSource>, PipelineError> {
        let source: Box<dyn PronunciationSource> = match self {
            FallbackConfig::None => Box::new(NoFallback),
            FallbackConfig::Rules => Box::new(GraphemeGenerator::new()),
            FallbackConfig::Espeak { binary, voice } => {
                Box::new(EspeakGenerator::new(binary.as_str(), voice.as_str()))
            }
            FallbackConfig::Wiktextract { path } => Box::new(WiktextractSource::from_path(path)?),
            FallbackConfig::Chain { sources } => Box::new(ChainSource::new(
                sources.iter().map(Self::build).collect::<Result<Vec<_>, _>>()?,
            )),
        };
        Ok(source)
    }
}

/// Everything a run needs. Every field has a default, so a config file only
/// lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub words_path: PathBuf,
    pub dictionary_path: PathBuf,
    /// Custom rule table; the built-in table is used when absent.
    pub rules_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub full_output_name: String,
    pub corrected_output_name: String,
    pub report_name: String,
    pub dictionary_format: DictionaryFormat,
    pub variant_policy: VariantPolicy,
    pub fallback: FallbackConfig,
    pub normalizer: NormalizerOptions,
    /// Characters the validator accepts beyond the standard symbol set.
    pub extra_symbols: String,
    /// Bincode cache of the parsed dictionary.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            words_path: PathBuf::from("data/words.csv"),
            dictionary_path: PathBuf::from("data/cmudict-0.7b-ipa.txt"),
            rules_path: None,
            output_dir: PathBuf::from("output"),
            full_output_name: FULL_OUTPUT_NAME.to_string(),
            corrected_output_name: CORRECTED_OUTPUT_NAME.to_string(),
            report_name: REPORT_NAME.to_string(),
            dictionary_format: DictionaryFormat::default(),
            variant_policy: VariantPolicy::default(),
            fallback: FallbackConfig::default(),
            normalizer: NormalizerOptions::default(),
            extra_symbols: String::new(),
            snapshot_path: None,
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let text = fs::read_to_string(path).map_err(|e| PipelineError::from_open(path, e))?;
        let config: Self = serde_json::from_str(&text)?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn full_output_path(&self) -> PathBuf {
        self.output_dir.join(&self.full_output_name)
    }

    pub fn corrected_output_path(&self) -> PathBuf {
        self.output_dir.join(&self.corrected_output_name)
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_name)
    }
}
