// src/core/pipeline.rs
use crate::config::PipelineConfig;
use crate::core::lexicon::Lexicon;
use crate::core::normalizer::Normalizer;
use crate::core::rules::RuleTable;
use crate::core::types::{Dataset, WordEntry};
use crate::core::validator::{filter_malformed, Anomaly, CoverageStats, Validator};
use crate::csv_io;
use crate::error::PipelineError;
use crate::fallback::PronunciationSource;
use crate::merger::{LookupFailure, Merger, VariantPolicy};
use crate::persistence::load_lexicon;
use serde::Serialize;
use std::path::PathBuf;

/// How many before/after pairs the report keeps.
const MAX_EXAMPLES: usize = 10;

/// A record whose transcription the normalizer rewrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizationChange {
    pub word: String,
    pub before: String,
    pub after: String,
}

/// The JSON report written next to the datasets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub coverage: CoverageStats,
    pub anomalies: Vec<Anomaly>,
    pub lookup_failures: Vec<LookupFailure>,
    pub normalized_changed: usize,
    pub examples: Vec<NormalizationChange>,
    pub full_records: usize,
    pub corrected_records: usize,
    pub rule_count: usize,
}

/// Everything one pass over a word list produces.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    /// Every merged record, normalized, in input order.
    pub full: Dataset,
    /// `full` without malformed rows and repeated words.
    pub corrected: Dataset,
    pub report: RunReport,
}

/// Paths written by [`run`], plus the report that went into the JSON file.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub full_output: PathBuf,
    pub corrected_output: PathBuf,
    pub report_path: PathBuf,
    pub report: RunReport,
}

/// Merge -> normalize -> validate over one word list.
pub struct IpaPipeline {
    pub rules: RuleTable,
    pub lexicon: Lexicon,
    normalizer: Normalizer,
    fallback: Box<dyn PronunciationSource>,
    validator: Validator,
    variant_policy: VariantPolicy,
}

impl IpaPipeline {
    pub fn with_parts(
        rules: RuleTable,
        lexicon: Lexicon,
        fallback: Box<dyn PronunciationSource>,
    ) -> Self {
        Self {
            rules,
            lexicon,
            normalizer: Normalizer::default(),
            fallback,
            validator: Validator::new(),
            variant_policy: VariantPolicy::default(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_variant_policy(mut self, policy: VariantPolicy) -> Self {
        self.variant_policy = policy;
        self
    }

    /// Loads the rule table, the dictionary and the fallback named by
    /// `config`. A missing input file aborts here.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let rules = match &config.rules_path {
            Some(path) => RuleTable::from_path(path)?,
            None => RuleTable::builtin()?,
        };
        rules.warn_conflicts();

        let lexicon = load_lexicon(
            &config.dictionary_path,
            config.dictionary_format,
            config.snapshot_path.as_deref(),
        )?;
        let fallback = config.fallback.build()?;
        tracing::info!(
            "pipeline ready: {} rules, {} dictionary entries, fallback '{}'",
            rules.len(),
            lexicon.len(),
            fallback.name()
        );

        Ok(Self::with_parts(rules, lexicon, fallback)
            .with_normalizer(Normalizer::new(config.normalizer))
            .with_validator(Validator::with_extra_symbols(&config.extra_symbols))
            .with_variant_policy(config.variant_policy))
    }

    pub fn normalize(&self, raw: &str) -> String {
        self.normalizer.normalize(raw, &self.rules)
    }

    /// Rewrites every record's ipa in place and returns the records that
    /// changed.
    pub fn normalize_entries(&self, entries: &mut [WordEntry]) -> Vec<NormalizationChange> {
        let mut changes = Vec::new();
        for entry in entries.iter_mut() {
            let standardized = self.normalize(&entry.ipa);
            if standardized != entry.ipa {
                changes.push(NormalizationChange {
                    word: entry.word.clone(),
                    before: std::mem::replace(&mut entry.ipa, standardized),
                    after: entry.ipa.clone(),
                });
            }
        }
        changes
    }

    pub fn process(&self, words: &[String]) -> PipelineOutput {
        let merged = Merger::new(&self.lexicon, self.fallback.as_ref())
            .with_policy(self.variant_policy)
            .merge(words);

        let mut full = merged.entries;
        let changes = self.normalize_entries(&mut full);
        tracing::info!("normalizer changed {} of {} records", changes.len(), full.len());

        let validation = self.validator.validate(&full);
        let corrected = filter_malformed(&full, &validation);
        tracing::info!(
            "validation: {:.2}% coverage, {} anomalies, {} records kept",
            validation.coverage.coverage_percent,
            validation.anomalies.len(),
            corrected.len()
        );

        let report = RunReport {
            coverage: validation.coverage,
            anomalies: validation.anomalies,
            lookup_failures: merged.failures,
            normalized_changed: changes.len(),
            examples: changes.into_iter().take(MAX_EXAMPLES).collect(),
            full_records: full.len(),
            corrected_records: corrected.len(),
            rule_count: self.rules.len(),
        };
        PipelineOutput {
            full,
            corrected,
            report,
        }
    }
}

/// Runs the whole pipeline described by `config` and writes both datasets
/// and the report into `config.output_dir`.
pub fn run(config: &PipelineConfig) -> Result<RunSummary, PipelineError> {
    let pipeline = IpaPipeline::from_config(config)?;
    let (words, _) = csv_io::read_words(&config.words_path)?;
    let output = pipeline.process(&words);

    let summary = RunSummary {
        full_output: config.full_output_path(),
        corrected_output: config.corrected_output_path(),
        report_path: config.report_path(),
        report: output.report,
    };
    csv_io::write_dataset(&summary.full_output, &output.full)?;
    csv_io::write_dataset(&summary.corrected_output, &output.corrected)?;
    csv_io::write_json(&summary.report_path, &summary.report)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Source;
    use crate::error::LookupError;
    use crate::fallback::NoFallback;

    fn pipeline(fallback: Box<dyn PronunciationSource>) -> IpaPipeline {
        let mut lexicon = Lexicon::new();
        lexicon.insert("bird", "bɝd");
        lexicon.insert("read", "ɹiːd");
        lexicon.insert("read", "ɹɛd");
        IpaPipeline::with_parts(RuleTable::builtin().unwrap(), lexicon, fallback)
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_bird_from_dictionary() {
        let output = pipeline(Box::new(NoFallback)).process(&words(&["bird"]));
        assert_eq!(output.full, vec![WordEntry::new("bird", "bɜːrd", Source::Dictionary)]);
        assert_eq!(output.report.normalized_changed, 1);
        assert_eq!(
            output.report.examples[0],
            NormalizationChange {
                word: "bird".to_string(),
                before: "bɝd".to_string(),
                after: "bɜːrd".to_string(),
            }
        );
    }

    #[test]
    fn test_variants_are_normalized_together() {
        let output = pipeline(Box::new(NoFallback)).process(&words(&["read"]));
        assert_eq!(output.full[0].ipa, "riːd, rɛd");
    }

    #[test]
    fn test_generated_word_is_normalized() {
        let fake = |_: &str| -> Result<String, LookupError> { Ok("/ˈzɔɹp/".to_string()) };
        let output = pipeline(Box::new(fake)).process(&words(&["zorp"]));
        assert_eq!(output.full, vec![WordEntry::new("zorp", "ˈzɔrp", Source::Generated)]);
        assert!(output.report.lookup_failures.is_empty());
    }

    #[test]
    fn test_corrected_drops_failures_and_duplicates() {
        let output = pipeline(Box::new(NoFallback)).process(&words(&["bird", "qwxz", "bird"]));
        assert_eq!(output.full.len(), 3);
        assert_eq!(output.corrected, vec![WordEntry::new("bird", "bɜːrd", Source::Dictionary)]);
        assert_eq!(output.report.lookup_failures.len(), 1);
        assert_eq!(output.report.full_records, 3);
        assert_eq!(output.report.corrected_records, 1);
    }

    #[test]
    fn test_examples_are_capped() {
        let fake = |w: &str| -> Result<String, LookupError> { Ok(format!("[{}]", w)) };
        let list: Vec<String> = (0..15).map(|i| format!("w{}", "a".repeat(i + 1))).collect();
        let output = pipeline(Box::new(fake)).process(&list);
        assert_eq!(output.report.normalized_changed, 15);
        assert_eq!(output.report.examples.len(), MAX_EXAMPLES);
    }
}
