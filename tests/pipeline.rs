// End-to-end runs over temporary files.
// Test cases:
// - `run` writes both datasets and the report; bird -> bɜːrd from cmu_dict
// - ARPAbet dictionary lines go through the same normalization
// - An injected fallback double fills the words the dictionary lacks
// - A missing word list aborts the run with MissingInput

use ipa_core::config::{FallbackConfig, PipelineConfig};
use ipa_core::core::lexicon::{DictionaryFormat, Lexicon};
use ipa_core::core::rules::RuleTable;
use ipa_core::core::types::{Source, WordEntry};
use ipa_core::csv_io;
use ipa_core::error::{LookupError, PipelineError};
use ipa_core::IpaPipeline;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const DICTIONARY: &str = "\
;;; test dictionary
bird\tbɝd
read\tɹiːd, ɹɛd
alert\tAH0 L ER1 T
water\tˈwɔːɾɚ
";

fn config_in(dir: &Path, words: &str) -> PipelineConfig {
    let words_path = dir.join("words.csv");
    let dictionary_path = dir.join("dict.txt");
    fs::write(&words_path, words).unwrap();
    fs::write(&dictionary_path, DICTIONARY).unwrap();
    PipelineConfig {
        words_path,
        dictionary_path,
        output_dir: dir.join("output"),
        fallback: FallbackConfig::None,
        snapshot_path: Some(dir.join("cache/lexicon.bin")),
        ..PipelineConfig::default()
    }
}

#[test]
fn test_run_writes_both_outputs() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path(), "word\nbird\nread\nalert\nwater\nqwxz\nbird\n");

    let summary = ipa_core::run(&config).unwrap();

    let (full, _) = csv_io::read_dataset(&summary.full_output).unwrap();
    assert_eq!(full.len(), 6);
    assert_eq!(full[0], WordEntry::new("bird", "bɜːrd", Source::Dictionary));
    assert_eq!(full[1].ipa, "riːd, rɛd");
    assert_eq!(full[2].ipa, "əlˈɜːrt");
    assert_eq!(full[3].ipa, "ˈwɔːtər");
    assert_eq!(full[4], WordEntry::new("qwxz", "", Source::Generated));

    let (corrected, _) = csv_io::read_dataset(&summary.corrected_output).unwrap();
    let kept: Vec<&str> = corrected.iter().map(|e| e.word.as_str()).collect();
    assert_eq!(kept, vec!["bird", "read", "alert", "water"]);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary.report_path).unwrap()).unwrap();
    assert_eq!(report["coverage"]["total"], 6);
    assert_eq!(report["coverage"]["dictionary"], 5);
    assert_eq!(report["lookup_failures"][0]["word"], "qwxz");
    assert_eq!(report["corrected_records"], 4);
    assert!(config.snapshot_path.as_ref().unwrap().exists());
}

#[test]
fn test_second_run_uses_snapshot() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path(), "word\nbird\n");
    let first = ipa_core::run(&config).unwrap();
    let second = ipa_core::run(&config).unwrap();
    assert_eq!(first.report, second.report);
}

#[test]
fn test_injected_fallback_fills_gaps() {
    let (lexicon, _) = Lexicon::from_reader(DICTIONARY.as_bytes(), DictionaryFormat::Auto).unwrap();
    let fake = |word: &str| -> Result<String, LookupError> {
        match word {
            "zorp" => Ok("/ˈzɔɹp/".to_string()),
            _ => Err(LookupError::NotFound(word.to_string())),
        }
    };
    let pipeline = IpaPipeline::with_parts(RuleTable::builtin().unwrap(), lexicon, Box::new(fake));

    let words: Vec<String> = ["bird", "zorp", "blick"].iter().map(|w| w.to_string()).collect();
    let output = pipeline.process(&words);

    assert_eq!(output.full.len(), words.len());
    assert_eq!(output.full[1], WordEntry::new("zorp", "ˈzɔrp", Source::Generated));
    assert_eq!(output.full[2].ipa, "");
    assert_eq!(output.report.lookup_failures.len(), 1);
    assert_eq!(output.report.coverage.with_ipa, 2);
}

#[test]
fn test_missing_word_list_aborts() {
    let dir = tempdir().unwrap();
    let mut config = config_in(dir.path(), "word\nbird\n");
    config.words_path = dir.path().join("absent.csv");
    let err = ipa_core::run(&config).unwrap_err();
    assert!(matches!(err, PipelineError::MissingInput(_)));
    assert!(!config.full_output_path().exists());
}
