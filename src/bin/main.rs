use anyhow::{bail, Context, Result};
use crossterm::style::Stylize;
use ipa_core::config::{FallbackConfig, PipelineConfig};
use ipa_core::core::arpabet;
use ipa_core::core::normalizer::{Normalizer, NormalizerOptions};
use ipa_core::core::rules::RuleTable;
use ipa_core::core::validator::Validator;
use ipa_core::csv_io;
use ipa_core::merger::VariantPolicy;
use std::path::PathBuf;
use tracing::Level;

const USAGE: &str = "\
Usage: ipa_pipeline [--verbose | --quiet] <command> [options]

Commands:
  run                     merge, normalize and validate a word list
      --config <file>     JSON config (CLI flags win over it)
      --words <file>      word list CSV with a `word` column
      --dict <file>       pronunciation dictionary
      --rules <file>      custom rule table
      --out <dir>         output directory
      --fallback <list>   none | rules | espeak | wiktextract=<file>, joined with '+'
      --snapshot <file>   cache the parsed dictionary here
      --first-variant     keep only the first dictionary pronunciation
      --ensure-stress     add a primary stress to unstressed variants
      --strip-misplaced-stress
  normalize <ipa>...      normalize transcriptions [--rules <file>] [--ensure-stress]
  validate <dataset.csv>  report coverage and anomalies [--extra-symbols <chars>]
  rules [--lint]          print the rule table [--rules <file>]
  convert-arpabet <phones>...";

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let level = take_level(&mut args);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }
    let command = args.remove(0);
    match command.as_str() {
        "run" => cmd_run(args),
        "normalize" => cmd_normalize(args),
        "validate" => cmd_validate(args),
        "rules" => cmd_rules(args),
        "convert-arpabet" => cmd_convert_arpabet(args),
        other => bail!("unknown command '{}'\n\n{}", other, USAGE),
    }
}

fn take_level(args: &mut Vec<String>) -> Level {
    let mut level = Level::INFO;
    args.retain(|arg| match arg.as_str() {
        "--verbose" | "-v" => {
            level = Level::DEBUG;
            false
        }
        "--quiet" | "-q" => {
            level = Level::WARN;
            false
        }
        _ => true,
    });
    level
}

/// Removes `--flag` from `args`, reporting whether it was present.
fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != flag);
    args.len() != before
}

/// Removes `--option <value>` from `args` and returns the value.
fn take_option(args: &mut Vec<String>, option: &str) -> Result<Option<String>> {
    let Some(index) = args.iter().position(|a| a == option) else {
        return Ok(None);
    };
    if index + 1 >= args.len() {
        bail!("{} needs a value", option);
    }
    let value = args.remove(index + 1);
    args.remove(index);
    Ok(Some(value))
}

fn reject_leftovers(args: &[String]) -> Result<()> {
    if let Some(unknown) = args.iter().find(|a| a.starts_with("--")) {
        bail!("unknown option '{}'", unknown);
    }
    Ok(())
}

fn load_rules(path: Option<String>) -> Result<RuleTable> {
    match path {
        Some(path) => RuleTable::from_path(&PathBuf::from(&path))
            .with_context(|| format!("could not load rule table {}", path)),
        None => RuleTable::builtin().context("built-in rule table is malformed"),
    }
}

fn cmd_run(mut args: Vec<String>) -> Result<()> {
    let mut config = match take_option(&mut args, "--config")? {
        Some(path) => PipelineConfig::load(&PathBuf::from(path))?,
        None => PipelineConfig::default(),
    };
    if let Some(words) = take_option(&mut args, "--words")? {
        config.words_path = words.into();
    }
    if let Some(dict) = take_option(&mut args, "--dict")? {
        config.dictionary_path = dict.into();
    }
    if let Some(rules) = take_option(&mut args, "--rules")? {
        config.rules_path = Some(rules.into());
    }
    if let Some(out) = take_option(&mut args, "--out")? {
        config.output_dir = out.into();
    }
    if let Some(snapshot) = take_option(&mut args, "--snapshot")? {
        config.snapshot_path = Some(snapshot.into());
    }
    if let Some(shorthand) = take_option(&mut args, "--fallback")? {
        config.fallback = FallbackConfig::parse(&shorthand)
            .with_context(|| format!("invalid fallback '{}'", shorthand))?;
    }
    if take_flag(&mut args, "--first-variant") {
        config.variant_policy = VariantPolicy::First;
    }
    if take_flag(&mut args, "--ensure-stress") {
        config.normalizer.ensure_primary_stress = true;
    }
    if take_flag(&mut args, "--strip-misplaced-stress") {
        config.normalizer.strip_misplaced_stress = true;
    }
    reject_leftovers(&args)?;

    let summary = ipa_core::run(&config)?;
    let coverage = &summary.report.coverage;

    println!("{}", "IPA pipeline finished".bold().green());
    println!(
        "  words:      {} ({} dictionary, {} generated)",
        coverage.total, coverage.dictionary, coverage.generated
    );
    println!(
        "  coverage:   {}",
        format!("{:.2}%", coverage.coverage_percent).cyan()
    );
    println!("  normalized: {} records changed", summary.report.normalized_changed);
    let anomalies = summary.report.anomalies.len();
    let anomaly_text = format!("{} anomalies", anomalies);
    if anomalies == 0 {
        println!("  validation: {}", anomaly_text.green());
    } else {
        println!("  validation: {}", anomaly_text.yellow());
    }
    println!(
        "  wrote {} ({} records)",
        summary.full_output.display(),
        summary.report.full_records
    );
    println!(
        "  wrote {} ({} records)",
        summary.corrected_output.display(),
        summary.report.corrected_records
    );
    println!("  wrote {}", summary.report_path.display());
    Ok(())
}

fn cmd_normalize(mut args: Vec<String>) -> Result<()> {
    let rules = load_rules(take_option(&mut args, "--rules")?)?;
    let normalizer = Normalizer::new(NormalizerOptions {
        ensure_primary_stress: take_flag(&mut args, "--ensure-stress"),
        strip_misplaced_stress: take_flag(&mut args, "--strip-misplaced-stress"),
    });
    reject_leftovers(&args)?;
    if args.is_empty() {
        bail!("normalize needs at least one transcription");
    }
    for raw in &args {
        println!("{}\t{}", raw, normalizer.normalize(raw, &rules).bold());
    }
    Ok(())
}

fn cmd_validate(mut args: Vec<String>) -> Result<()> {
    let extra = take_option(&mut args, "--extra-symbols")?.unwrap_or_default();
    reject_leftovers(&args)?;
    let [path] = args.as_slice() else {
        bail!("validate needs exactly one dataset path");
    };

    let (dataset, stats) = csv_io::read_dataset(&PathBuf::from(path))?;
    let report = Validator::with_extra_symbols(&extra).validate(&dataset);
    let coverage = &report.coverage;

    println!("{}", format!("Validation of {}", path).bold());
    println!(
        "  records:  {} ({} unreadable rows skipped)",
        coverage.total, stats.skipped
    );
    println!(
        "  sources:  {:.2}% dictionary, {:.2}% generated",
        coverage.dictionary_percent, coverage.generated_percent
    );
    println!(
        "  coverage: {}",
        format!("{:.2}%", coverage.coverage_percent).cyan()
    );
    for anomaly in &report.anomalies {
        println!("  {} {}", "warning:".yellow(), anomaly);
    }
    if report.anomalies.is_empty() {
        println!("  {}", "no anomalies".green());
    }
    Ok(())
}

fn cmd_rules(mut args: Vec<String>) -> Result<()> {
    let lint = take_flag(&mut args, "--lint");
    let rules = load_rules(take_option(&mut args, "--rules")?)?;
    reject_leftovers(&args)?;

    if !lint {
        for (i, rule) in rules.rules().iter().enumerate() {
            println!("{:>3}  {:<8} -> {}", i + 1, rule.pattern, rule.replacement);
        }
        return Ok(());
    }

    let conflicts = rules.lint();
    if conflicts.is_empty() {
        println!("{}", format!("{} rules, no ordering problems", rules.len()).green());
        return Ok(());
    }
    for conflict in &conflicts {
        println!("{} {}", "conflict:".red(), rules.describe(conflict));
    }
    bail!("{} rule ordering problems", conflicts.len())
}

fn cmd_convert_arpabet(args: Vec<String>) -> Result<()> {
    reject_leftovers(&args)?;
    if args.is_empty() {
        bail!("convert-arpabet needs ARPAbet phones, e.g. AH0 L ER1 T");
    }
    let ipa = arpabet::to_ipa(&args.join(" "))?;
    println!("{}", ipa);
    Ok(())
}
