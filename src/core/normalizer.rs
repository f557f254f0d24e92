// File: src/core/normalizer.rs
use crate::core::rules::RuleTable;
use crate::core::types::{
    is_consonant, is_stress_mark, is_vowel, LENGTH_MARK, PRIMARY_STRESS, VARIANT_SEPARATOR,
};
use serde::{Deserialize, Serialize};

/// Optional stress repair applied after the rule cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerOptions {
    /// Insert `ˈ` before the first vowel of a variant that carries no stress.
    pub ensure_primary_stress: bool,
    /// Drop a stress mark sitting between two consonants.
    pub strip_misplaced_stress: bool,
}

/// Rewrites raw IPA into the standardized form.
///
/// Holds no state beyond the options; the rule table is passed in on every
/// call so the same normalizer can be reused with different tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    options: NormalizerOptions,
}

impl Normalizer {
    pub fn new(options: NormalizerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> NormalizerOptions {
        self.options
    }

    /// Normalizes every comma-separated variant, drops empty and repeated
    /// variants, and joins the rest with ", ".
    pub fn normalize(&self, raw: &str, rules: &RuleTable) -> String {
        let mut variants: Vec<String> = Vec::new();
        for part in raw.split(',') {
            let standardized = self.normalize_variant(part, rules);
            if !standardized.is_empty() && !variants.contains(&standardized) {
                variants.push(standardized);
            }
        }
        variants.join(VARIANT_SEPARATOR)
    }

    fn normalize_variant(&self, raw: &str, rules: &RuleTable) -> String {
        let rewritten = rules.apply(raw.trim());
        let mut cleaned = collapse_marks(&rewritten);
        if self.options.strip_misplaced_stress {
            cleaned = strip_misplaced_stress(&cleaned);
        }
        if self.options.ensure_primary_stress {
            cleaned = ensure_primary_stress(&cleaned);
        }
        cleaned
    }
}

/// Collapses whitespace runs to one space, runs of `ː` to one mark and runs
/// of stress marks to their first mark. Trims the ends.
fn collapse_marks(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    for c in text.trim().chars() {
        let c = if c.is_whitespace() { ' ' } else { c };
        let repeated = match prev {
            Some(' ') => c == ' ',
            Some(LENGTH_MARK) => c == LENGTH_MARK,
            Some(p) if is_stress_mark(p) => is_stress_mark(c),
            _ => false,
        };
        if !repeated {
            result.push(c);
            prev = Some(c);
        }
    }
    result
}

fn strip_misplaced_stress(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        if is_stress_mark(c) && i > 0 {
            let before = chars[i - 1];
            let after = chars.get(i + 1).copied();
            if is_consonant(before) && after.is_some_and(is_consonant) {
                continue;
            }
        }
        result.push(c);
    }
    result
}

fn ensure_primary_stress(text: &str) -> String {
    if text.chars().any(is_stress_mark) {
        return text.to_string();
    }
    match text.char_indices().find(|&(_, c)| is_vowel(c)) {
        Some((pos, _)) => {
            let mut result = String::with_capacity(text.len() + PRIMARY_STRESS.len_utf8());
            result.push_str(&text[..pos]);
            result.push(PRIMARY_STRESS);
            result.push_str(&text[pos..]);
            result
        }
        None => text.to_string(),
    }
}

/// Normalizes with the given rules and default options.
pub fn normalize(raw: &str, rules: &RuleTable) -> String {
    Normalizer::default().normalize(raw, rules)
}

#[cfg(test)]
#[path = "normalizer_test.rs"]
mod tests;
