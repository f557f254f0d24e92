// File: src/core/rules.rs
use crate::core::types::NormalizationRule;
use crate::error::{ParseError, PipelineError};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUILTIN_RULES: &str = include_str!("../../data/ipa_rules.csv");

/// An ordered, immutable list of rewrite rules.
///
/// The table is a two-column CSV (`pattern,replacement`) with a header row.
/// Lines starting with `#` are comments. Fields may use `\u{XXXX}` escapes so
/// that bare combining marks stay readable in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<NormalizationRule>,
}

/// An ordering hazard between two rules, reported by [`RuleTable::lint`].
/// Indices are zero-based positions in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleConflict {
    /// The earlier pattern is contained in the later one, so it consumes the
    /// text before the more specific rule can match.
    Shadowed { earlier: usize, later: usize },
    /// The later replacement contains the earlier pattern; a second pass
    /// would rewrite it again.
    Reintroduced { earlier: usize, later: usize },
    /// The replacement contains its own pattern.
    SelfFeeding { index: usize },
    /// The same pattern appears twice; the second occurrence never fires.
    Duplicate { first: usize, second: usize },
}

impl RuleTable {
    pub fn new(rules: Vec<NormalizationRule>) -> Self {
        Self { rules }
    }

    /// The table shipped in `data/ipa_rules.csv`.
    pub fn builtin() -> Result<Self, ParseError> {
        Self::parse_str(BUILTIN_RULES)
    }

    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let file = File::open(path).map_err(|e| PipelineError::from_open(path, e))?;
        let table = Self::from_reader(file)?;
        tracing::info!("loaded {} rules from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn parse_str(text: &str) -> Result<Self, ParseError> {
        Self::from_reader(text.as_bytes())
    }

    /// Reads the whole table. Any row with the wrong number of columns or an
    /// empty pattern rejects the table.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ParseError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut rules = Vec::new();
        for (i, record) in csv_reader.records().enumerate() {
            let record = record.map_err(|e| ParseError::Record {
                record: i as u64 + 1,
                message: e.to_string(),
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(i as u64 + 2);

            if record.len() != 2 {
                return Err(ParseError::RuleColumns {
                    line,
                    found: record.len(),
                });
            }
            let pattern = unescape(&record[0]);
            if pattern.is_empty() {
                return Err(ParseError::EmptyPattern { line });
            }
            rules.push(NormalizationRule::new(pattern, unescape(&record[1])));
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[NormalizationRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs every rule once, first to last, each over the output of the
    /// previous one.
    pub fn apply(&self, input: &str) -> String {
        self.rules
            .iter()
            .fold(input.to_string(), |text, rule| {
                if rule.is_noop() || !text.contains(rule.pattern.as_str()) {
                    text
                } else {
                    text.replace(rule.pattern.as_str(), &rule.replacement)
                }
            })
    }

    /// Finds pairs of rules whose order makes the cascade lossy or
    /// non-idempotent. No-op rules never conflict.
    pub fn lint(&self) -> Vec<RuleConflict> {
        let mut conflicts = Vec::new();
        for (i, rule) in self.rules.iter().enumerate() {
            if rule.is_noop() {
                continue;
            }
            if rule.replacement.contains(rule.pattern.as_str()) {
                conflicts.push(RuleConflict::SelfFeeding { index: i });
            }
            for (j, later) in self.rules.iter().enumerate().skip(i + 1) {
                if later.is_noop() {
                    continue;
                }
                if later.pattern == rule.pattern {
                    conflicts.push(RuleConflict::Duplicate { first: i, second: j });
                } else if later.pattern.contains(rule.pattern.as_str()) {
                    conflicts.push(RuleConflict::Shadowed { earlier: i, later: j });
                }
                if later.replacement.contains(rule.pattern.as_str()) {
                    conflicts.push(RuleConflict::Reintroduced { earlier: i, later: j });
                }
            }
        }
        conflicts
    }

    /// Logs every lint finding at `warn`.
    pub fn warn_conflicts(&self) -> usize {
        let conflicts = self.lint();
        for conflict in &conflicts {
            tracing::warn!("rule order hazard: {}", self.describe(conflict));
        }
        conflicts.len()
    }

    pub fn describe(&self, conflict: &RuleConflict) -> String {
        let show = |i: usize| {
            self.rules
                .get(i)
                .map(|r| format!("#{} '{}' -> '{}'", i + 1, r.pattern, r.replacement))
                .unwrap_or_else(|| format!("#{}", i + 1))
        };
        match *conflict {
            RuleConflict::Shadowed { earlier, later } => {
                format!("{} shadows {}", show(earlier), show(later))
            }
            RuleConflict::Reintroduced { earlier, later } => {
                format!("{} re-creates the pattern of {}", show(later), show(earlier))
            }
            RuleConflict::SelfFeeding { index } => {
                format!("{} contains its own pattern", show(index))
            }
            RuleConflict::Duplicate { first, second } => {
                format!("{} duplicates {}", show(second), show(first))
            }
        }
    }
}

/// Expands `\u{XXXX}` and `\\`. Anything else is kept verbatim.
fn unescape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('\\') => {
                chars.next();
                out.push('\\');
            }
            Some('u') => {
                let rest: String = chars.clone().collect();
                match parse_unicode_escape(&rest) {
                    Some((ch, consumed)) => {
                        out.push(ch);
                        for _ in 0..consumed {
                            chars.next();
                        }
                    }
                    None => out.push('\\'),
                }
            }
            _ => out.push('\\'),
        }
    }
    out
}

/// Parses `u{XXXX}` at the start of `rest`; returns the char and the number
/// of chars consumed.
fn parse_unicode_escape(rest: &str) -> Option<(char, usize)> {
    let body = rest.strip_prefix("u{")?;
    let end = body.find('}')?;
    let code = u32::from_str_radix(&body[..end], 16).ok()?;
    let ch = char::from_u32(code)?;
    Some((ch, 2 + end + 1))
}

#[cfg(test)]
#[path = "rules_test.rs"]
mod tests;
