// Tests for RuleTable
// Test cases:
// - Built-in table loads, is non-empty and lints clean
// - Wrong column count and empty pattern reject the table with the line number
// - Comments, escapes and empty replacements are read correctly
// - apply() runs each rule once in order
// - lint() flags shadowed, re-introduced, self-feeding and duplicate rules

use super::*;

#[test]
fn test_builtin_table_loads_and_lints_clean() {
    let table = RuleTable::builtin().unwrap();
    assert!(table.len() >= 70);
    let conflicts = table.lint();
    let described: Vec<String> = conflicts.iter().map(|c| table.describe(c)).collect();
    assert!(described.is_empty(), "unexpected hazards: {:?}", described);
}

#[test]
fn test_builtin_orders_rhotic_vowel_before_bare_r() {
    let table = RuleTable::builtin().unwrap();
    let position = |p: &str| table.rules().iter().position(|r| r.pattern == p).unwrap();
    assert!(position("ɝ") < position("ɹ"));
    assert!(position("ɝː") < position("ɝ"));
}

#[test]
fn test_wrong_column_count_is_rejected() {
    let text = "pattern,replacement\nɹ,r\nɝ,ɜːr,extra\n";
    let err = RuleTable::parse_str(text).unwrap_err();
    assert_eq!(err, ParseError::RuleColumns { line: 3, found: 3 });

    let text = "pattern,replacement\nlonely\n";
    let err = RuleTable::parse_str(text).unwrap_err();
    assert_eq!(err, ParseError::RuleColumns { line: 2, found: 1 });
}

#[test]
fn test_empty_pattern_is_rejected() {
    let text = "pattern,replacement\n,r\n";
    let err = RuleTable::parse_str(text).unwrap_err();
    assert_eq!(err, ParseError::EmptyPattern { line: 2 });
}

#[test]
fn test_comments_escapes_and_empty_replacements() {
    let text = "pattern,replacement\n# a comment\n\\u{02B0},\nn\\u{0329},ən\na\\\\b,x\n";
    let table = RuleTable::parse_str(text).unwrap();
    assert_eq!(
        table.rules(),
        &[
            NormalizationRule::new("\u{02B0}", ""),
            NormalizationRule::new("n\u{0329}", "ən"),
            NormalizationRule::new("a\\b", "x"),
        ]
    );
}

#[test]
fn test_malformed_escape_is_kept_verbatim() {
    assert_eq!(unescape("\\u{zz}"), "\\u{zz}");
    assert_eq!(unescape("\\q"), "\\q");
    assert_eq!(unescape("\\u{0061}b"), "ab");
}

#[test]
fn test_apply_is_sequential_single_pass() {
    let table = RuleTable::new(vec![
        NormalizationRule::new("a", "b"),
        NormalizationRule::new("b", "c"),
        NormalizationRule::new("x", "xx"),
    ]);
    // "a" becomes "b" and is then rewritten by the next rule; "x" is
    // replaced once, not until a fixed point.
    assert_eq!(table.apply("ax"), "cxx");
}

#[test]
fn test_noop_rule_is_allowed() {
    let table = RuleTable::new(vec![NormalizationRule::new("r", "r")]);
    assert_eq!(table.apply("rar"), "rar");
    assert!(table.lint().is_empty());
}

#[test]
fn test_lint_reports_each_hazard() {
    let table = RuleTable::new(vec![
        NormalizationRule::new("ɹ", "r"),
        NormalizationRule::new("ɹ\u{0329}", "ər"),
        NormalizationRule::new("i", "iː"),
        NormalizationRule::new("x", "ɹ"),
        NormalizationRule::new("ɹ", "R"),
    ]);
    let conflicts = table.lint();
    assert!(conflicts.contains(&RuleConflict::Shadowed { earlier: 0, later: 1 }));
    assert!(conflicts.contains(&RuleConflict::SelfFeeding { index: 2 }));
    assert!(conflicts.contains(&RuleConflict::Reintroduced { earlier: 0, later: 3 }));
    assert!(conflicts.contains(&RuleConflict::Duplicate { first: 0, second: 4 }));
}
