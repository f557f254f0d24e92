// Tests for Normalizer
// Test cases:
// - bird: bɝd -> bɜːrd, and ɝ never leaves a bare ɹ behind
// - American conversions (ɹ, tj/dj, ASCII colon and apostrophe)
// - Mark collapsing and variant handling
// - Idempotence over a corpus of awkward raw strings
// - Optional stress repair

use super::*;

fn rules() -> RuleTable {
    RuleTable::builtin().unwrap()
}

#[test]
fn test_bird_example() {
    assert_eq!(normalize("bɝd", &rules()), "bɜːrd");
}

#[test]
fn test_rhotic_vowel_is_never_remapped() {
    let table = rules();
    for raw in ["ɝ", "bɝd", "ˈfɝst", "ɝːθ", "/ˈwɝ.kɚ/", "ɝɹ"] {
        let out = normalize(raw, &table);
        assert!(out.contains("ɜːr"), "{} -> {}", raw, out);
        assert!(!out.contains('ɹ'), "{} -> {}", raw, out);
        assert!(!out.contains('ɝ'), "{} -> {}", raw, out);
    }
}

#[test]
fn test_documented_conversions() {
    let table = rules();
    assert_eq!(normalize("ˈɹɛd", &table), "ˈrɛd");
    assert_eq!(normalize("ˈtjuːn", &table), "ˈtʃuːn");
    assert_eq!(normalize("ˈdjuːti", &table), "ˈdʒuːti");
    assert_eq!(normalize("'si:", &table), "ˈsiː");
    assert_eq!(normalize("ˈbʌtɚ", &table), "ˈbʌtər");
    assert_eq!(normalize("[ˈkʰæt]", &table), "ˈkæt");
    assert_eq!(normalize("ˈt͡ʃɪp", &table), "ˈtʃɪp");
    assert_eq!(normalize("ˈbʌʔn̩", &table), "ˈbʌtən");
    assert_eq!(normalize("ˈgoʊ", &table), "ˈɡoʊ");
}

#[test]
fn test_marks_and_whitespace_are_collapsed() {
    let table = rules();
    assert_eq!(normalize("ˈˈsiːː", &table), "ˈsiː");
    assert_eq!(normalize("ˌˈhɛ", &table), "ˌhɛ");
    assert_eq!(normalize("  ˈhæv   ə  ", &table), "ˈhæv ə");
    assert_eq!(normalize("iː:", &table), "iː");
}

#[test]
fn test_variants_are_normalized_and_deduplicated() {
    let table = rules();
    assert_eq!(normalize("ə, ˈeɪ", &table), "ə, ˈeɪ");
    assert_eq!(normalize("ˈɹɛd, ˈrɛd", &table), "ˈrɛd");
    assert_eq!(normalize("ˈtɛst,, /ˈtɛst/ ,", &table), "ˈtɛst");
}

#[test]
fn test_empty_and_delimiter_only_input() {
    let table = rules();
    assert_eq!(normalize("", &table), "");
    assert_eq!(normalize("   ", &table), "");
    assert_eq!(normalize("//", &table), "");
}

#[test]
fn test_normalize_is_idempotent() {
    let table = rules();
    let corpus = [
        "bɝd",
        "ˈwɝː.kɚ",
        "həˈloʊ, hɛˈloʊ",
        "/ˈtʃɪkən/",
        "ˈbʌʔn̩",
        "ˈlɪtɫ̩",
        "t͡ʃɝːtʃ",
        "ˈkʰæ̃n",
        "ˈwɔ:tɚ",
        "ˈʉː.zʉ",
        "ɹ̩ɹɹ̩",
        "ˈˈəʊvəː",
        "əˈbaʊt ˌɪt",
        "t.j",
        "d‿j",
        "ᵻɾ'ɐ",
        "gɚlz",
        "ɝ:",
        "ˌˌ ,ˈ",
    ];
    for raw in corpus {
        let once = normalize(raw, &table);
        let twice = normalize(&once, &table);
        assert_eq!(once, twice, "not idempotent for {:?}", raw);
    }
}

#[test]
fn test_ensure_primary_stress() {
    let table = rules();
    let normalizer = Normalizer::new(NormalizerOptions {
        ensure_primary_stress: true,
        ..Default::default()
    });
    assert_eq!(normalizer.normalize("bɝd", &table), "bˈɜːrd");
    assert_eq!(normalizer.normalize("ˌhɛ", &table), "ˌhɛ");
    assert_eq!(normalizer.normalize("ʃ", &table), "ʃ");

    let once = normalizer.normalize("kæt, dɔg", &table);
    assert_eq!(once, "kˈæt, dˈɔɡ");
    assert_eq!(normalizer.normalize(&once, &table), once);
}

#[test]
fn test_strip_misplaced_stress() {
    let table = rules();
    let normalizer = Normalizer::new(NormalizerOptions {
        strip_misplaced_stress: true,
        ..Default::default()
    });
    assert_eq!(normalizer.normalize("ɪnˈstɑl", &table), "ɪnstɑl");
    assert_eq!(normalizer.normalize("əˈbaʊt", &table), "əˈbaʊt");
}

#[test]
fn test_rules_are_a_parameter() {
    let custom = RuleTable::new(vec![crate::core::types::NormalizationRule::new("x", "ks")]);
    assert_eq!(normalize("ˈbɑx", &custom), "ˈbɑks");
    assert_eq!(normalize("ˈbɑx", &RuleTable::new(Vec::new())), "ˈbɑx");
}
