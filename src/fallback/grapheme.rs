// File: src/fallback/grapheme.rs
use crate::core::types::PRIMARY_STRESS;
use crate::error::LookupError;
use crate::fallback::PronunciationSource;

/// A rough spelling-to-sound generator for English.
///
/// Good enough to give every word *some* transcription; it knows nothing
/// about morphology or stress placement and always stresses the start.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphemeGenerator;

impl GraphemeGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Transcribes a word. Characters other than ASCII letters are ignored.
    pub fn transliterate(&self, word: &str) -> String {
        let letters: Vec<char> = word
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if letters.is_empty() {
            return String::new();
        }

        let mut result = String::new();
        result.push(PRIMARY_STRESS);
        let mut i = 0;
        let mut last: Option<char> = None;
        while i < letters.len() {
            let c = letters[i];
            let next = letters.get(i + 1).copied();
            let is_last = i + 1 == letters.len();

            if let Some(n) = next {
                let pair: String = [c, n].iter().collect();
                if let Some(sound) = self.get_digraph(&pair) {
                    result.push_str(sound);
                    last = Some(n);
                    i += 2;
                    continue;
                }
            }

            // Doubled consonants sound once: "ll", "ss", "tt".
            if last == Some(c) && !is_vowel_letter(c) {
                i += 1;
                continue;
            }

            let sound = if is_last {
                self.get_final(c, letters.len())
            } else {
                self.get_letter(c, next, i == 0)
            };
            result.push_str(sound);
            last = Some(c);
            i += 1;
        }
        result
    }

    fn get_digraph(&self, pair: &str) -> Option<&'static str> {
        match pair {
            "ph" => Some("f"),
            "qu" => Some("kw"),
            "th" => Some("θ"),
            "sh" => Some("ʃ"),
            "ch" => Some("tʃ"),
            "ng" => Some("ŋ"),
            "ck" => Some("k"),
            "wh" => Some("w"),
            "oo" => Some("u"),
            "ee" | "ea" => Some("i"),
            "ay" | "ey" | "ai" => Some("eɪ"),
            "ow" | "oa" => Some("oʊ"),
            "ou" => Some("aʊ"),
            _ => None,
        }
    }

    fn get_letter(&self, c: char, next: Option<char>, initial: bool) -> &'static str {
        match c {
            'a' => "æ",
            'e' => "ɛ",
            'i' => "ɪ",
            'o' => "ɑ",
            'u' => "ʌ",
            'c' if matches!(next, Some('e' | 'i' | 'y')) => "s",
            'c' | 'k' | 'q' => "k",
            'g' => "ɡ",
            'j' => "dʒ",
            'x' => "ks",
            'y' if initial => "j",
            'y' => "ɪ",
            _ => plain_consonant(c),
        }
    }

    fn get_final(&self, c: char, word_len: usize) -> &'static str {
        match c {
            'a' => "ə",
            'e' if word_len > 2 => "",
            'e' | 'i' | 'y' => "i",
            'o' => "oʊ",
            'u' => "u",
            _ => self.get_letter(c, None, word_len == 1),
        }
    }
}

fn is_vowel_letter(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn plain_consonant(c: char) -> &'static str {
    match c {
        'b' => "b",
        'd' => "d",
        'f' => "f",
        'h' => "h",
        'l' => "l",
        'm' => "m",
        'n' => "n",
        'p' => "p",
        'r' => "r",
        's' => "s",
        't' => "t",
        'v' => "v",
        'w' => "w",
        'z' => "z",
        _ => "",
    }
}

impl PronunciationSource for GraphemeGenerator {
    fn name(&self) -> &str {
        "rules"
    }

    fn lookup(&self, word: &str) -> Result<String, LookupError> {
        let ipa = self.transliterate(word);
        if ipa.is_empty() {
            Err(LookupError::NotFound(word.to_string()))
        } else {
            Ok(ipa)
        }
    }
}
