// File: src/core/arpabet.rs
//! ARPAbet (CMU dictionary notation) to IPA.
//!
//! `AH0 L ER1 T` becomes `əlˈɜːrt`: the stress digit on a vowel turns into a
//! mark placed directly before that vowel.

use crate::core::types::{PRIMARY_STRESS, SECONDARY_STRESS};
use crate::error::ParseError;

fn vowel(symbol: &str, stress: u8) -> Option<&'static str> {
    let ipa = match symbol {
        "AA" => "ɑ",
        "AE" => "æ",
        "AH" if stress == 0 => "ə",
        "AH" => "ʌ",
        "AO" => "ɔ",
        "AW" => "aʊ",
        "AY" => "aɪ",
        "EH" => "ɛ",
        "ER" => "ɜːr",
        "EY" => "eɪ",
        "IH" => "ɪ",
        "IY" => "iː",
        "OW" => "oʊ",
        "OY" => "ɔɪ",
        "UH" => "ʊ",
        "UW" => "uː",
        _ => return None,
    };
    Some(ipa)
}

fn consonant(symbol: &str) -> Option<&'static str> {
    let ipa = match symbol {
        "P" => "p",
        "B" => "b",
        "T" => "t",
        "D" => "d",
        "K" => "k",
        "G" => "ɡ",
        "CH" => "tʃ",
        "JH" => "dʒ",
        "F" => "f",
        "V" => "v",
        "TH" => "θ",
        "DH" => "ð",
        "S" => "s",
        "Z" => "z",
        "SH" => "ʃ",
        "ZH" => "ʒ",
        "HH" => "h",
        "M" => "m",
        "N" => "n",
        "NG" => "ŋ",
        "L" => "l",
        "R" => "r",
        "W" => "w",
        "Y" => "j",
        _ => return None,
    };
    Some(ipa)
}

/// Splits `ER1` into `("ER", 1)`. Tokens without a digit have stress 0.
fn split_token(token: &str) -> Option<(&str, u8)> {
    let (symbol, stress) = match token.char_indices().last() {
        Some((i, d @ '0'..='2')) => (&token[..i], d as u8 - b'0'),
        _ => (token, 0),
    };
    if symbol.is_empty() || !symbol.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    Some((symbol, stress))
}

/// True when every whitespace-separated token is a known ARPAbet phone.
pub fn looks_like_arpabet(text: &str) -> bool {
    let mut tokens = text.split_whitespace().peekable();
    tokens.peek().is_some()
        && tokens.all(|t| {
            split_token(t).is_some_and(|(s, _)| vowel(s, 0).is_some() || consonant(s).is_some())
        })
}

pub fn to_ipa(text: &str) -> Result<String, ParseError> {
    let mut ipa = String::new();
    for token in text.split_whitespace() {
        let (symbol, stress) =
            split_token(token).ok_or_else(|| ParseError::UnknownArpabet(token.to_string()))?;
        if let Some(v) = vowel(symbol, stress) {
            match stress {
                1 => ipa.push(PRIMARY_STRESS),
                2 => ipa.push(SECONDARY_STRESS),
                _ => {}
            }
            ipa.push_str(v);
        } else if let Some(c) = consonant(symbol) {
            ipa.push_str(c);
        } else {
            return Err(ParseError::UnknownArpabet(token.to_string()));
        }
    }
    Ok(ipa)
}
