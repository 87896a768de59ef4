//! Locale-aware collation keys
//!
//! Latin text collates on its decomposed, lowercased letters so that
//! diacritics do not split the alphabet. Thai collates in dictionary order:
//! leading vowels are moved behind the consonant they precede and tone
//! marks are ignored, after which code point order matches the
//! consonant order.

use std::cmp::Ordering;

use bibcite_domain::{Locale, Reference};
use unicode_normalization::UnicodeNormalization;

/// Thai vowels written before the consonant they follow in speech
fn is_leading_vowel(c: char) -> bool {
    matches!(c, '\u{0E40}'..='\u{0E44}')
}

/// Tone marks, maitaikhu and thanthakhat
fn is_ignorable_mark(c: char) -> bool {
    matches!(c, '\u{0E47}'..='\u{0E4C}')
}

/// Sort key for `text` under `locale`
pub fn collation_key(text: &str, locale: Locale) -> String {
    let folded: Vec<char> = text
        .nfkd()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || is_thai_sign(*c))
        .flat_map(char::to_lowercase)
        .collect();

    let cleaned: Vec<char> = match locale {
        Locale::English => folded,
        Locale::Thai => thai_order(&folded),
    };

    cleaned
        .into_iter()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn thai_order(chars: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if is_ignorable_mark(c) {
            i += 1;
            continue;
        }
        if is_leading_vowel(c) && i + 1 < chars.len() {
            out.push(chars[i + 1]);
            out.push(c);
            i += 2;
            continue;
        }
        out.push(c);
        i += 1;
    }
    out
}

/// Thai vowel signs and marks are combining characters but still collate
fn is_thai_sign(c: char) -> bool {
    ('\u{0E00}'..='\u{0E7F}').contains(&c)
}

/// Compare two strings under `locale`
pub fn compare(a: &str, b: &str, locale: Locale) -> Ordering {
    collation_key(a, locale).cmp(&collation_key(b, locale))
}

/// Locale of a reference, falling back to `default` when neither a language
/// tag nor Thai script decides it
pub fn resolve_locale(reference: &Reference, default: Locale) -> Locale {
    if let Some(locale) = reference
        .language
        .as_deref()
        .and_then(Locale::from_language_tag)
    {
        return locale;
    }
    match Locale::for_reference(reference) {
        Locale::Thai => Locale::Thai,
        Locale::English => default,
    }
}
