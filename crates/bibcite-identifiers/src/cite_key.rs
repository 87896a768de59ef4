//! Cite keys of the form `Surname2020a`
//!
//! Keys are ASCII only so they survive every BibTeX toolchain. Names with
//! no Latin letters (Thai, CJK) fall back to a fixed stem.

use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

const ANONYMOUS_STEM: &str = "Anon";

/// Build `Surname` + four-digit year + disambiguation suffix.
///
/// A year that does not contain four digits is dropped rather than
/// truncated, so `n.d.` contributes nothing.
pub fn generate_cite_key(
    surname: Option<&str>,
    year: Option<&str>,
    suffix: Option<&str>,
) -> String {
    let stem = surname.map(ascii_stem).filter(|s| !s.is_empty());
    let mut key = stem.unwrap_or_else(|| ANONYMOUS_STEM.to_string());

    let digits: Option<String> =
        year.map(|y| y.chars().filter(char::is_ascii_digit).take(4).collect());
    if let Some(digits) = digits {
        if digits.len() == 4 {
            key += &digits;
        }
    }

    key.extend(suffix.unwrap_or_default().chars().filter(char::is_ascii_alphanumeric));
    key
}

/// Return `base` if free, else the first free of `base`a..`base`z, then
/// `base`2, `base`3, ...
pub fn make_cite_key_unique(base: &str, existing_keys: &HashSet<String>) -> String {
    let letters = ('a'..='z').map(|c| format!("{base}{c}"));
    let numbers = (2u32..).map(|n| format!("{base}{n}"));

    std::iter::once(base.to_string())
        .chain(letters)
        .chain(numbers)
        .find(|candidate| !existing_keys.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Strip diacritics and punctuation, lowercase, then capitalise the first
/// character: `van der Berg` becomes `Vanderberg`.
fn ascii_stem(name: &str) -> String {
    let mut folded = name
        .nfkd()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase());

    match folded.next() {
        Some(first) => std::iter::once(first.to_ascii_uppercase()).chain(folded).collect(),
        None => String::new(),
    }
}
