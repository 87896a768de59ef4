//! Title capitalization
//!
//! Brace protection is gone by the time titles reach the renderer, so
//! words with internal capitals ("DNA", "iPhone", "McDonald") are treated
//! as protected and never recased.

use crate::style::TitleCase;

const MINOR_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "from", "in", "into", "nor", "of", "on",
    "or", "per", "the", "to", "via", "vs", "with",
];

/// Apply a style's title-case rule
pub fn apply(title: &str, rule: TitleCase) -> String {
    match rule {
        TitleCase::AsIs => title.to_string(),
        TitleCase::Sentence => sentence_case(title),
        TitleCase::Title => title_case(title),
    }
}

/// A word is protected when any letter after the first is uppercase
fn is_protected(word: &str) -> bool {
    word.chars()
        .filter(|c| c.is_alphabetic())
        .skip(1)
        .any(char::is_uppercase)
}

fn is_all_caps(text: &str) -> bool {
    let mut letters = text.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(|c| !c.is_lowercase())
}

fn capitalize_first(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut done = false;
    for c in word.chars() {
        if !done && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            done = true;
        } else {
            out.push(c);
        }
    }
    out
}

/// Split into words, tracking which start a new clause (first word, or
/// after a colon, question mark or exclamation mark)
fn words_with_clause_starts(title: &str) -> Vec<(&str, bool)> {
    let mut out = Vec::new();
    let mut clause_start = true;
    for word in title.split(' ') {
        if word.is_empty() {
            out.push((word, false));
            continue;
        }
        out.push((word, clause_start));
        clause_start = word.ends_with([':', '?', '!']);
    }
    out
}

/// First word and words after a colon capitalized; ordinary capitalized
/// words lowercased; protected words kept. An all-caps title is treated as
/// unprotected text.
pub fn sentence_case(title: &str) -> String {
    let shouting = is_all_caps(title) && title.split_whitespace().count() > 1;
    words_with_clause_starts(title)
        .into_iter()
        .map(|(word, clause_start)| {
            let lowered = if shouting || !is_protected(word) {
                word.to_lowercase()
            } else {
                word.to_string()
            };
            if clause_start {
                capitalize_first(&lowered)
            } else {
                lowered
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalize every word except minor words in mid-clause positions
pub fn title_case(title: &str) -> String {
    let words = words_with_clause_starts(title);
    let last = words.iter().rposition(|(w, _)| !w.is_empty());
    words
        .iter()
        .enumerate()
        .map(|(i, (word, clause_start))| {
            if is_protected(word) {
                return word.to_string();
            }
            let bare = word
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            let minor = MINOR_WORDS.contains(&bare.as_str());
            if minor && !clause_start && Some(i) != last {
                word.to_lowercase()
            } else {
                capitalize_first(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
